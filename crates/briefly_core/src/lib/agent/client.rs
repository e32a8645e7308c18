use futures::{StreamExt, TryStreamExt};
use reqwest::Client;

use crate::{
    agent::{SummarizeRequest, Summarizer, SummaryStream},
    Error,
};

/// HTTP client for the remote inference backend. The backend accepts a JSON
/// invocation payload and streams the summary back as plain text chunks.
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: Client,
    endpoint: String,
}

impl AgentClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Summarizer for AgentClient {
    async fn summarize(
        &self,
        request: SummarizeRequest,
        session_id: &str,
    ) -> Result<SummaryStream, Error> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("X-Session-Id", session_id)
            .json(&request)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Backend { status, message });
        }

        if resp.content_length() == Some(0) {
            return Err(Error::EmptyResponse);
        }

        Ok(resp.bytes_stream().map_err(Error::from).boxed())
    }
}
