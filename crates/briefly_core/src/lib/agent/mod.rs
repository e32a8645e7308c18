mod client;

use std::future::Future;

use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::Error;

pub use client::AgentClient;

/// Chunked summary text as produced by the inference backend.
pub type SummaryStream = BoxStream<'static, Result<Bytes, Error>>;

/// Payload forwarded to the inference backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
}

pub trait Summarizer {
    fn summarize(
        &self,
        request: SummarizeRequest,
        session_id: &str,
    ) -> impl Future<Output = Result<SummaryStream, Error>> + Send;
}
