use std::sync::{Arc, Mutex};

use briefly_core::{Error, SummarizeRequest, Summarizer, SummaryStream};
use bytes::Bytes;
use futures::{stream, StreamExt};

#[derive(Clone)]
pub struct MockSummarizer {
    pub chunks: Vec<String>,
    pub calls: Arc<Mutex<Vec<(SummarizeRequest, String)>>>,
    pub fail_with: Option<String>,
}

impl MockSummarizer {
    pub fn new(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            chunks: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl Summarizer for MockSummarizer {
    async fn summarize(
        &self,
        request: SummarizeRequest,
        session_id: &str,
    ) -> Result<SummaryStream, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((request, session_id.to_string()));
        if let Some(ref msg) = self.fail_with {
            return Err(Error::Backend {
                status: 500,
                message: msg.clone(),
            });
        }
        let chunks: Vec<Result<Bytes, Error>> = self
            .chunks
            .iter()
            .map(|c| Ok(Bytes::from(c.clone())))
            .collect();
        Ok(stream::iter(chunks).boxed())
    }
}
