//! Mock transport for tests
//!
//! Serves canned responses in FIFO order and records every request so tests
//! can assert on descriptors, bearer attachment, and call counts without a
//! server.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::traits::{HttpTransport, RawResponse, RequestDescriptor};
use crate::error::{ApiError, Result};

/// One observed request with the bearer it carried.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request: RequestDescriptor,
    pub bearer: Option<String>,
}

/// [`HttpTransport`] that never touches the network.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    recorded: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw outcome for the next unserved request.
    pub fn enqueue(&self, outcome: Result<RawResponse>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    /// Queues a JSON response with the given status.
    pub fn enqueue_json(&self, status: u16, body: serde_json::Value) {
        self.enqueue(Ok(RawResponse::new(status, body.to_string().into_bytes())));
    }

    /// Queues a plain-text (or empty) response with the given status.
    pub fn enqueue_status(&self, status: u16, body: &str) {
        self.enqueue(Ok(RawResponse::new(status, body.as_bytes().to_vec())));
    }

    /// Queues a binary response body.
    pub fn enqueue_bytes(&self, status: u16, body: Vec<u8>) {
        self.enqueue(Ok(RawResponse::new(status, body)));
    }

    /// Queues a transport-level failure.
    pub fn enqueue_error(&self, error: ApiError) {
        self.enqueue(Err(error));
    }

    /// Number of requests served so far.
    pub fn call_count(&self) -> usize {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Snapshot of every request seen, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<RawResponse> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                request: request.clone(),
                bearer: bearer.map(str::to_string),
            });

        match self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            Some(outcome) => outcome,
            None => Err(ApiError::Transport("mock transport queue is empty".to_string())),
        }
    }
}
