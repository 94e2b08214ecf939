//! In-memory transport for exercising clients and hooks without a server.

use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::{HttpTransport, Response, Result, TransportRequest};

/// Transport that records every request and answers with a canned reply.
///
/// The reported final URL is the request URL with its query string, as if
/// no redirect happened.
#[derive(Clone)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<TransportRequest>>>,
    reply: Arc<Mutex<(StatusCode, String)>>,
}

impl RecordingTransport {
    /// Create a transport answering `200` with an empty body.
    pub fn new() -> Self {
        Self::replying(200, "")
    }

    /// Create a transport answering with `status` and `body`.
    ///
    /// Invalid status codes fall back to `500`.
    pub fn replying(status: u16, body: impl Into<String>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(Mutex::new((to_status(status), body.into()))),
        }
    }

    /// Change the canned reply.
    pub fn set_reply(&self, status: u16, body: impl Into<String>) {
        *self.reply.lock() = (to_status(status), body.into());
    }

    /// All recorded requests, oldest first.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().last().cloned()
    }

    /// Forget recorded requests.
    pub fn clear(&self) {
        self.requests.lock().clear();
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn to_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(&self, request: TransportRequest) -> Result<Response> {
        let url = request.full_url();
        self.requests.lock().push(request);
        let (status, body) = self.reply.lock().clone();
        Ok(Response::new(status, HeaderMap::new(), body, url))
    }
}
