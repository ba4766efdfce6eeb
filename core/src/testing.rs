//! Canned-response transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::auth::Credentials;
use crate::client::ConvoreClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Replays queued responses in order and records every request it sees.
/// An empty queue behaves like an unreachable host.
#[derive(Debug, Default)]
pub struct StubTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for StubTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::TransportError("connection refused".to_string()))
    }
}

pub fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

pub fn stub_client(responses: Vec<HttpResponse>) -> ConvoreClient<StubTransport> {
    ConvoreClient::with_transport(
        ClientConfig::new("http://localhost:3000/api/"),
        Credentials::new("alice", "secret"),
        StubTransport::new(responses),
    )
}
