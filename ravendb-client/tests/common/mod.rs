//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ravendb_client::{
    CommandData, DocumentConventions, HttpTransport, PutCommandData, RequestExecutor,
    SerializationConventions, ServerNode,
};
use ravendb_core::{HttpRequest, HttpResponse, RavenError, Result};
use serde_json::json;

pub const NODE_URL: &str = "http://127.0.0.1:8080";
pub const DATABASE: &str = "Northwind";

/// Transport that records requests and replays scripted responses in order.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body.to_string())));
        self
    }

    pub fn fail(self, error: RavenError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(RavenError::Connection("no scripted response".to_string())))
    }
}

pub fn conventions() -> Arc<dyn SerializationConventions> {
    Arc::new(DocumentConventions::default())
}

pub fn node() -> Arc<ServerNode> {
    Arc::new(ServerNode::new(NODE_URL, DATABASE))
}

pub fn executor(transport: Arc<MockTransport>) -> RequestExecutor {
    RequestExecutor::new(node(), transport, Duration::from_secs(5))
}

/// A put carrying both change vectors.
pub fn put(id: &str) -> CommandData {
    PutCommandData::new(id, Some("A:1-x".to_string()), json!({"Name": id}))
        .with_original_change_vector("A:0-x")
        .into()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
