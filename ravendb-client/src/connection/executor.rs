//! Runs commands against a node.

use std::sync::Arc;
use std::time::Duration;

use ravendb_core::{ExceptionDispatcher, HttpRequest, RavenError, Result};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use super::{HttpTransport, ReqwestTransport};
use crate::config::ClientConfig;
use crate::node::ServerNode;

/// A request/response exchange with the server.
pub trait RavenCommand: Send + Sync {
    /// Decoded result of a successful exchange.
    type Output: Send;

    /// Renders the request for `node`. Must not perform I/O.
    fn create_request(&self, node: &ServerNode) -> Result<HttpRequest>;

    /// Decodes the body of a 2xx response.
    fn set_response(&self, body: &[u8], from_cache: bool) -> Result<Self::Output>;

    /// Returns true if the command only reads data.
    fn is_read_request(&self) -> bool;
}

/// Sends commands to a single node and translates failures.
#[derive(Clone)]
pub struct RequestExecutor {
    node: Arc<ServerNode>,
    transport: Arc<dyn HttpTransport>,
    request_timeout: Duration,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("node", &self.node)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Creates an executor over an explicit transport.
    pub fn new(
        node: Arc<ServerNode>,
        transport: Arc<dyn HttpTransport>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            node,
            transport,
            request_timeout,
        }
    }

    /// Creates an executor for the first configured url, using reqwest.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let url = config.urls().first().ok_or_else(|| {
            RavenError::IllegalState("client configuration has no urls".to_string())
        })?;
        let node = ServerNode::new(url.as_str(), config.database())
            .with_atomic_cluster_writes(config.atomic_cluster_writes());
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Ok(Self::new(
            Arc::new(node),
            Arc::new(transport),
            config.request_timeout(),
        ))
    }

    /// Returns the target node.
    pub fn node(&self) -> &Arc<ServerNode> {
        &self.node
    }

    /// Returns the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Executes `command`: builds its request, sends it, and decodes the
    /// response. Non-2xx responses are translated by the [`ExceptionDispatcher`].
    #[instrument(
        name = "request_executor.execute",
        skip(self, command),
        fields(node = %self.node.url(), database = %self.node.database())
    )]
    pub async fn execute<C: RavenCommand>(&self, command: &C) -> Result<C::Output> {
        let request = command.create_request(&self.node)?;
        debug!(
            method = %request.method(),
            url = request.url(),
            read = command.is_read_request(),
            "sending request"
        );

        let response = timeout(self.request_timeout, self.transport.send(request))
            .await
            .map_err(|_| {
                warn!(timeout = ?self.request_timeout, "request timed out");
                RavenError::Timeout(format!(
                    "request to {} timed out after {:?}",
                    self.node.url(),
                    self.request_timeout
                ))
            })??;

        if response.is_success() {
            debug!(status = response.status(), "request succeeded");
            return command.set_response(response.body(), false);
        }

        let error = ExceptionDispatcher::throw_exception(Some(&response));
        warn!(status = response.status(), error = %error, "server returned an error");
        Err(error)
    }
}
