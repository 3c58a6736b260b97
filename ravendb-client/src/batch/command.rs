use std::sync::Arc;

use bytes::Bytes;
use ravendb_core::protocol::constants::{APPLICATION_JSON, HEADER_ACCEPT};
use ravendb_core::{HttpMethod, HttpRequest, MultipartBody, RavenError, RequestBody, Result};
use serde_json::{Map, Value};
use tracing::debug;

use super::{BatchCommandResult, BatchOptions};
use crate::commands::{AttachmentStream, CommandData, FIELD_ORIGINAL_CHANGE_VECTOR};
use crate::connection::RavenCommand;
use crate::conventions::SerializationConventions;
use crate::node::ServerNode;
use crate::transaction::TransactionMode;

const EMPTY_RESPONSE_MESSAGE: &str = "Got null response from the server after doing a batch, \
     something is very wrong. Probably a garbled response.";

const STREAM_REUSED_MESSAGE: &str = "It is forbidden to re-use the same stream for more than \
     one attachment. Use a unique stream per put attachment command.";

/// How command fragments are written into the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStrategy {
    /// The node understands per-operation concurrency tokens in cluster-wide
    /// transactions; fragments are sent as serialized.
    Atomic,
    /// Older nodes reject `OriginalChangeVector`; it is removed from each fragment.
    Legacy,
}

impl BodyStrategy {
    /// Picks the strategy for a node's atomic-write capability.
    pub fn for_node(supports_atomic_writes: bool) -> Self {
        if supports_atomic_writes {
            Self::Atomic
        } else {
            Self::Legacy
        }
    }

    fn finish(self, mut fragment: Map<String, Value>) -> Value {
        if self == Self::Legacy {
            fragment.remove(FIELD_ORIGINAL_CHANGE_VECTOR);
        }
        Value::Object(fragment)
    }
}

/// A batch of document operations sent to one node as a single `bulk_docs`
/// request.
pub struct SingleNodeBatchCommand {
    conventions: Arc<dyn SerializationConventions>,
    commands: Vec<CommandData>,
    attachment_streams: Vec<AttachmentStream>,
    options: Option<BatchOptions>,
    mode: TransactionMode,
}

impl std::fmt::Debug for SingleNodeBatchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleNodeBatchCommand")
            .field("commands", &self.commands.len())
            .field("attachment_streams", &self.attachment_streams.len())
            .field("options", &self.options)
            .field("mode", &self.mode)
            .finish()
    }
}

impl SingleNodeBatchCommand {
    /// Creates a batch command.
    ///
    /// Fails with [`RavenError::IllegalArgument`] when `commands` is empty or
    /// when one attachment stream is used by two attachment puts.
    pub fn new(
        conventions: Arc<dyn SerializationConventions>,
        commands: Vec<CommandData>,
        options: Option<BatchOptions>,
        mode: TransactionMode,
    ) -> Result<Self> {
        if commands.is_empty() {
            return Err(RavenError::IllegalArgument(
                "commands cannot be null or empty".to_string(),
            ));
        }

        let mut attachment_streams: Vec<AttachmentStream> = Vec::new();
        for stream in commands.iter().filter_map(CommandData::attachment_stream) {
            if attachment_streams.iter().any(|s| s.is_same_stream(stream)) {
                return Err(RavenError::IllegalArgument(STREAM_REUSED_MESSAGE.to_string()));
            }
            attachment_streams.push(stream.clone());
        }

        Ok(Self {
            conventions,
            commands,
            attachment_streams,
            options,
            mode,
        })
    }

    /// Returns the operations of the batch.
    pub fn commands(&self) -> &[CommandData] {
        &self.commands
    }

    /// Returns the batch options.
    pub fn options(&self) -> Option<&BatchOptions> {
        self.options.as_ref()
    }

    /// Returns the transaction mode.
    pub fn mode(&self) -> TransactionMode {
        self.mode
    }

    /// Builds the url of the request against `node`.
    pub fn create_url(&self, node: &ServerNode) -> String {
        let mut url = format!("{}/databases/{}/bulk_docs?", node.url(), node.database());
        if let Some(options) = &self.options {
            url.push_str(&options.append_query(self.conventions.as_ref()));
        }
        url
    }

    /// Builds the request against `node`. Performs no I/O.
    pub fn create_request(&self, node: &ServerNode) -> Result<HttpRequest> {
        let capabilities = node.capabilities();
        let strategy = BodyStrategy::for_node(capabilities.supports_atomic_cluster_writes);
        let body = self.render_body(strategy)?;

        debug!(
            commands = self.commands.len(),
            attachments = self.attachment_streams.len(),
            ?strategy,
            mode = %self.mode,
            "built batch request"
        );

        Ok(HttpRequest::new(HttpMethod::Post, self.create_url(node))
            .with_header(HEADER_ACCEPT, APPLICATION_JSON)
            .with_body(body))
    }

    fn render_body(&self, strategy: BodyStrategy) -> Result<RequestBody> {
        let commands = self
            .commands
            .iter()
            .map(|command| {
                command
                    .serialize(self.conventions.as_ref())
                    .map(|fragment| strategy.finish(fragment))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut root = Map::new();
        root.insert("Commands".to_string(), Value::Array(commands));
        if self.mode.is_cluster_wide() {
            root.insert(
                "TransactionMode".to_string(),
                Value::String(self.mode.as_str().to_string()),
            );
        }
        let json = Bytes::from(serde_json::to_vec(&Value::Object(root))?);

        if self.attachment_streams.is_empty() {
            return Ok(RequestBody::Json(json));
        }

        let mut multipart = MultipartBody::new(json);
        for stream in &self.attachment_streams {
            multipart.add_attachment(stream.bytes());
        }
        Ok(RequestBody::Multipart(multipart))
    }

    /// Decodes a successful response body.
    pub fn set_response(&self, body: &[u8], _from_cache: bool) -> Result<BatchCommandResult> {
        if body.is_empty() {
            return Err(RavenError::InvalidServerResponse(
                EMPTY_RESPONSE_MESSAGE.to_string(),
            ));
        }
        serde_json::from_slice(body).map_err(|e| {
            RavenError::InvalidServerResponse(format!("Unable to parse batch response: {e}"))
        })
    }
}

impl RavenCommand for SingleNodeBatchCommand {
    type Output = BatchCommandResult;

    fn create_request(&self, node: &ServerNode) -> Result<HttpRequest> {
        SingleNodeBatchCommand::create_request(self, node)
    }

    fn set_response(&self, body: &[u8], from_cache: bool) -> Result<Self::Output> {
        SingleNodeBatchCommand::set_response(self, body, from_cache)
    }

    fn is_read_request(&self) -> bool {
        false
    }
}
