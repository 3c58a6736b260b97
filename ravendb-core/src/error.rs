//! Error types for RavenDB operations.
//!
//! Every failure raised by the driver, local or reported by the server, is a
//! [`RavenError`]. Server errors that the exception dispatcher recognizes map to
//! dedicated variants; anything else degrades to [`RavenError::Generic`], which
//! keeps the diagnostic text and, when available, the underlying cause.

use std::fmt;
use std::io;

use serde::Deserialize;
use thiserror::Error;

use crate::protocol::ServerErrorKind;

/// Boxed error used as the cause of a [`RavenError::Generic`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for RavenDB operations.
#[derive(Debug, Error)]
pub enum RavenError {
    /// An argument passed to the driver (or reported by the server as such) was invalid.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// The driver was asked to do something its current state does not allow.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// The server answered with a body the driver cannot accept.
    #[error("invalid server response: {0}")]
    InvalidServerResponse(String),

    /// Generic optimistic-concurrency failure (HTTP 409 without a document conflict).
    #[error("concurrency error: {0}")]
    Concurrency(String),

    /// The server detected conflicting versions of a document.
    #[error(transparent)]
    DocumentConflict(DocumentConflict),

    /// The server (or the driver) gave up waiting.
    #[error("timeout error: {0}")]
    Timeout(String),

    /// An index definition failed to compile on the server.
    #[error(transparent)]
    IndexCompilation(IndexCompilation),

    /// A server-side error recognized by the exception type table.
    #[error("{kind}: {message}")]
    Server {
        /// The local identity of the server error.
        kind: ServerErrorKind,
        /// The diagnostic text reported by the server.
        message: String,
    },

    /// Fallback for unrecognized server errors and internal failures.
    #[error("{message}")]
    Generic {
        /// Diagnostic text.
        message: String,
        /// The error that triggered this one, if any.
        #[source]
        cause: Option<BoxError>,
    },

    /// Transport-level failures (connection refused, reset, TLS).
    #[error("connection error: {0}")]
    Connection(String),

    /// Serialization/deserialization errors on the client side.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O errors from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RavenError {
    /// Creates a generic error without a cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a generic error wrapping `cause`.
    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Generic {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// Creates a generic error that carries the raw server response for diagnostics.
    pub fn generic(error: &str, json: &str) -> Self {
        Self::new(format!("{error}. Response: {json}"))
    }

    /// Returns the server error kind this error corresponds to, if it came from the
    /// exception type table.
    pub fn server_kind(&self) -> Option<ServerErrorKind> {
        match self {
            Self::Server { kind, .. } => Some(*kind),
            Self::Concurrency(_) => Some(ServerErrorKind::Concurrency),
            Self::DocumentConflict(_) => Some(ServerErrorKind::DocumentConflict),
            Self::IndexCompilation(_) => Some(ServerErrorKind::IndexCompilation),
            Self::Timeout(_) => Some(ServerErrorKind::Timeout),
            Self::IllegalArgument(_) => Some(ServerErrorKind::IllegalArgument),
            _ => None,
        }
    }

    /// Returns true for the conflict family (409 responses).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Concurrency(_) | Self::DocumentConflict(_))
    }
}

impl From<serde_json::Error> for RavenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for RavenDB operations.
pub type Result<T> = std::result::Result<T, RavenError>;

/// Conflicting versions of a document were detected by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConflict {
    message: String,
    doc_id: Option<String>,
    largest_etag: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DocumentConflictBody {
    #[serde(default)]
    doc_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    largest_etag: Option<i64>,
}

impl DocumentConflict {
    /// Creates a conflict with full details.
    pub fn new(message: impl Into<String>, doc_id: Option<String>, largest_etag: i64) -> Self {
        Self {
            message: message.into(),
            doc_id,
            largest_etag,
        }
    }

    /// Creates a conflict from the server message alone.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new(message, None, 0)
    }

    /// Parses the conflict details (`DocId`, `Message`, `LargestEtag`) from a raw
    /// error body.
    pub fn from_json(json: &str) -> Result<Self> {
        let body: DocumentConflictBody = serde_json::from_str(json).map_err(|e| {
            RavenError::InvalidServerResponse(format!("Unable to parse server response: {e}"))
        })?;
        Ok(Self::new(
            body.message.unwrap_or_default(),
            body.doc_id,
            body.largest_etag.unwrap_or_default(),
        ))
    }

    /// Returns the server message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the id of the conflicted document, if known.
    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }

    /// Returns the largest etag among the conflicting versions.
    pub fn largest_etag(&self) -> i64 {
        self.largest_etag
    }
}

impl fmt::Display for DocumentConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document conflict: {}", self.message)
    }
}

impl std::error::Error for DocumentConflict {}

/// An index (or transformer) definition failed to compile on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexCompilation {
    message: String,
    index_definition_property: Option<String>,
    problematic_text: Option<String>,
}

impl IndexCompilation {
    /// Creates a compilation failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Returns the server message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the definition property that failed to compile.
    pub fn index_definition_property(&self) -> Option<&str> {
        self.index_definition_property.as_deref()
    }

    /// Sets the definition property that failed to compile.
    pub fn set_index_definition_property(&mut self, property: impl Into<String>) {
        self.index_definition_property = Some(property.into());
    }

    /// Returns the source fragment the compiler rejected.
    pub fn problematic_text(&self) -> Option<&str> {
        self.problematic_text.as_deref()
    }

    /// Sets the source fragment the compiler rejected.
    pub fn set_problematic_text(&mut self, text: impl Into<String>) {
        self.problematic_text = Some(text.into());
    }
}

impl fmt::Display for IndexCompilation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index compilation error: {}", self.message)
    }
}

impl std::error::Error for IndexCompilation {}
