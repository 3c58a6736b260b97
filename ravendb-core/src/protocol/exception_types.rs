//! Mapping from server exception type names to local error identities.
//!
//! The server reports the fully-qualified name of the exception it raised
//! (e.g. `Raven.Client.Exceptions.Documents.DocumentConflictException`). The
//! namespace prefix is stripped, `.` separators become `::`, and the resulting
//! path is looked up in [`EXCEPTION_TYPES`]. Names that are not listed resolve
//! to `None` and the caller falls back to a generic error.

use std::fmt;

use super::constants::{
    ARGUMENT_NULL_EXCEPTION_TYPE, EXCEPTION_NAMESPACE_PREFIX, TIMEOUT_EXCEPTION_TYPE,
};
use crate::error::{DocumentConflict, IndexCompilation, RavenError};

/// Local identity of a server-reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerErrorKind {
    /// Optimistic-concurrency check failed.
    Concurrency,
    /// Conflicting document versions.
    DocumentConflict,
    /// Index definition failed to compile.
    IndexCompilation,
    /// Server-side timeout (`System.TimeoutException`).
    Timeout,
    /// Null argument passed to the server (`System.ArgumentNullException`).
    IllegalArgument,
    /// Generic bad request.
    BadRequest,
    /// The server could not produce a valid response.
    BadResponse,
    /// Client and server protocol versions are incompatible.
    ClientVersionMismatch,
    /// The server reported a generic conflict.
    Conflict,
    /// The request failed without a more specific reason.
    UnsuccessfulRequest,
    /// Every node in the topology is unreachable.
    AllTopologyNodesDown,
    /// The cluster has no leader.
    NoLeader,
    /// The contacted node is passive (not part of a cluster).
    NodeIsPassive,
    /// A cluster command failed to execute.
    CommandExecution,
    /// The target database does not exist.
    DatabaseDoesNotExist,
    /// The target database is disabled.
    DatabaseDisabled,
    /// The target database failed to load.
    DatabaseLoadFailure,
    /// The target database took too long to load.
    DatabaseLoadTimeout,
    /// Too many concurrent database loads.
    DatabaseConcurrentLoadTimeout,
    /// The referenced document does not exist.
    DocumentDoesNotExist,
    /// The referenced attachment does not exist.
    AttachmentDoesNotExist,
    /// A counter increment overflowed.
    CounterOverflow,
    /// The referenced index does not exist.
    IndexDoesNotExist,
    /// Index creation failed.
    IndexCreation,
    /// Index deletion failed.
    IndexDeletion,
    /// The index is invalid (e.g. too many errors).
    IndexInvalid,
    /// A patch script failed at runtime.
    JavaScript,
    /// A patch script failed to parse.
    JavaScriptParse,
    /// Revisions are disabled for the collection.
    RevisionsDisabled,
    /// The caller lacks permission for the operation.
    Authorization,
    /// The server certificate does not match the requested host.
    CertificateNameMismatch,
    /// The server failed to load.
    ServerLoadFailure,
    /// No route matches the requested URL.
    RouteNotFound,
}

/// Known exception paths (namespace prefix stripped, `::` separated).
pub const EXCEPTION_TYPES: &[(&str, ServerErrorKind)] = &[
    ("ConcurrencyException", ServerErrorKind::Concurrency),
    ("BadRequestException", ServerErrorKind::BadRequest),
    ("BadResponseException", ServerErrorKind::BadResponse),
    ("ClientVersionMismatchException", ServerErrorKind::ClientVersionMismatch),
    ("ConflictException", ServerErrorKind::Conflict),
    ("UnsuccessfulRequestException", ServerErrorKind::UnsuccessfulRequest),
    ("AllTopologyNodesDownException", ServerErrorKind::AllTopologyNodesDown),
    ("Cluster::NoLeaderException", ServerErrorKind::NoLeader),
    ("Cluster::NodeIsPassiveException", ServerErrorKind::NodeIsPassive),
    ("Cluster::CommandExecutionException", ServerErrorKind::CommandExecution),
    ("Database::DatabaseDoesNotExistException", ServerErrorKind::DatabaseDoesNotExist),
    ("Database::DatabaseDisabledException", ServerErrorKind::DatabaseDisabled),
    ("Database::DatabaseLoadFailureException", ServerErrorKind::DatabaseLoadFailure),
    ("Database::DatabaseLoadTimeoutException", ServerErrorKind::DatabaseLoadTimeout),
    (
        "Database::DatabaseConcurrentLoadTimeoutException",
        ServerErrorKind::DatabaseConcurrentLoadTimeout,
    ),
    ("Documents::DocumentConflictException", ServerErrorKind::DocumentConflict),
    ("Documents::DocumentDoesNotExistException", ServerErrorKind::DocumentDoesNotExist),
    (
        "Documents::Attachments::AttachmentDoesNotExistException",
        ServerErrorKind::AttachmentDoesNotExist,
    ),
    ("Documents::Counters::CounterOverflowException", ServerErrorKind::CounterOverflow),
    (
        "Documents::Compilation::IndexCompilationException",
        ServerErrorKind::IndexCompilation,
    ),
    ("Documents::Indexes::IndexDoesNotExistException", ServerErrorKind::IndexDoesNotExist),
    ("Documents::Indexes::IndexCreationException", ServerErrorKind::IndexCreation),
    ("Documents::Indexes::IndexDeletionException", ServerErrorKind::IndexDeletion),
    ("Documents::Indexes::IndexInvalidException", ServerErrorKind::IndexInvalid),
    ("Documents::Patching::JavaScriptException", ServerErrorKind::JavaScript),
    ("Documents::Patching::JavaScriptParseException", ServerErrorKind::JavaScriptParse),
    (
        "Documents::Revisions::RevisionsDisabledException",
        ServerErrorKind::RevisionsDisabled,
    ),
    ("Security::AuthorizationException", ServerErrorKind::Authorization),
    (
        "Security::CertificateNameMismatchException",
        ServerErrorKind::CertificateNameMismatch,
    ),
    ("Server::ServerLoadFailureException", ServerErrorKind::ServerLoadFailure),
    ("Routing::RouteNotFoundException", ServerErrorKind::RouteNotFound),
];

impl ServerErrorKind {
    /// Returns the server-side short name of the exception.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Timeout => "TimeoutException",
            Self::IllegalArgument => "ArgumentNullException",
            other => EXCEPTION_TYPES
                .iter()
                .find(|(_, kind)| kind == other)
                .and_then(|(path, _)| path.rsplit("::").next())
                .unwrap_or("RavenException"),
        }
    }

    /// Builds the local error for this kind with the given message.
    pub fn into_error(self, message: impl Into<String>) -> RavenError {
        let message = message.into();
        match self {
            Self::Concurrency => RavenError::Concurrency(message),
            Self::DocumentConflict => {
                RavenError::DocumentConflict(DocumentConflict::from_message(message))
            }
            Self::IndexCompilation => RavenError::IndexCompilation(IndexCompilation::new(message)),
            Self::Timeout => RavenError::Timeout(message),
            Self::IllegalArgument => RavenError::IllegalArgument(message),
            kind => RavenError::Server { kind, message },
        }
    }
}

impl fmt::Display for ServerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves a server exception type name to a local error identity.
///
/// Returns `None` for unknown names; callers treat that as "use the generic error".
pub fn resolve_type(type_name: &str) -> Option<ServerErrorKind> {
    match type_name {
        TIMEOUT_EXCEPTION_TYPE => return Some(ServerErrorKind::Timeout),
        ARGUMENT_NULL_EXCEPTION_TYPE => return Some(ServerErrorKind::IllegalArgument),
        _ => {}
    }

    let name = type_name.strip_prefix(EXCEPTION_NAMESPACE_PREFIX)?;
    if name.is_empty() {
        return None;
    }

    let path = name.replace('.', "::");
    EXCEPTION_TYPES
        .iter()
        .find(|(candidate, _)| *candidate == path)
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_literal_aliases() {
        assert_eq!(resolve_type("System.TimeoutException"), Some(ServerErrorKind::Timeout));
        assert_eq!(
            resolve_type("System.ArgumentNullException"),
            Some(ServerErrorKind::IllegalArgument)
        );
    }

    #[test]
    fn test_resolve_top_level_name() {
        assert_eq!(
            resolve_type("Raven.Client.Exceptions.ConcurrencyException"),
            Some(ServerErrorKind::Concurrency)
        );
    }

    #[test]
    fn test_resolve_nested_names() {
        assert_eq!(
            resolve_type("Raven.Client.Exceptions.Documents.DocumentConflictException"),
            Some(ServerErrorKind::DocumentConflict)
        );
        assert_eq!(
            resolve_type("Raven.Client.Exceptions.Database.DatabaseDoesNotExistException"),
            Some(ServerErrorKind::DatabaseDoesNotExist)
        );
        assert_eq!(
            resolve_type("Raven.Client.Exceptions.Documents.Compilation.IndexCompilationException"),
            Some(ServerErrorKind::IndexCompilation)
        );
    }

    #[test]
    fn test_resolve_unknown_names() {
        assert_eq!(resolve_type("Raven.Client.Exceptions.NoSuchException"), None);
        assert_eq!(resolve_type("Raven.Client.Exceptions.A.B.C.D.Exception"), None);
        assert_eq!(resolve_type("Raven.Client.Exceptions."), None);
        assert_eq!(resolve_type("System.InvalidOperationException"), None);
        assert_eq!(resolve_type(""), None);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        assert_eq!(resolve_type("raven.client.exceptions.ConcurrencyException"), None);
        assert_eq!(resolve_type("system.timeoutexception"), None);
    }

    #[test]
    fn test_table_has_no_duplicate_paths() {
        for (i, (path, _)) in EXCEPTION_TYPES.iter().enumerate() {
            assert!(
                EXCEPTION_TYPES[i + 1..].iter().all(|(other, _)| other != path),
                "duplicate path {path}"
            );
        }
    }

    #[test]
    fn test_every_table_entry_round_trips() {
        for (path, kind) in EXCEPTION_TYPES {
            let origin = format!("Raven.Client.Exceptions.{}", path.replace("::", "."));
            assert_eq!(resolve_type(&origin), Some(*kind), "{origin}");
        }
    }

    #[test]
    fn test_into_error_dedicated_variants() {
        assert!(matches!(
            ServerErrorKind::Timeout.into_error("t"),
            RavenError::Timeout(m) if m == "t"
        ));
        assert!(matches!(
            ServerErrorKind::DocumentConflict.into_error("c"),
            RavenError::DocumentConflict(_)
        ));
        assert!(matches!(
            ServerErrorKind::IndexCompilation.into_error("i"),
            RavenError::IndexCompilation(_)
        ));
        assert!(matches!(
            ServerErrorKind::RouteNotFound.into_error("r"),
            RavenError::Server { kind: ServerErrorKind::RouteNotFound, .. }
        ));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ServerErrorKind::DocumentDoesNotExist.name(), "DocumentDoesNotExistException");
        assert_eq!(ServerErrorKind::Timeout.to_string(), "TimeoutException");
        assert_eq!(
            ServerErrorKind::AttachmentDoesNotExist.name(),
            "AttachmentDoesNotExistException"
        );
    }
}
