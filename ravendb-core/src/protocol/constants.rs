//! Protocol constants for the RavenDB HTTP API.

/// HTTP 409: the conflict family (document conflict or concurrency failure).
pub const HTTP_CONFLICT: u16 = 409;

/// `Accept` header name.
pub const HEADER_ACCEPT: &str = "Accept";

/// `Content-Type` header name.
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// JSON media type.
pub const APPLICATION_JSON: &str = "application/json";

/// Raw binary media type, used for attachment parts.
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

/// Name of the JSON part in a multipart batch body.
pub const MULTIPART_MAIN_PART: &str = "main";

/// Prefix of attachment part names; parts are numbered from 1.
pub const MULTIPART_ATTACHMENT_PART_PREFIX: &str = "attachment";

/// Extra field marking an attachment part.
pub const COMMAND_TYPE_FIELD: &str = "Command-Type";

/// Value of [`COMMAND_TYPE_FIELD`] on attachment parts.
pub const ATTACHMENT_STREAM_COMMAND_TYPE: &str = "AttachmentStream";

/// Namespace prefix of server-side client exceptions.
pub const EXCEPTION_NAMESPACE_PREFIX: &str = "Raven.Client.Exceptions.";

/// Server timeout type, mapped to a local timeout error.
pub const TIMEOUT_EXCEPTION_TYPE: &str = "System.TimeoutException";

/// Server null-argument type, mapped to a local illegal-argument error.
pub const ARGUMENT_NULL_EXCEPTION_TYPE: &str = "System.ArgumentNullException";

/// Substring identifying a document conflict in the exception type.
pub const DOCUMENT_CONFLICT_TYPE_MARKER: &str = "DocumentConflictException";

/// Auxiliary error field carrying the failing index definition property.
pub const TRANSFORMER_DEFINITION_PROPERTY_FIELD: &str = "TransformerDefinitionProperty";

/// Auxiliary error field carrying the rejected source text.
pub const PROBLEMATIC_TEXT_FIELD: &str = "ProblematicText";
