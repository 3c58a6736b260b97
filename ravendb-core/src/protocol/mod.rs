//! RavenDB HTTP protocol types.
//!
//! This module holds the transport-neutral request/response model, the server's
//! JSON error envelope, and the dispatcher that maps error envelopes onto the
//! driver's error family.

pub mod constants;
mod dispatcher;
mod exception_schema;
mod exception_types;
mod http;
mod time_span;

pub use dispatcher::ExceptionDispatcher;
pub use exception_schema::ExceptionSchema;
pub use exception_types::{resolve_type, ServerErrorKind, EXCEPTION_TYPES};
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartBody, MultipartPart, RequestBody};
pub use time_span::duration_to_time_span;
