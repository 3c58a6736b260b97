//! Core types and protocols for RavenDB.

#![warn(missing_docs)]

pub mod error;
pub mod protocol;

pub use error::{BoxError, DocumentConflict, IndexCompilation, RavenError, Result};
pub use protocol::{
    ExceptionDispatcher, ExceptionSchema, HttpMethod, HttpRequest, HttpResponse, MultipartBody,
    RequestBody, ServerErrorKind,
};
