//! Document operations that can be sent in a batch.
//!
//! Every operation serializes itself into one JSON object (a "command fragment")
//! of the `Commands` array of a `bulk_docs` request. Operations are immutable once
//! built; the session layer creates them and hands them to
//! [`SingleNodeBatchCommand`](crate::batch::SingleNodeBatchCommand).

use std::fmt;

use ravendb_core::{RavenError, Result};
use serde_json::{Map, Value};

use crate::conventions::SerializationConventions;

mod attachments;
mod compare_exchange;
mod counters;
mod document;
mod time_series;

pub use attachments::{
    AttachmentStream, CopyAttachmentCommandData, DeleteAttachmentCommandData,
    MoveAttachmentCommandData, PutAttachmentCommandData,
};
pub use compare_exchange::{DeleteCompareExchangeCommandData, PutCompareExchangeCommandData};
pub use counters::{CounterOperation, CounterOperationType, CountersBatchCommandData};
pub use document::{
    DeleteCommandData, ForceRevisionCommandData, PatchCommandData, PatchRequest, PutCommandData,
};
pub use time_series::{
    TimeSeriesAppend, TimeSeriesBatchCommandData, TimeSeriesDelete, TIME_SERIES_ROLLUP_SEPARATOR,
};

/// Wire field carrying the document id.
pub const FIELD_ID: &str = "Id";
/// Wire field carrying the expected change vector.
pub const FIELD_CHANGE_VECTOR: &str = "ChangeVector";
/// Wire field carrying the change vector captured when the document was loaded.
/// Only nodes with atomic cluster-write support accept it.
pub const FIELD_ORIGINAL_CHANGE_VECTOR: &str = "OriginalChangeVector";
/// Wire field carrying the command type.
pub const FIELD_TYPE: &str = "Type";

/// Kind of a batch command, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    /// Store a document.
    Put,
    /// Delete a document (or every document with an id prefix).
    Delete,
    /// Run a patch script against a document.
    Patch,
    /// Store an attachment.
    AttachmentPut,
    /// Delete an attachment.
    AttachmentDelete,
    /// Copy an attachment to another document.
    AttachmentCopy,
    /// Move an attachment to another document.
    AttachmentMove,
    /// Counter increments/deletes on a document.
    Counters,
    /// Time-series appends/deletes on a document.
    TimeSeries,
    /// Store a compare-exchange value.
    CompareExchangePut,
    /// Delete a compare-exchange value.
    CompareExchangeDelete,
    /// Force a revision of a document.
    ForceRevisionCreation,
}

impl CommandType {
    /// Returns the wire name of the command type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::AttachmentPut => "AttachmentPUT",
            Self::AttachmentDelete => "AttachmentDELETE",
            Self::AttachmentCopy => "AttachmentCOPY",
            Self::AttachmentMove => "AttachmentMOVE",
            Self::Counters => "Counters",
            Self::TimeSeries => "TimeSeries",
            Self::CompareExchangePut => "CompareExchangePUT",
            Self::CompareExchangeDelete => "CompareExchangeDELETE",
            Self::ForceRevisionCreation => "ForceRevisionCreation",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialization of a single operation into its command fragment.
pub trait SerializeCommand {
    /// Serializes the operation using the shared conventions.
    fn serialize(&self, conventions: &dyn SerializationConventions) -> Result<Map<String, Value>>;
}

/// One document operation of a batch.
#[derive(Debug, Clone)]
pub enum CommandData {
    /// Store a document.
    Put(PutCommandData),
    /// Delete a document.
    Delete(DeleteCommandData),
    /// Patch a document.
    Patch(PatchCommandData),
    /// Store an attachment; owns the attachment payload.
    PutAttachment(PutAttachmentCommandData),
    /// Delete an attachment.
    DeleteAttachment(DeleteAttachmentCommandData),
    /// Copy an attachment.
    CopyAttachment(CopyAttachmentCommandData),
    /// Move an attachment.
    MoveAttachment(MoveAttachmentCommandData),
    /// Counter operations.
    Counters(CountersBatchCommandData),
    /// Time-series operations.
    TimeSeries(TimeSeriesBatchCommandData),
    /// Store a compare-exchange value.
    CompareExchangePut(PutCompareExchangeCommandData),
    /// Delete a compare-exchange value.
    CompareExchangeDelete(DeleteCompareExchangeCommandData),
    /// Force a revision.
    ForceRevisionCreation(ForceRevisionCommandData),
}

impl CommandData {
    fn inner(&self) -> &dyn SerializeCommand {
        match self {
            Self::Put(c) => c,
            Self::Delete(c) => c,
            Self::Patch(c) => c,
            Self::PutAttachment(c) => c,
            Self::DeleteAttachment(c) => c,
            Self::CopyAttachment(c) => c,
            Self::MoveAttachment(c) => c,
            Self::Counters(c) => c,
            Self::TimeSeries(c) => c,
            Self::CompareExchangePut(c) => c,
            Self::CompareExchangeDelete(c) => c,
            Self::ForceRevisionCreation(c) => c,
        }
    }

    /// Returns the target document id (or compare-exchange key).
    pub fn id(&self) -> &str {
        match self {
            Self::Put(c) => c.id(),
            Self::Delete(c) => c.id(),
            Self::Patch(c) => c.id(),
            Self::PutAttachment(c) => c.id(),
            Self::DeleteAttachment(c) => c.id(),
            Self::CopyAttachment(c) => c.id(),
            Self::MoveAttachment(c) => c.id(),
            Self::Counters(c) => c.id(),
            Self::TimeSeries(c) => c.id(),
            Self::CompareExchangePut(c) => c.key(),
            Self::CompareExchangeDelete(c) => c.key(),
            Self::ForceRevisionCreation(c) => c.id(),
        }
    }

    /// Returns the expected change vector, if the operation carries one.
    pub fn change_vector(&self) -> Option<&str> {
        match self {
            Self::Put(c) => c.change_vector(),
            Self::Delete(c) => c.change_vector(),
            Self::Patch(c) => c.change_vector(),
            Self::PutAttachment(c) => c.change_vector(),
            Self::DeleteAttachment(c) => c.change_vector(),
            Self::CopyAttachment(c) => c.change_vector(),
            Self::MoveAttachment(c) => c.change_vector(),
            Self::Counters(_)
            | Self::TimeSeries(_)
            | Self::CompareExchangePut(_)
            | Self::CompareExchangeDelete(_)
            | Self::ForceRevisionCreation(_) => None,
        }
    }

    /// Returns the wire command type.
    pub fn command_type(&self) -> CommandType {
        match self {
            Self::Put(_) => CommandType::Put,
            Self::Delete(_) => CommandType::Delete,
            Self::Patch(_) => CommandType::Patch,
            Self::PutAttachment(_) => CommandType::AttachmentPut,
            Self::DeleteAttachment(_) => CommandType::AttachmentDelete,
            Self::CopyAttachment(_) => CommandType::AttachmentCopy,
            Self::MoveAttachment(_) => CommandType::AttachmentMove,
            Self::Counters(_) => CommandType::Counters,
            Self::TimeSeries(_) => CommandType::TimeSeries,
            Self::CompareExchangePut(_) => CommandType::CompareExchangePut,
            Self::CompareExchangeDelete(_) => CommandType::CompareExchangeDelete,
            Self::ForceRevisionCreation(_) => CommandType::ForceRevisionCreation,
        }
    }

    /// Returns the binary payload owned by the operation, if any.
    pub fn attachment_stream(&self) -> Option<&AttachmentStream> {
        match self {
            Self::PutAttachment(c) => Some(c.stream()),
            _ => None,
        }
    }

    /// Serializes the operation into its command fragment.
    pub fn serialize(
        &self,
        conventions: &dyn SerializationConventions,
    ) -> Result<Map<String, Value>> {
        self.inner().serialize(conventions)
    }
}

macro_rules! impl_from_command {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for CommandData {
                fn from(command: $ty) -> Self {
                    Self::$variant(command)
                }
            }
        )*
    };
}

impl_from_command! {
    Put => PutCommandData,
    Delete => DeleteCommandData,
    Patch => PatchCommandData,
    PutAttachment => PutAttachmentCommandData,
    DeleteAttachment => DeleteAttachmentCommandData,
    CopyAttachment => CopyAttachmentCommandData,
    MoveAttachment => MoveAttachmentCommandData,
    Counters => CountersBatchCommandData,
    TimeSeries => TimeSeriesBatchCommandData,
    CompareExchangePut => PutCompareExchangeCommandData,
    CompareExchangeDelete => DeleteCompareExchangeCommandData,
    ForceRevisionCreation => ForceRevisionCommandData,
}

/// Rejects blank required string arguments.
pub(crate) fn require_non_blank(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RavenError::IllegalArgument(format!(
            "{what} cannot be null or empty"
        )));
    }
    Ok(())
}

/// Converts an optional string into a JSON string or `null`.
pub(crate) fn optional_string(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::String(s.to_string()))
}
