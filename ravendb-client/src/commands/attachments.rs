//! Attachment operations.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use ravendb_core::Result;
use serde_json::{json, Map, Value};

use super::{
    optional_string, require_non_blank, CommandType, SerializeCommand, FIELD_CHANGE_VECTOR,
    FIELD_ID, FIELD_TYPE,
};
use crate::conventions::SerializationConventions;

/// Binary payload of an attachment.
///
/// Clones share the same payload and count as the same stream; a batch rejects
/// a stream that is used by two attachment puts.
#[derive(Clone)]
pub struct AttachmentStream {
    data: Arc<Bytes>,
}

impl AttachmentStream {
    /// Wraps the given payload in a new stream.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: Arc::new(data.into()),
        }
    }

    /// Returns true if both handles refer to the same stream instance.
    pub fn is_same_stream(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Returns the payload. The buffer is shared, not copied.
    pub fn bytes(&self) -> Bytes {
        Bytes::clone(&self.data)
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true for an empty payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for AttachmentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentStream")
            .field("len", &self.data.len())
            .finish()
    }
}

/// Stores an attachment on a document.
#[derive(Debug, Clone)]
pub struct PutAttachmentCommandData {
    id: String,
    name: String,
    stream: AttachmentStream,
    content_type: Option<String>,
    change_vector: Option<String>,
}

impl PutAttachmentCommandData {
    /// Creates an attachment put.
    pub fn new(
        document_id: impl Into<String>,
        name: impl Into<String>,
        stream: AttachmentStream,
        content_type: Option<String>,
        change_vector: Option<String>,
    ) -> Result<Self> {
        let id = document_id.into();
        let name = name.into();
        require_non_blank(&id, "DocumentId")?;
        require_non_blank(&name, "Name")?;
        Ok(Self {
            id,
            name,
            stream,
            content_type,
            change_vector,
        })
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the attachment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attachment payload.
    pub fn stream(&self) -> &AttachmentStream {
        &self.stream
    }

    /// Returns the expected change vector.
    pub fn change_vector(&self) -> Option<&str> {
        self.change_vector.as_deref()
    }
}

impl SerializeCommand for PutAttachmentCommandData {
    fn serialize(&self, _conventions: &dyn SerializationConventions) -> Result<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.id.clone()));
        fragment.insert("Name".into(), Value::String(self.name.clone()));
        fragment.insert("ContentType".into(), optional_string(self.content_type.as_deref()));
        fragment.insert(
            FIELD_CHANGE_VECTOR.into(),
            optional_string(self.change_vector.as_deref()),
        );
        fragment.insert(FIELD_TYPE.into(), json!(CommandType::AttachmentPut.as_str()));
        Ok(fragment)
    }
}

/// Deletes an attachment from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAttachmentCommandData {
    id: String,
    name: String,
    change_vector: Option<String>,
}

impl DeleteAttachmentCommandData {
    /// Creates an attachment delete.
    pub fn new(
        document_id: impl Into<String>,
        name: impl Into<String>,
        change_vector: Option<String>,
    ) -> Result<Self> {
        let id = document_id.into();
        let name = name.into();
        require_non_blank(&id, "DocumentId")?;
        require_non_blank(&name, "Name")?;
        Ok(Self {
            id,
            name,
            change_vector,
        })
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the expected change vector.
    pub fn change_vector(&self) -> Option<&str> {
        self.change_vector.as_deref()
    }
}

impl SerializeCommand for DeleteAttachmentCommandData {
    fn serialize(&self, _conventions: &dyn SerializationConventions) -> Result<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.id.clone()));
        fragment.insert("Name".into(), Value::String(self.name.clone()));
        fragment.insert(
            FIELD_CHANGE_VECTOR.into(),
            optional_string(self.change_vector.as_deref()),
        );
        fragment.insert(
            FIELD_TYPE.into(),
            json!(CommandType::AttachmentDelete.as_str()),
        );
        Ok(fragment)
    }
}

/// Source and destination of an attachment copy or move.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttachmentTransfer {
    source_id: String,
    source_name: String,
    destination_id: String,
    destination_name: String,
    change_vector: Option<String>,
}

impl AttachmentTransfer {
    fn new(
        source_id: String,
        source_name: String,
        destination_id: String,
        destination_name: String,
        change_vector: Option<String>,
    ) -> Result<Self> {
        require_non_blank(&source_id, "SourceDocumentId")?;
        require_non_blank(&source_name, "SourceName")?;
        require_non_blank(&destination_id, "DestinationDocumentId")?;
        require_non_blank(&destination_name, "DestinationName")?;
        Ok(Self {
            source_id,
            source_name,
            destination_id,
            destination_name,
            change_vector,
        })
    }

    fn serialize(&self, command_type: CommandType) -> Map<String, Value> {
        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.source_id.clone()));
        fragment.insert("Name".into(), Value::String(self.source_name.clone()));
        fragment.insert(
            "DestinationId".into(),
            Value::String(self.destination_id.clone()),
        );
        fragment.insert(
            "DestinationName".into(),
            Value::String(self.destination_name.clone()),
        );
        fragment.insert(
            FIELD_CHANGE_VECTOR.into(),
            optional_string(self.change_vector.as_deref()),
        );
        fragment.insert(FIELD_TYPE.into(), json!(command_type.as_str()));
        fragment
    }
}

/// Copies an attachment to another document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyAttachmentCommandData(AttachmentTransfer);

impl CopyAttachmentCommandData {
    /// Creates an attachment copy.
    pub fn new(
        source_document_id: impl Into<String>,
        source_name: impl Into<String>,
        destination_document_id: impl Into<String>,
        destination_name: impl Into<String>,
        change_vector: Option<String>,
    ) -> Result<Self> {
        AttachmentTransfer::new(
            source_document_id.into(),
            source_name.into(),
            destination_document_id.into(),
            destination_name.into(),
            change_vector,
        )
        .map(Self)
    }

    /// Returns the source document id.
    pub fn id(&self) -> &str {
        &self.0.source_id
    }

    /// Returns the expected change vector of the source.
    pub fn change_vector(&self) -> Option<&str> {
        self.0.change_vector.as_deref()
    }
}

impl SerializeCommand for CopyAttachmentCommandData {
    fn serialize(&self, _conventions: &dyn SerializationConventions) -> Result<Map<String, Value>> {
        Ok(self.0.serialize(CommandType::AttachmentCopy))
    }
}

/// Moves an attachment to another document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveAttachmentCommandData(AttachmentTransfer);

impl MoveAttachmentCommandData {
    /// Creates an attachment move.
    pub fn new(
        source_document_id: impl Into<String>,
        source_name: impl Into<String>,
        destination_document_id: impl Into<String>,
        destination_name: impl Into<String>,
        change_vector: Option<String>,
    ) -> Result<Self> {
        AttachmentTransfer::new(
            source_document_id.into(),
            source_name.into(),
            destination_document_id.into(),
            destination_name.into(),
            change_vector,
        )
        .map(Self)
    }

    /// Returns the source document id.
    pub fn id(&self) -> &str {
        &self.0.source_id
    }

    /// Returns the expected change vector of the source.
    pub fn change_vector(&self) -> Option<&str> {
        self.0.change_vector.as_deref()
    }
}

impl SerializeCommand for MoveAttachmentCommandData {
    fn serialize(&self, _conventions: &dyn SerializationConventions) -> Result<Map<String, Value>> {
        Ok(self.0.serialize(CommandType::AttachmentMove))
    }
}
