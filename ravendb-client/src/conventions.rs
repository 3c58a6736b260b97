//! Serialization conventions shared by every command of a batch.

use std::time::Duration;

use ravendb_core::protocol::duration_to_time_span;
use ravendb_core::{RavenError, Result};
use serde_json::{Map, Value};

use crate::transaction::TransactionMode;

/// Key of the metadata object embedded in a stored document.
pub const METADATA_KEY: &str = "@metadata";

/// Metadata key holding the document's collection name.
pub const METADATA_COLLECTION: &str = "@collection";

/// Metadata written alongside a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    collection: Option<String>,
    entries: Map<String, Value>,
}

impl DocumentMetadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collection the document belongs to.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Adds a metadata entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Returns the collection, if set.
    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// Returns the user metadata entries.
    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Returns true when nothing would be written.
    pub fn is_empty(&self) -> bool {
        self.collection.is_none() && self.entries.is_empty()
    }
}

/// The capability commands use to turn their payloads into wire JSON.
pub trait SerializationConventions: Send + Sync {
    /// Converts an entity document into the JSON stored on the server, embedding
    /// `metadata` under `@metadata`.
    fn entity_to_json(
        &self,
        document: &Value,
        metadata: Option<&DocumentMetadata>,
    ) -> Result<Value>;

    /// Renders a duration as wire text.
    fn duration_to_time_span(&self, duration: Duration) -> String {
        duration_to_time_span(duration)
    }
}

/// Default conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConventions {
    identity_property: Option<String>,
    transaction_mode: TransactionMode,
}

impl DocumentConventions {
    /// Creates a builder.
    pub fn builder() -> DocumentConventionsBuilder {
        DocumentConventionsBuilder::new()
    }

    /// Returns the property removed from documents before they are stored
    /// (the id is carried by the command instead).
    pub fn identity_property(&self) -> Option<&str> {
        self.identity_property.as_deref()
    }

    /// Returns the transaction mode used when a batch does not choose one.
    pub fn transaction_mode(&self) -> TransactionMode {
        self.transaction_mode
    }
}

impl Default for DocumentConventions {
    fn default() -> Self {
        Self {
            identity_property: None,
            transaction_mode: TransactionMode::SingleNode,
        }
    }
}

impl SerializationConventions for DocumentConventions {
    fn entity_to_json(
        &self,
        document: &Value,
        metadata: Option<&DocumentMetadata>,
    ) -> Result<Value> {
        let Value::Object(fields) = document else {
            return Err(RavenError::IllegalArgument(
                "document must be a JSON object".to_string(),
            ));
        };

        let mut fields = fields.clone();
        if let Some(identity) = &self.identity_property {
            fields.remove(identity);
        }

        if let Some(metadata) = metadata.filter(|m| !m.is_empty()) {
            let mut node = metadata.entries.clone();
            if let Some(collection) = &metadata.collection {
                node.insert(METADATA_COLLECTION.to_string(), Value::String(collection.clone()));
            }
            fields.insert(METADATA_KEY.to_string(), Value::Object(node));
        }

        Ok(Value::Object(fields))
    }
}

/// Builder for [`DocumentConventions`].
#[derive(Debug, Clone, Default)]
pub struct DocumentConventionsBuilder {
    identity_property: Option<String>,
    transaction_mode: Option<TransactionMode>,
}

impl DocumentConventionsBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identity property stripped from stored documents.
    pub fn identity_property(mut self, property: impl Into<String>) -> Self {
        self.identity_property = Some(property.into());
        self
    }

    /// Sets the default transaction mode.
    pub fn transaction_mode(mut self, mode: TransactionMode) -> Self {
        self.transaction_mode = Some(mode);
        self
    }

    /// Builds the conventions.
    pub fn build(self) -> DocumentConventions {
        DocumentConventions {
            identity_property: self.identity_property.filter(|p| !p.is_empty()),
            transaction_mode: self.transaction_mode.unwrap_or_default(),
        }
    }
}
