//! Whole-document operations: put, delete, patch and forced revisions.

use ravendb_core::Result;
use serde_json::{json, Map, Value};

use super::{
    optional_string, require_non_blank, CommandType, SerializeCommand, FIELD_CHANGE_VECTOR,
    FIELD_ID, FIELD_ORIGINAL_CHANGE_VECTOR, FIELD_TYPE,
};
use crate::conventions::{DocumentMetadata, SerializationConventions};

/// Stores a document.
#[derive(Debug, Clone, PartialEq)]
pub struct PutCommandData {
    id: String,
    change_vector: Option<String>,
    original_change_vector: Option<String>,
    document: Value,
    metadata: Option<DocumentMetadata>,
    force_revision: bool,
}

impl PutCommandData {
    /// Creates a put. An empty id lets the server generate one.
    pub fn new(id: impl Into<String>, change_vector: Option<String>, document: Value) -> Self {
        Self {
            id: id.into(),
            change_vector,
            original_change_vector: None,
            document,
            metadata: None,
            force_revision: false,
        }
    }

    /// Sets the change vector the document had when it was loaded.
    pub fn with_original_change_vector(mut self, change_vector: impl Into<String>) -> Self {
        self.original_change_vector = Some(change_vector.into());
        self
    }

    /// Sets the metadata written under `@metadata`.
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Asks the server to create a revision before overwriting the document.
    pub fn with_forced_revision(mut self) -> Self {
        self.force_revision = true;
        self
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the expected change vector.
    pub fn change_vector(&self) -> Option<&str> {
        self.change_vector.as_deref()
    }

    /// Returns the original change vector.
    pub fn original_change_vector(&self) -> Option<&str> {
        self.original_change_vector.as_deref()
    }

    /// Returns the document body.
    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl SerializeCommand for PutCommandData {
    fn serialize(&self, conventions: &dyn SerializationConventions) -> Result<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.id.clone()));
        fragment.insert(
            FIELD_CHANGE_VECTOR.into(),
            optional_string(self.change_vector.as_deref()),
        );
        if let Some(original) = &self.original_change_vector {
            fragment.insert(FIELD_ORIGINAL_CHANGE_VECTOR.into(), Value::String(original.clone()));
        }
        fragment.insert(
            "Document".into(),
            conventions.entity_to_json(&self.document, self.metadata.as_ref())?,
        );
        fragment.insert(FIELD_TYPE.into(), json!(CommandType::Put.as_str()));
        if self.force_revision {
            fragment.insert("ForceRevisionCreationStrategy".into(), json!("Before"));
        }
        Ok(fragment)
    }
}

/// Deletes a document, or every document whose id starts with a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCommandData {
    id: String,
    change_vector: Option<String>,
    original_change_vector: Option<String>,
    id_prefixed: bool,
}

impl DeleteCommandData {
    /// Creates a delete of a single document.
    pub fn new(id: impl Into<String>, change_vector: Option<String>) -> Result<Self> {
        let id = id.into();
        require_non_blank(&id, "Id")?;
        Ok(Self {
            id,
            change_vector,
            original_change_vector: None,
            id_prefixed: false,
        })
    }

    /// Creates a delete of every document whose id starts with `prefix`.
    pub fn prefixed(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        require_non_blank(&prefix, "Prefix")?;
        Ok(Self {
            id: prefix,
            change_vector: None,
            original_change_vector: None,
            id_prefixed: true,
        })
    }

    /// Sets the change vector the document had when it was loaded.
    pub fn with_original_change_vector(mut self, change_vector: impl Into<String>) -> Self {
        self.original_change_vector = Some(change_vector.into());
        self
    }

    /// Returns the document id (or prefix).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the expected change vector.
    pub fn change_vector(&self) -> Option<&str> {
        self.change_vector.as_deref()
    }

    /// Returns true when the id is a prefix.
    pub fn is_prefixed(&self) -> bool {
        self.id_prefixed
    }
}

impl SerializeCommand for DeleteCommandData {
    fn serialize(&self, _conventions: &dyn SerializationConventions) -> Result<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.id.clone()));
        fragment.insert(
            FIELD_CHANGE_VECTOR.into(),
            optional_string(self.change_vector.as_deref()),
        );
        if let Some(original) = &self.original_change_vector {
            fragment.insert(FIELD_ORIGINAL_CHANGE_VECTOR.into(), Value::String(original.clone()));
        }
        fragment.insert(FIELD_TYPE.into(), json!(CommandType::Delete.as_str()));
        if self.id_prefixed {
            fragment.insert("IdPrefixed".into(), Value::Bool(true));
        }
        Ok(fragment)
    }
}

/// A server-side patch script with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchRequest {
    script: String,
    values: Map<String, Value>,
}

impl PatchRequest {
    /// Creates a patch running `script`.
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            values: Map::new(),
        }
    }

    /// Adds a named argument available to the script as `args.<name>`.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns the script.
    pub fn script(&self) -> &str {
        &self.script
    }

    fn to_json(&self) -> Value {
        json!({
            "Script": self.script,
            "Values": Value::Object(self.values.clone()),
        })
    }
}

/// Patches a document with a script.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchCommandData {
    id: String,
    change_vector: Option<String>,
    patch: PatchRequest,
    patch_if_missing: Option<PatchRequest>,
    create_if_missing: Option<Value>,
    return_document: bool,
}

impl PatchCommandData {
    /// Creates a patch of document `id`.
    pub fn new(
        id: impl Into<String>,
        change_vector: Option<String>,
        patch: PatchRequest,
    ) -> Result<Self> {
        let id = id.into();
        require_non_blank(&id, "Id")?;
        require_non_blank(patch.script(), "Patch script")?;
        Ok(Self {
            id,
            change_vector,
            patch,
            patch_if_missing: None,
            create_if_missing: None,
            return_document: false,
        })
    }

    /// Sets the patch applied when the document does not exist.
    pub fn with_patch_if_missing(mut self, patch: PatchRequest) -> Self {
        self.patch_if_missing = Some(patch);
        self
    }

    /// Sets the document created when the target does not exist.
    pub fn with_create_if_missing(mut self, document: Value) -> Self {
        self.create_if_missing = Some(document);
        self
    }

    /// Asks the server to return the patched document.
    pub fn with_return_document(mut self, return_document: bool) -> Self {
        self.return_document = return_document;
        self
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

impl SerializeCommand for PatchCommandData {
    fn serialize(&self, _conventions: &dyn SerializationConventions) -> Result<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.id.clone()));
        fragment.insert(
            FIELD_CHANGE_VECTOR.into(),
            optional_string(self.change_vector.as_deref()),
        );
        fragment.insert("Patch".into(), self.patch.to_json());
        fragment.insert(FIELD_TYPE.into(), json!(CommandType::Patch.as_str()));
        if let Some(patch) = &self.patch_if_missing {
            fragment.insert("PatchIfMissing".into(), patch.to_json());
        }
        if let Some(document) = &self.create_if_missing {
            fragment.insert("CreateIfMissing".into(), document.clone());
        }
        if self.return_document {
            fragment.insert("ReturnDocument".into(), Value::Bool(true));
        }
        Ok(fragment)
    }
}

/// Forces the server to create a revision of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceRevisionCommandData {
    id: String,
}

impl ForceRevisionCommandData {
    /// Creates a forced revision of document `id`.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        require_non_blank(&id, "Id")?;
        Ok(Self { id })
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl SerializeCommand for ForceRevisionCommandData {
    fn serialize(&self, _conventions: &dyn SerializationConventions) -> Result<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.id.clone()));
        fragment.insert(
            FIELD_TYPE.into(),
            json!(CommandType::ForceRevisionCreation.as_str()),
        );
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::DocumentConventions;
    use ravendb_core::RavenError;

    fn conventions() -> DocumentConventions {
        DocumentConventions::default()
    }

    #[test]
    fn test_put_serialization() {
        let put = PutCommandData::new("users/1", None, json!({"Name": "Alice"}));
        let fragment = put.serialize(&conventions()).unwrap();
        assert_eq!(
            Value::Object(fragment),
            json!({
                "Id": "users/1",
                "ChangeVector": null,
                "Document": {"Name": "Alice"},
                "Type": "PUT"
            })
        );
    }

    #[test]
    fn test_put_with_original_change_vector_and_metadata() {
        let put = PutCommandData::new("users/1", Some("A:2".into()), json!({"Name": "Alice"}))
            .with_original_change_vector("A:1")
            .with_metadata(DocumentMetadata::new().with_collection("Users"))
            .with_forced_revision();
        let fragment = put.serialize(&conventions()).unwrap();
        assert_eq!(fragment[FIELD_ORIGINAL_CHANGE_VECTOR], json!("A:1"));
        assert_eq!(fragment[FIELD_CHANGE_VECTOR], json!("A:2"));
        assert_eq!(fragment["Document"]["@metadata"]["@collection"], json!("Users"));
        assert_eq!(fragment["ForceRevisionCreationStrategy"], json!("Before"));
    }

    #[test]
    fn test_put_rejects_non_object_document() {
        let put = PutCommandData::new("users/1", None, json!("text"));
        assert!(matches!(
            put.serialize(&conventions()),
            Err(RavenError::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_delete_requires_id() {
        assert!(DeleteCommandData::new("", None).is_err());
    }

    #[test]
    fn test_delete_prefixed() {
        let delete = DeleteCommandData::prefixed("users/").unwrap();
        assert!(delete.is_prefixed());
        let fragment = delete.serialize(&conventions()).unwrap();
        assert_eq!(fragment["IdPrefixed"], json!(true));
        assert_eq!(fragment[FIELD_TYPE], json!("DELETE"));
    }

    #[test]
    fn test_delete_original_change_vector() {
        let delete = DeleteCommandData::new("users/1", Some("A:5".into()))
            .unwrap()
            .with_original_change_vector("A:4");
        let fragment = delete.serialize(&conventions()).unwrap();
        assert_eq!(fragment[FIELD_ORIGINAL_CHANGE_VECTOR], json!("A:4"));
    }

    #[test]
    fn test_patch_serialization() {
        let patch = PatchCommandData::new(
            "users/1",
            None,
            PatchRequest::new("this.Age += args.delta").with_value("delta", 1),
        )
        .unwrap()
        .with_patch_if_missing(PatchRequest::new("this.Age = 1"))
        .with_create_if_missing(json!({"Age": 0}))
        .with_return_document(true);

        let fragment = patch.serialize(&conventions()).unwrap();
        assert_eq!(
            fragment["Patch"],
            json!({"Script": "this.Age += args.delta", "Values": {"delta": 1}})
        );
        assert_eq!(fragment["PatchIfMissing"]["Script"], json!("this.Age = 1"));
        assert_eq!(fragment["CreateIfMissing"], json!({"Age": 0}));
        assert_eq!(fragment["ReturnDocument"], json!(true));
        assert_eq!(fragment[FIELD_TYPE], json!("PATCH"));
    }

    #[test]
    fn test_patch_omits_optional_fields() {
        let patch =
            PatchCommandData::new("users/1", None, PatchRequest::new("this.x = 1")).unwrap();
        let fragment = patch.serialize(&conventions()).unwrap();
        assert!(!fragment.contains_key("PatchIfMissing"));
        assert!(!fragment.contains_key("CreateIfMissing"));
        assert!(!fragment.contains_key("ReturnDocument"));
    }

    #[test]
    fn test_patch_requires_script() {
        assert!(PatchCommandData::new("users/1", None, PatchRequest::new(" ")).is_err());
    }

    #[test]
    fn test_force_revision() {
        let command = ForceRevisionCommandData::new("users/1").unwrap();
        let fragment = command.serialize(&conventions()).unwrap();
        assert_eq!(fragment[FIELD_TYPE], json!("ForceRevisionCreation"));
        assert!(ForceRevisionCommandData::new("").is_err());
    }
}
