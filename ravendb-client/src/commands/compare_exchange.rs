//! Compare-exchange operations, used by cluster-wide transactions.

use ravendb_core::Result;
use serde_json::{json, Map, Value};

use super::{require_non_blank, CommandType, SerializeCommand, FIELD_ID, FIELD_TYPE};
use crate::conventions::SerializationConventions;

/// Stores a compare-exchange value if its current index matches.
#[derive(Debug, Clone, PartialEq)]
pub struct PutCompareExchangeCommandData {
    key: String,
    value: Value,
    index: i64,
}

impl PutCompareExchangeCommandData {
    /// Creates a put of `value` under `key`, expecting the entry's index to be
    /// `index` (0 for a new entry).
    pub fn new(key: impl Into<String>, value: Value, index: i64) -> Result<Self> {
        let key = key.into();
        require_non_blank(&key, "Key")?;
        Ok(Self { key, value, index })
    }

    /// Returns the key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl SerializeCommand for PutCompareExchangeCommandData {
    fn serialize(&self, _conventions: &dyn SerializationConventions) -> Result<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.key.clone()));
        fragment.insert("Document".into(), json!({ "Object": self.value }));
        fragment.insert("Index".into(), json!(self.index));
        fragment.insert(
            FIELD_TYPE.into(),
            json!(CommandType::CompareExchangePut.as_str()),
        );
        Ok(fragment)
    }
}

/// Deletes a compare-exchange value if its current index matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCompareExchangeCommandData {
    key: String,
    index: i64,
}

impl DeleteCompareExchangeCommandData {
    /// Creates a delete of `key` at `index`.
    pub fn new(key: impl Into<String>, index: i64) -> Result<Self> {
        let key = key.into();
        require_non_blank(&key, "Key")?;
        Ok(Self { key, index })
    }

    /// Returns the key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl SerializeCommand for DeleteCompareExchangeCommandData {
    fn serialize(&self, _conventions: &dyn SerializationConventions) -> Result<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.key.clone()));
        fragment.insert("Index".into(), json!(self.index));
        fragment.insert(
            FIELD_TYPE.into(),
            json!(CommandType::CompareExchangeDelete.as_str()),
        );
        Ok(fragment)
    }
}
