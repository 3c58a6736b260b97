//! Counter operations.

use ravendb_core::Result;
use serde_json::{json, Map, Value};

use super::{require_non_blank, CommandType, SerializeCommand, FIELD_ID, FIELD_TYPE};
use crate::conventions::SerializationConventions;

/// Kind of a counter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterOperationType {
    /// Add a delta (creating the counter when missing).
    Increment,
    /// Remove the counter.
    Delete,
}

impl CounterOperationType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Increment => "Increment",
            Self::Delete => "Delete",
        }
    }
}

/// One operation on a named counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterOperation {
    counter_name: String,
    operation_type: CounterOperationType,
    delta: i64,
}

impl CounterOperation {
    /// Adds `delta` to the counter.
    pub fn increment(counter_name: impl Into<String>, delta: i64) -> Self {
        Self {
            counter_name: counter_name.into(),
            operation_type: CounterOperationType::Increment,
            delta,
        }
    }

    /// Deletes the counter.
    pub fn delete(counter_name: impl Into<String>) -> Self {
        Self {
            counter_name: counter_name.into(),
            operation_type: CounterOperationType::Delete,
            delta: 0,
        }
    }

    /// Returns the counter name.
    pub fn counter_name(&self) -> &str {
        &self.counter_name
    }

    /// Returns the operation kind.
    pub fn operation_type(&self) -> CounterOperationType {
        self.operation_type
    }

    fn to_json(&self) -> Value {
        let mut node = Map::new();
        node.insert(FIELD_TYPE.into(), json!(self.operation_type.as_str()));
        node.insert("CounterName".into(), Value::String(self.counter_name.clone()));
        if self.operation_type == CounterOperationType::Increment {
            node.insert("Delta".into(), json!(self.delta));
        }
        Value::Object(node)
    }
}

/// Counter operations on one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountersBatchCommandData {
    id: String,
    operations: Vec<CounterOperation>,
    from_etl: bool,
}

impl CountersBatchCommandData {
    /// Creates counter operations on document `id`.
    pub fn new(id: impl Into<String>, operations: Vec<CounterOperation>) -> Result<Self> {
        let id = id.into();
        require_non_blank(&id, "Document id")?;
        for operation in &operations {
            require_non_blank(&operation.counter_name, "Counter name")?;
        }
        Ok(Self {
            id,
            operations,
            from_etl: false,
        })
    }

    /// Marks the operations as originating from ETL.
    pub fn with_from_etl(mut self, from_etl: bool) -> Self {
        self.from_etl = from_etl;
        self
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the operations, in order.
    pub fn operations(&self) -> &[CounterOperation] {
        &self.operations
    }
}

impl SerializeCommand for CountersBatchCommandData {
    fn serialize(
        &self,
        _conventions: &dyn SerializationConventions,
    ) -> Result<Map<String, Value>> {
        let operations: Vec<Value> = self
            .operations
            .iter()
            .map(CounterOperation::to_json)
            .collect();

        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.id.clone()));
        fragment.insert(
            "Counters".into(),
            json!({
                "DocumentId": self.id,
                "Operations": operations,
            }),
        );
        fragment.insert(FIELD_TYPE.into(), json!(CommandType::Counters.as_str()));
        if self.from_etl {
            fragment.insert("FromEtl".into(), Value::Bool(true));
        }
        Ok(fragment)
    }
}
