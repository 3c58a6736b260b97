use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server answer to a batch.
///
/// `results` is positional: entry `i` describes operation `i` of the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchCommandResult {
    /// Per-operation result records, in submission order.
    #[serde(default)]
    pub results: Vec<Value>,
    /// Raft index of a cluster-wide transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_index: Option<i64>,
}

impl BatchCommandResult {
    /// Returns the result record of operation `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.results.get(index)
    }

    /// Returns the number of result records.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true when the server sent no result records.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
