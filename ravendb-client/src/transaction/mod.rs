//! Transaction modes for batch writes.

use std::fmt;
use std::str::FromStr;

/// How a batch is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionMode {
    /// Committed by the receiving node alone.
    #[default]
    SingleNode,
    /// Committed through cluster consensus.
    ClusterWide,
}

impl TransactionMode {
    /// Returns the wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleNode => "SingleNode",
            Self::ClusterWide => "ClusterWide",
        }
    }

    /// Returns true for cluster-wide transactions.
    pub fn is_cluster_wide(&self) -> bool {
        matches!(self, Self::ClusterWide)
    }
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown transaction mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTransactionModeError(String);

impl fmt::Display for ParseTransactionModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown transaction mode '{}' (expected single-node or cluster-wide)",
            self.0
        )
    }
}

impl std::error::Error for ParseTransactionModeError {}

impl FromStr for TransactionMode {
    type Err = ParseTransactionModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "singlenode" => Ok(Self::SingleNode),
            "clusterwide" => Ok(Self::ClusterWide),
            _ => Err(ParseTransactionModeError(s.to_string())),
        }
    }
}
