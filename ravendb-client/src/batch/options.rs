//! Replication and indexing waits requested alongside a batch.

use std::fmt::Write as _;
use std::time::Duration;

use url::form_urlencoded;

use crate::conventions::SerializationConventions;

/// How many replicas must acknowledge the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicasToWaitFor {
    /// A majority of the database group.
    Majority,
    /// An explicit replica count.
    Count(u32),
}

impl Default for ReplicasToWaitFor {
    fn default() -> Self {
        Self::Count(1)
    }
}

/// Wait for the batch to reach other nodes before the server answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationBatchOptions {
    wait_for_replicas_timeout: Duration,
    throw_on_timeout_in_wait_for_replicas: bool,
    replicas: ReplicasToWaitFor,
}

impl ReplicationBatchOptions {
    /// Waits up to `timeout` for `replicas`; a timeout fails the batch.
    pub fn new(timeout: Duration, replicas: ReplicasToWaitFor) -> Self {
        Self {
            wait_for_replicas_timeout: timeout,
            throw_on_timeout_in_wait_for_replicas: true,
            replicas,
        }
    }

    /// Sets whether a replication timeout fails the batch.
    pub fn throw_on_timeout(mut self, throw: bool) -> Self {
        self.throw_on_timeout_in_wait_for_replicas = throw;
        self
    }

    /// Returns the replication wait timeout.
    pub fn wait_for_replicas_timeout(&self) -> Duration {
        self.wait_for_replicas_timeout
    }

    /// Returns whether a timeout fails the batch.
    pub fn throw_on_timeout_in_wait_for_replicas(&self) -> bool {
        self.throw_on_timeout_in_wait_for_replicas
    }

    /// Returns the replicas to wait for.
    pub fn replicas(&self) -> ReplicasToWaitFor {
        self.replicas
    }
}

/// Wait for indexes to catch up with the batch before the server answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBatchOptions {
    wait_for_indexes_timeout: Duration,
    throw_on_timeout_in_wait_for_indexes: bool,
    wait_for_specific_indexes: Vec<String>,
}

impl IndexBatchOptions {
    /// Waits up to `timeout` for every affected index; a timeout fails the batch.
    pub fn new(timeout: Duration) -> Self {
        Self {
            wait_for_indexes_timeout: timeout,
            throw_on_timeout_in_wait_for_indexes: true,
            wait_for_specific_indexes: Vec::new(),
        }
    }

    /// Sets whether an indexing timeout fails the batch.
    pub fn throw_on_timeout(mut self, throw: bool) -> Self {
        self.throw_on_timeout_in_wait_for_indexes = throw;
        self
    }

    /// Restricts the wait to the named index. May be called repeatedly.
    pub fn wait_for_index(mut self, name: impl Into<String>) -> Self {
        self.wait_for_specific_indexes.push(name.into());
        self
    }

    /// Returns the indexing wait timeout.
    pub fn wait_for_indexes_timeout(&self) -> Duration {
        self.wait_for_indexes_timeout
    }

    /// Returns whether a timeout fails the batch.
    pub fn throw_on_timeout_in_wait_for_indexes(&self) -> bool {
        self.throw_on_timeout_in_wait_for_indexes
    }

    /// Returns the indexes waited for; empty means all affected indexes.
    pub fn wait_for_specific_indexes(&self) -> &[String] {
        &self.wait_for_specific_indexes
    }
}

/// Options of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    replication: Option<ReplicationBatchOptions>,
    index: Option<IndexBatchOptions>,
}

impl BatchOptions {
    /// Creates options without any waits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replication wait.
    pub fn with_replication(mut self, options: ReplicationBatchOptions) -> Self {
        self.replication = Some(options);
        self
    }

    /// Sets the indexing wait.
    pub fn with_index(mut self, options: IndexBatchOptions) -> Self {
        self.index = Some(options);
        self
    }

    /// Returns the replication wait, if any.
    pub fn replication(&self) -> Option<&ReplicationBatchOptions> {
        self.replication.as_ref()
    }

    /// Returns the indexing wait, if any.
    pub fn index(&self) -> Option<&IndexBatchOptions> {
        self.index.as_ref()
    }

    /// Renders the options as query parameters, each prefixed with `&`.
    ///
    /// Replication parameters come first, then indexing parameters; an absent
    /// options object contributes nothing.
    pub fn append_query(&self, conventions: &dyn SerializationConventions) -> String {
        let mut query = String::new();

        if let Some(replication) = &self.replication {
            let _ = write!(
                query,
                "&waitForReplicasTimeout={}&throwOnTimeoutInWaitForReplicas={}&numberOfReplicasToWaitFor=",
                conventions.duration_to_time_span(replication.wait_for_replicas_timeout),
                replication.throw_on_timeout_in_wait_for_replicas,
            );
            match replication.replicas {
                ReplicasToWaitFor::Majority => query.push_str("majority"),
                ReplicasToWaitFor::Count(n) => {
                    let _ = write!(query, "{n}");
                }
            }
        }

        if let Some(index) = &self.index {
            let _ = write!(
                query,
                "&waitForIndexesTimeout={}&waitForIndexThrow={}",
                conventions.duration_to_time_span(index.wait_for_indexes_timeout),
                index.throw_on_timeout_in_wait_for_indexes,
            );
            for name in &index.wait_for_specific_indexes {
                query.push_str("&waitForSpecificIndex=");
                query.extend(form_urlencoded::byte_serialize(name.as_bytes()));
            }
        }

        query
    }
}
