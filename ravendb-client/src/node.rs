//! Descriptor of the cluster node a request is sent to.

use std::sync::atomic::{AtomicBool, Ordering};

/// Capabilities negotiated with a node, captured as one consistent snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeCapabilities {
    /// Whether the node accepts optimistic-concurrency tokens inside
    /// cluster-wide transactions.
    pub supports_atomic_cluster_writes: bool,
}

/// A database node of the cluster.
///
/// The url and database are fixed; the capability flag may be refreshed by the
/// topology layer at any time while batches are being built against the node.
#[derive(Debug)]
pub struct ServerNode {
    url: String,
    database: String,
    cluster_tag: Option<String>,
    supports_atomic_cluster_writes: AtomicBool,
}

impl ServerNode {
    /// Creates a node descriptor. A trailing `/` on the url is dropped.
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self {
            url,
            database: database.into(),
            cluster_tag: None,
            supports_atomic_cluster_writes: AtomicBool::new(false),
        }
    }

    /// Sets the node's cluster tag (e.g. `"A"`).
    pub fn with_cluster_tag(mut self, tag: impl Into<String>) -> Self {
        self.cluster_tag = Some(tag.into());
        self
    }

    /// Sets the initial atomic-write capability.
    pub fn with_atomic_cluster_writes(self, supported: bool) -> Self {
        self.supports_atomic_cluster_writes
            .store(supported, Ordering::Release);
        self
    }

    /// Returns the base url of the node.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the cluster tag, if known.
    pub fn cluster_tag(&self) -> Option<&str> {
        self.cluster_tag.as_deref()
    }

    /// Returns whether the node currently supports atomic cluster writes.
    pub fn supports_atomic_cluster_writes(&self) -> bool {
        self.supports_atomic_cluster_writes.load(Ordering::Acquire)
    }

    /// Updates the atomic-write capability.
    pub fn set_supports_atomic_cluster_writes(&self, supported: bool) {
        self.supports_atomic_cluster_writes
            .store(supported, Ordering::Release);
    }

    /// Captures the current capabilities.
    pub fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities {
            supports_atomic_cluster_writes: self.supports_atomic_cluster_writes(),
        }
    }
}
