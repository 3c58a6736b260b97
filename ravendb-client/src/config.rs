//! Client configuration.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::conventions::DocumentConventions;

/// Default server url.
const DEFAULT_URL: &str = "http://localhost:8080";

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration error returned when validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the validation message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Validated client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    urls: Vec<Url>,
    database: String,
    request_timeout: Duration,
    atomic_cluster_writes: bool,
    conventions: Arc<DocumentConventions>,
}

impl ClientConfig {
    /// Creates a new client configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the cluster node urls.
    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    /// Returns the database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns whether nodes are assumed to support atomic cluster writes until
    /// the topology says otherwise.
    pub fn atomic_cluster_writes(&self) -> bool {
        self.atomic_cluster_writes
    }

    /// Returns the serialization conventions shared by every command.
    pub fn conventions(&self) -> &Arc<DocumentConventions> {
        &self.conventions
    }
}

/// Builder for `ClientConfig`.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    urls: Vec<String>,
    database: Option<String>,
    request_timeout: Option<Duration>,
    atomic_cluster_writes: bool,
    conventions: Option<DocumentConventions>,
}

impl ClientConfigBuilder {
    /// Creates a new client configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cluster node url.
    pub fn add_url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    /// Sets the cluster node urls.
    pub fn urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the initial atomic-cluster-write capability of nodes.
    pub fn atomic_cluster_writes(mut self, enabled: bool) -> Self {
        self.atomic_cluster_writes = enabled;
        self
    }

    /// Sets the serialization conventions.
    pub fn conventions(mut self, conventions: DocumentConventions) -> Self {
        self.conventions = Some(conventions);
        self
    }

    /// Builds the client configuration, returning an error if validation fails.
    ///
    /// Returns `ConfigError` if:
    /// - a url is not an absolute `http`/`https` url
    /// - the database name is missing, empty or contains `/`
    /// - the request timeout is zero
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let raw_urls = if self.urls.is_empty() {
            vec![DEFAULT_URL.to_string()]
        } else {
            self.urls
        };
        let urls = raw_urls
            .iter()
            .map(|raw| parse_url(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let database = self
            .database
            .ok_or_else(|| ConfigError::new("database must be set"))?;
        let database = database.trim().to_string();
        if database.is_empty() {
            return Err(ConfigError::new("database must not be empty"));
        }
        if database.contains('/') {
            return Err(ConfigError::new(format!(
                "database name '{}' must not contain '/'",
                database
            )));
        }

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout.is_zero() {
            return Err(ConfigError::new("request_timeout must be greater than zero"));
        }

        Ok(ClientConfig {
            urls,
            database,
            request_timeout,
            atomic_cluster_writes: self.atomic_cluster_writes,
            conventions: Arc::new(self.conventions.unwrap_or_default()),
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::new(format!("invalid url '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::new(format!(
            "url '{}' has unsupported scheme '{}' (expected http or https)",
            raw, other
        ))),
    }
}
