//! Declarative configuration loading from YAML, TOML, and environment variables.
//!
//! File-based configuration is deserialized into mirror structs and then
//! converted into the programmatic [`ClientConfig`](crate::config::ClientConfig)
//! through the builder, so both paths share one set of validation rules.
//!
//! # Supported Formats
//!
//! - **YAML** (requires `config-file` feature): `ClientConfig::from_yaml("raven.yaml")`
//! - **TOML** (requires `config-file` feature): `ClientConfig::from_toml("raven.toml")`
//! - **Environment Variables** (always available): `ClientConfig::from_env()`
//!
//! # Example YAML
//!
//! ```yaml
//! urls:
//!   - "http://10.0.0.1:8080"
//!   - "http://10.0.0.2:8080"
//! database: Northwind
//! request-timeout-ms: 15000
//! atomic-cluster-writes: true
//! conventions:
//!   identity-property: Id
//!   transaction-mode: cluster-wide
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ClientConfig, ClientConfigBuilder, ConfigError};
use crate::conventions::DocumentConventions;
use crate::transaction::TransactionMode;

/// Top-level file-based configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct FileConfig {
    /// Cluster node urls.
    pub urls: Option<Vec<String>>,
    /// Database name.
    pub database: Option<String>,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// Initial atomic-cluster-write capability of nodes.
    pub atomic_cluster_writes: Option<bool>,
    /// Serialization conventions.
    pub conventions: Option<FileConventionsConfig>,
}

/// File-based conventions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct FileConventionsConfig {
    /// Property removed from stored documents.
    pub identity_property: Option<String>,
    /// Default transaction mode: `single-node` or `cluster-wide`.
    pub transaction_mode: Option<String>,
}

impl TryFrom<FileConventionsConfig> for DocumentConventions {
    type Error = ConfigError;

    fn try_from(file: FileConventionsConfig) -> Result<Self, Self::Error> {
        let mut builder = DocumentConventions::builder();

        if let Some(property) = file.identity_property {
            builder = builder.identity_property(property);
        }

        if let Some(mode) = file.transaction_mode {
            let mode = mode
                .parse::<TransactionMode>()
                .map_err(|e| ConfigError::new(e.to_string()))?;
            builder = builder.transaction_mode(mode);
        }

        Ok(builder.build())
    }
}

impl TryFrom<FileConfig> for ClientConfig {
    type Error = ConfigError;

    fn try_from(file: FileConfig) -> Result<Self, Self::Error> {
        let mut builder = ClientConfigBuilder::new();

        if let Some(urls) = file.urls {
            builder = builder.urls(urls);
        }

        if let Some(database) = file.database {
            builder = builder.database(database);
        }

        if let Some(ms) = file.request_timeout_ms {
            builder = builder.request_timeout(Duration::from_millis(ms));
        }

        if let Some(enabled) = file.atomic_cluster_writes {
            builder = builder.atomic_cluster_writes(enabled);
        }

        if let Some(conventions) = file.conventions {
            builder = builder.conventions(conventions.try_into()?);
        }

        builder.build()
    }
}

impl ClientConfig {
    /// Loads configuration from a YAML file.
    ///
    /// Requires the `config-file` feature.
    #[cfg(feature = "config-file")]
    pub fn from_yaml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("failed to read YAML config file: {e}"))
        })?;
        let file_config: FileConfig = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::new(format!("failed to parse YAML config: {e}"))
        })?;
        file_config.try_into()
    }

    /// Loads configuration from a TOML file.
    ///
    /// Requires the `config-file` feature.
    #[cfg(feature = "config-file")]
    pub fn from_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("failed to read TOML config file: {e}"))
        })?;
        let file_config: FileConfig = toml_crate::from_str(&content).map_err(|e| {
            ConfigError::new(format!("failed to parse TOML config: {e}"))
        })?;
        file_config.try_into()
    }

    /// Loads configuration from environment variables.
    ///
    /// # Supported Environment Variables
    ///
    /// | Variable | Maps to |
    /// |----------|---------|
    /// | `RAVEN_URLS` | Comma-separated node urls |
    /// | `RAVEN_DATABASE` | `database` |
    /// | `RAVEN_REQUEST_TIMEOUT_MS` | Request timeout in milliseconds |
    /// | `RAVEN_ATOMIC_CLUSTER_WRITES` | `"true"` or `"false"` |
    /// | `RAVEN_IDENTITY_PROPERTY` | Identity property of the conventions |
    /// | `RAVEN_TRANSACTION_MODE` | `single-node` or `cluster-wide` |
    pub fn from_env() -> Result<Self, ConfigError> {
        file_config_from_lookup(|name| std::env::var(name).ok())?.try_into()
    }
}

fn file_config_from_lookup<F>(lookup: F) -> Result<FileConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut file_config = FileConfig::default();

    if let Some(val) = lookup("RAVEN_URLS") {
        file_config.urls = Some(
            val.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        );
    }

    if let Some(val) = lookup("RAVEN_DATABASE") {
        file_config.database = Some(val);
    }

    if let Some(val) = lookup("RAVEN_REQUEST_TIMEOUT_MS") {
        let ms = val.trim().parse::<u64>().map_err(|e| {
            ConfigError::new(format!("RAVEN_REQUEST_TIMEOUT_MS must be an integer: {e}"))
        })?;
        file_config.request_timeout_ms = Some(ms);
    }

    if let Some(val) = lookup("RAVEN_ATOMIC_CLUSTER_WRITES") {
        file_config.atomic_cluster_writes = Some(val.trim().eq_ignore_ascii_case("true"));
    }

    if let Some(val) = lookup("RAVEN_IDENTITY_PROPERTY") {
        file_config
            .conventions
            .get_or_insert_with(Default::default)
            .identity_property = Some(val);
    }

    if let Some(val) = lookup("RAVEN_TRANSACTION_MODE") {
        file_config
            .conventions
            .get_or_insert_with(Default::default)
            .transaction_mode = Some(val);
    }

    Ok(file_config)
}

/// Loads a configuration file, auto-detecting the format by extension.
///
/// Supports `.yaml`, `.yml`, and `.toml` extensions.
/// Requires the `config-file` feature.
#[cfg(feature = "config-file")]
pub fn load_config<P: AsRef<std::path::Path>>(path: P) -> Result<ClientConfig, ConfigError> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => ClientConfig::from_yaml(path),
        Some("toml") => ClientConfig::from_toml(path),
        Some(ext) => Err(ConfigError::new(format!(
            "unsupported config file extension: .{ext} (expected .yaml, .yml, or .toml)"
        ))),
        None => Err(ConfigError::new(
            "config file has no extension; expected .yaml, .yml, or .toml",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_file_config_requires_database() {
        let result: Result<ClientConfig, _> = FileConfig::default().try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_file_config_full() {
        let file_config = FileConfig {
            urls: Some(vec!["http://10.0.0.1:8080".to_string()]),
            database: Some("Northwind".to_string()),
            request_timeout_ms: Some(1500),
            atomic_cluster_writes: Some(true),
            conventions: Some(FileConventionsConfig {
                identity_property: Some("Id".to_string()),
                transaction_mode: Some("cluster-wide".to_string()),
            }),
        };
        let config: ClientConfig = file_config.try_into().unwrap();
        assert_eq!(config.urls()[0].host_str(), Some("10.0.0.1"));
        assert_eq!(config.database(), "Northwind");
        assert_eq!(config.request_timeout(), Duration::from_millis(1500));
        assert!(config.atomic_cluster_writes());
        assert_eq!(config.conventions().identity_property(), Some("Id"));
        assert_eq!(
            config.conventions().transaction_mode(),
            TransactionMode::ClusterWide
        );
    }

    #[test]
    fn test_unknown_transaction_mode_fails() {
        let file_config = FileConfig {
            database: Some("db".to_string()),
            conventions: Some(FileConventionsConfig {
                transaction_mode: Some("eventual".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = ClientConfig::try_from(file_config).unwrap_err();
        assert!(err.to_string().contains("unknown transaction mode"));
    }

    #[test]
    fn test_env_lookup() {
        let file_config = file_config_from_lookup(lookup(&[
            ("RAVEN_URLS", "http://a:8080, http://b:8080,"),
            ("RAVEN_DATABASE", "Orders"),
            ("RAVEN_REQUEST_TIMEOUT_MS", "2500"),
            ("RAVEN_ATOMIC_CLUSTER_WRITES", "TRUE"),
            ("RAVEN_TRANSACTION_MODE", "single-node"),
        ]))
        .unwrap();
        assert_eq!(
            file_config.urls,
            Some(vec!["http://a:8080".to_string(), "http://b:8080".to_string()])
        );
        assert_eq!(file_config.request_timeout_ms, Some(2500));
        assert_eq!(file_config.atomic_cluster_writes, Some(true));

        let config: ClientConfig = file_config.try_into().unwrap();
        assert_eq!(config.database(), "Orders");
        assert_eq!(config.urls().len(), 2);
    }

    #[test]
    fn test_env_invalid_timeout_fails() {
        let result = file_config_from_lookup(lookup(&[("RAVEN_REQUEST_TIMEOUT_MS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        std::env::set_var("RAVEN_DATABASE", "env-db");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.database(), "env-db");
        std::env::remove_var("RAVEN_DATABASE");
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_yaml_parse() {
        let yaml = "urls:\n  - \"http://a:8080\"\ndatabase: db\nconventions:\n  identity-property: Id\n";
        let parsed: FileConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.database.as_deref(), Some("db"));
        assert_eq!(
            parsed.conventions.unwrap().identity_property.as_deref(),
            Some("Id")
        );
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_toml_parse() {
        let toml_str = "urls = [\"http://a:8080\"]\ndatabase = \"db\"\nrequest-timeout-ms = 500\n";
        let parsed: FileConfig = toml_crate::from_str(toml_str).unwrap();
        assert_eq!(parsed.request_timeout_ms, Some(500));
        let config: ClientConfig = parsed.try_into().unwrap();
        assert_eq!(config.request_timeout(), Duration::from_millis(500));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_load_config_rejects_unknown_extension() {
        let err = load_config("raven.json").unwrap_err();
        assert!(err.to_string().contains("unsupported config file extension"));
    }
}
