//! Async Rust client for [RavenDB](https://ravendb.net/) batch writes.
//!
//! A batch groups document operations (puts, deletes, patches, attachments,
//! counters, time series, compare-exchange values) into one `bulk_docs` request
//! that the server applies atomically. The client renders the request, sends it
//! through an [`HttpTransport`], and turns the answer into either a positional
//! [`BatchCommandResult`] or a typed [`RavenError`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ravendb_client::{
//!     ClientConfig, CommandData, PutCommandData, RequestExecutor, SingleNodeBatchCommand,
//! };
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .add_url("http://localhost:8080")
//!         .database("Northwind")
//!         .build()?;
//!     let executor = RequestExecutor::from_config(&config)?;
//!
//!     let put: CommandData = PutCommandData::new("users/1", None, json!({"Name": "Ann"})).into();
//!     let batch = SingleNodeBatchCommand::new(
//!         config.conventions().clone(),
//!         vec![put],
//!         None,
//!         config.conventions().transaction_mode(),
//!     )?;
//!     let result = executor.execute(&batch).await?;
//!     println!("{:?}", result.get(0));
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Non-2xx responses are translated by
//! [`ExceptionDispatcher`](ravendb_core::ExceptionDispatcher): a 409 becomes
//! [`RavenError::DocumentConflict`] or [`RavenError::Concurrency`], known server
//! exception types map to their local kinds, and anything else becomes
//! [`RavenError::Generic`] carrying the raw response.
//!
//! # Configuration
//!
//! Besides the builder, configuration can be read from the environment
//! (`ClientConfig::from_env`) or, with the `config-file` feature, from YAML
//! and TOML files. See [`config_file`].

#![warn(missing_docs)]

pub mod batch;
pub mod commands;
pub mod config;
pub mod config_file;
pub mod connection;
pub mod conventions;
pub mod node;
pub mod transaction;

pub use batch::{
    BatchCommandResult, BatchOptions, BodyStrategy, IndexBatchOptions, ReplicasToWaitFor,
    ReplicationBatchOptions, SingleNodeBatchCommand,
};
pub use commands::{
    AttachmentStream, CommandData, CommandType, CopyAttachmentCommandData, CounterOperation,
    CounterOperationType, CountersBatchCommandData, DeleteAttachmentCommandData,
    DeleteCommandData, DeleteCompareExchangeCommandData, ForceRevisionCommandData,
    MoveAttachmentCommandData, PatchCommandData, PatchRequest, PutAttachmentCommandData,
    PutCommandData, PutCompareExchangeCommandData, TimeSeriesAppend, TimeSeriesBatchCommandData,
    TimeSeriesDelete,
};
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use config_file::{FileConfig, FileConventionsConfig};
pub use connection::{HttpTransport, RavenCommand, ReqwestTransport, RequestExecutor};
pub use conventions::{DocumentConventions, DocumentMetadata, SerializationConventions};
pub use node::{NodeCapabilities, ServerNode};
pub use ravendb_core as core;
pub use ravendb_core::{RavenError, Result};
pub use transaction::TransactionMode;
