//! Batch write example: documents, an attachment and a counter in one request.
//!
//! Run with: `cargo run --example batch_write`
//!
//! Requires a RavenDB server on localhost:8080 with a `Northwind` database.

use std::time::Duration;

use ravendb_client::{
    AttachmentStream, BatchOptions, ClientConfig, CommandData, CounterOperation,
    CountersBatchCommandData, PutAttachmentCommandData, PutCommandData, RavenError,
    ReplicasToWaitFor, ReplicationBatchOptions, RequestExecutor, SingleNodeBatchCommand,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::builder()
        .add_url("http://localhost:8080")
        .database("Northwind")
        .request_timeout(Duration::from_secs(10))
        .build()?;
    let executor = RequestExecutor::from_config(&config)?;

    let commands: Vec<CommandData> = vec![
        PutCommandData::new("users/1", None, json!({"Name": "Ann", "Age": 31})).into(),
        PutCommandData::new("users/2", None, json!({"Name": "Bob", "Age": 27})).into(),
        PutAttachmentCommandData::new(
            "users/1",
            "avatar.txt",
            AttachmentStream::new(&b"not really a picture"[..]),
            Some("text/plain".to_string()),
            None,
        )?
        .into(),
        CountersBatchCommandData::new("users/1", vec![CounterOperation::increment("logins", 1)])?
            .into(),
    ];

    let options = BatchOptions::new().with_replication(ReplicationBatchOptions::new(
        Duration::from_secs(5),
        ReplicasToWaitFor::Majority,
    ));
    let batch = SingleNodeBatchCommand::new(
        config.conventions().clone(),
        commands,
        Some(options),
        config.conventions().transaction_mode(),
    )?;

    match executor.execute(&batch).await {
        Ok(result) => {
            for (i, entry) in result.results.iter().enumerate() {
                println!("  [{i}] {entry}");
            }
            if let Some(index) = result.transaction_index {
                println!("transaction index: {index}");
            }
        }
        Err(RavenError::Concurrency(message)) => println!("concurrency conflict: {message}"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
