//! Batch writes: options, the `bulk_docs` command and its result.

mod command;
mod options;
mod result;

pub use command::{BodyStrategy, SingleNodeBatchCommand};
pub use options::{BatchOptions, IndexBatchOptions, ReplicasToWaitFor, ReplicationBatchOptions};
pub use result::BatchCommandResult;
