//! Fan-out of a fetched partition to the configured sinks.

use async_trait::async_trait;
use monitoring::logging;

use crate::{
    csv_sink::CsvSinkError,
    fetch::RowBatch,
    partition::{PartitionExpr, PartitionKey},
    store::BatchInsertError,
};

/// One fetched partition on its way to the sinks.
#[derive(Debug, Clone, Copy)]
pub struct Partition<'a> {
    pub table: &'a str,
    pub expr: &'a PartitionExpr,
    pub key: &'a PartitionKey,
    pub batch: &'a RowBatch,
}

/// A destination for partition batches.
///
/// Each sink is an independent failure domain: an error from one sink never prevents the
/// router from handing the same partition to the others.
#[async_trait]
pub trait Sink: Send {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Persist one partition.
    async fn write(&mut self, partition: &Partition<'_>) -> Result<(), SinkError>;
}

/// Failure of a single sink write.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The partition could not be written to its CSV file.
    #[error(transparent)]
    Csv(#[from] CsvSinkError),

    /// The partition could not be written to the local store.
    #[error(transparent)]
    Store(#[from] BatchInsertError),
}

/// A sink that failed for a routed partition.
#[derive(Debug)]
pub struct SinkFailure {
    pub sink: &'static str,
    pub error: SinkError,
}

/// Dispatches each partition to every configured sink, in order.
#[derive(Default)]
pub struct Router {
    sinks: Vec<Box<dyn Sink>>,
}

impl Router {
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    /// Hand the partition to every sink, even after one of them fails.
    ///
    /// Each failure is logged as it happens and returned to the caller, which decides
    /// whether to continue with the next partition.
    pub async fn route(&mut self, partition: &Partition<'_>) -> Vec<SinkFailure> {
        let mut failures = Vec::new();
        for sink in &mut self.sinks {
            if let Err(err) = sink.write(partition).await {
                tracing::error!(
                    sink = sink.name(),
                    table = partition.table,
                    key = %partition.key,
                    error = %err,
                    error_source = logging::error_source(&err),
                    "sink failed to write partition",
                );
                failures.push(SinkFailure {
                    sink: sink.name(),
                    error: err,
                });
            }
        }
        failures
    }
}
