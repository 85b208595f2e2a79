//! # Dump
//!
//! The split-and-persist pipeline: resolve the distinct partition keys of a remote table,
//! fetch one filtered result set per key and route each batch to the configured sinks
//! (per-partition CSV files and/or the local SQLite store).
//!
//! Everything runs sequentially on the caller's task. A partition is fetched, written to
//! every sink, and dropped before the next partition's query is sent.

pub mod csv_sink;
mod error;
pub mod fetch;
pub mod partition;
pub mod pipeline;
pub mod router;
pub mod sample;
pub mod sql;
pub mod store;
pub mod summary;

pub use self::{
    error::{Error, InvalidColumnError},
    fetch::{RowBatch, fetch_partition},
    partition::{DatePart, PartitionExpr, PartitionKey, resolve_keys, validate_column},
    pipeline::{RunStats, SplitJob, StoreOptions},
    router::{Partition, Router, Sink, SinkError, SinkFailure},
    store::{BatchInsertError, Store, WriteMode},
    summary::SummaryRecord,
};
