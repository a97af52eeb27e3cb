//! # clickpush-core
//!
//! Record batching and the producer/consumer pipeline behind the `clickpush`
//! loader.
//!
//! This crate knows nothing about databases or terminals: it turns an
//! ordered sequence of parsed event records into bounded-size multi-row
//! INSERT statements and drives them, in order, through a
//! [`StatementExecutor`] implementation supplied by a driver crate.
//!
//! ## Example
//!
//! ```rust,ignore
//! use clickpush_core::batcher::{BatcherConfig, StatementBatcher};
//! use clickpush_core::pipeline::run_pipeline;
//! use tokio::sync::watch;
//!
//! let batcher = StatementBatcher::new(BatcherConfig::default());
//! let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//! let report = run_pipeline(batcher, records, &mut executor, shutdown_rx).await;
//! assert!(report.is_clean());
//! ```

pub mod batcher;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod statement;

pub use batcher::{BatcherConfig, StatementBatcher, DEFAULT_MAX_RECORDS};
pub use error::{BatchError, ExecuteError};
pub use pipeline::{run_pipeline, ExecutionFailure, PipelineReport, StatementExecutor};
pub use record::{EventRecord, EXPECTED_FIELDS};
pub use statement::{StatementUnit, TimestampRule, DEFAULT_TABLE, TIMESTAMP_WIDTH};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::batcher::{BatcherConfig, StatementBatcher};
    pub use crate::error::{BatchError, ExecuteError};
    pub use crate::pipeline::{run_pipeline, PipelineReport, StatementExecutor};
    pub use crate::record::EventRecord;
    pub use crate::statement::{StatementUnit, TimestampRule};
}
