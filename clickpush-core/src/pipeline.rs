//! Producer/consumer wiring between the batcher and a statement executor.
//!
//! Exactly two tasks run: the producer walks the batcher's lazy statement
//! sequence and hands each unit across a capacity-one channel; the consumer
//! executes them strictly sequentially on the current task. The channel is
//! the only shared state, so neither side needs a lock, and the consumer
//! observes units in exactly the order they were emitted.

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::batcher::StatementBatcher;
use crate::error::{BatchError, ExecuteError};
use crate::record::EventRecord;
use crate::statement::StatementUnit;

/// Capacity of the hand-off channel. One slot: the producer parks until the
/// consumer has taken the previous unit.
const HANDOFF_CAPACITY: usize = 1;

/// Executes one statement unit against a backing store.
///
/// Implementations run on the consumer side of the pipeline; at most one
/// call is in flight at a time.
#[async_trait]
pub trait StatementExecutor: Send {
    /// Execute `unit`, reporting any result set through the implementation's
    /// own sink.
    async fn execute(&mut self, unit: &StatementUnit) -> Result<(), ExecuteError>;
}

/// A single failed unit, as reported to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFailure {
    /// Sequence number of the failed unit.
    pub sequence: usize,
    /// Truncated statement text.
    pub statement: String,
    /// The executor's error message.
    pub message: String,
}

/// Outcome of a full pipeline drain.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Units handed to the executor.
    pub executed: usize,
    /// Units the executor rejected, in sequence order.
    pub failures: Vec<ExecutionFailure>,
    /// Set when the producer stopped at a malformed record.
    pub batch_error: Option<BatchError>,
    /// Set when a shutdown signal stopped the producer early.
    pub interrupted: bool,
}

impl PipelineReport {
    /// Units that executed without error.
    pub fn succeeded(&self) -> usize {
        self.executed - self.failures.len()
    }

    /// True when every record was batched and every unit executed cleanly.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.batch_error.is_none() && !self.interrupted
    }
}

enum ProducerExit {
    Finished,
    Malformed(BatchError),
    Interrupted,
}

/// Drain `records` through `batcher` into `executor`.
///
/// Per-unit failures are recorded and the drain continues; a malformed
/// record stops production but whatever was already handed off still
/// executes. A shutdown signal (the watch flipping to `true`) stops the
/// producer the same way.
pub async fn run_pipeline<E>(
    batcher: StatementBatcher,
    records: Vec<EventRecord>,
    executor: &mut E,
    shutdown: watch::Receiver<bool>,
) -> PipelineReport
where
    E: StatementExecutor,
{
    let (tx, mut rx) = mpsc::channel::<StatementUnit>(HANDOFF_CAPACITY);

    let producer = tokio::spawn(produce(batcher, records, tx, shutdown));

    let mut report = PipelineReport::default();
    let mut last_sequence: Option<usize> = None;

    while let Some(unit) = rx.recv().await {
        if let Some(previous) = last_sequence {
            debug_assert_eq!(
                unit.sequence(),
                previous + 1,
                "statement units must arrive in emission order"
            );
        }
        last_sequence = Some(unit.sequence());

        debug!(sequence = unit.sequence(), "executing statement");
        report.executed += 1;

        match executor.execute(&unit).await {
            Ok(()) => info!(sequence = unit.sequence(), "statement succeeded"),
            Err(err) => {
                error!(sequence = unit.sequence(), error = %err, "statement failed");
                report.failures.push(ExecutionFailure {
                    sequence: unit.sequence(),
                    statement: unit.preview().to_string(),
                    message: err.to_string(),
                });
            }
        }
    }

    match producer.await {
        Ok(ProducerExit::Finished) => {}
        Ok(ProducerExit::Malformed(err)) => {
            warn!(error = %err, "batching stopped at a malformed record");
            report.batch_error = Some(err);
        }
        Ok(ProducerExit::Interrupted) => {
            warn!("producer stopped by shutdown signal");
            report.interrupted = true;
        }
        Err(join_err) => {
            error!(error = %join_err, "producer task failed");
            report.interrupted = true;
        }
    }

    report
}

async fn produce(
    batcher: StatementBatcher,
    records: Vec<EventRecord>,
    tx: mpsc::Sender<StatementUnit>,
    mut shutdown: watch::Receiver<bool>,
) -> ProducerExit {
    if *shutdown.borrow() {
        return ProducerExit::Interrupted;
    }

    let mut batches = batcher.batches(records);
    loop {
        let unit = match batches.next() {
            Some(Ok(unit)) => unit,
            Some(Err(err)) => return ProducerExit::Malformed(err),
            None => return ProducerExit::Finished,
        };

        tokio::select! {
            sent = tx.send(unit) => {
                if sent.is_err() {
                    // Consumer went away; nothing left to hand off.
                    return ProducerExit::Finished;
                }
            }
            _ = shutdown_requested(&mut shutdown) => {
                return ProducerExit::Interrupted;
            }
        }
    }
}

/// Resolves once the watch flips to `true`; pends forever if the sender is
/// gone without ever signalling.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while shutdown.changed().await.is_ok() {
        if *shutdown.borrow() {
            return;
        }
    }
    std::future::pending::<()>().await
}
