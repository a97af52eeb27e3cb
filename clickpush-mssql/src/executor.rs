//! Sequential statement execution with result-set reporting.

use std::io::Write;

use async_trait::async_trait;
use clickpush_core::error::ExecuteError;
use clickpush_core::pipeline::StatementExecutor;
use clickpush_core::statement::StatementUnit;
use tracing::debug;

use crate::client::MssqlClient;
use crate::error::MssqlResult;
use crate::value::SqlValue;

/// Executes statement units on a single connection, dumping any result set
/// to the report sink.
///
/// The sink is injected so tests can capture the dump; the binary hands in
/// stdout. A plain INSERT returns no result set and prints nothing.
pub struct MssqlExecutor<W: Write + Send> {
    client: MssqlClient,
    sink: W,
}

impl<W: Write + Send> MssqlExecutor<W> {
    /// Wrap `client`, writing result-set dumps into `sink`.
    pub fn new(client: MssqlClient, sink: W) -> Self {
        Self { client, sink }
    }

    /// Give the connection back.
    pub fn into_client(self) -> MssqlClient {
        self.client
    }

    async fn run_statement(&mut self, unit: &StatementUnit) -> MssqlResult<()> {
        debug!(sequence = unit.sequence(), "issuing statement");

        let stream = self.client.simple_query(unit.sql()).await?;
        let results = stream.into_results().await?;

        for rows in &results {
            let Some(first) = rows.first() else {
                continue;
            };

            let header: Vec<&str> = first.columns().iter().map(|c| c.name()).collect();
            writeln!(self.sink, "{}", header.join("\t"))?;

            for row in rows {
                let mut cells = Vec::with_capacity(row.len());
                for (_, data) in row.cells() {
                    cells.push(SqlValue::from_column_data(data)?.render());
                }
                writeln!(self.sink, "{}", cells.join("\t"))?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> StatementExecutor for MssqlExecutor<W> {
    async fn execute(&mut self, unit: &StatementUnit) -> Result<(), ExecuteError> {
        self.run_statement(unit).await.map_err(ExecuteError::from)
    }
}
