//! The load run: read, batch, connect, execute, report.

use std::process::ExitCode;

use clickpush_core::batcher::StatementBatcher;
use clickpush_core::pipeline::{run_pipeline, PipelineReport};
use clickpush_core::record::EventRecord;
use clickpush_mssql::client::MssqlClient;
use clickpush_mssql::executor::MssqlExecutor;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::{Settings, SettingsFile};
use crate::error::CliResult;
use crate::output;
use crate::source::read_records;

/// Run the loader end to end. Returns the process exit code.
pub async fn run(cli: Cli) -> CliResult<ExitCode> {
    init_tracing(cli.verbose);

    let file = match &cli.config {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::discover()?,
    };
    let settings = Settings::resolve(&cli, file)?;

    let records = read_records(&settings.input)?;
    info!(
        records = records.len(),
        input = %settings.input.display(),
        "read input file"
    );
    output::kv("Records", &records.len().to_string());

    let batcher = StatementBatcher::new(settings.batcher_config());

    if settings.dry_run {
        return dry_run(&settings, &batcher, records);
    }

    let mssql = settings.mssql_config()?;
    if settings.verbose {
        output::kv("Connection", &mssql.connection_summary());
    }

    let mut client = MssqlClient::connect(&mssql).await?;
    client.ping().await?;
    output::success(&format!(
        "Connected to {} - {}",
        settings.server, settings.database
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("shutdown signal received; draining in-flight statements");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut executor = MssqlExecutor::new(client, std::io::stdout());
    let report = run_pipeline(batcher, records, &mut executor, shutdown_rx).await;

    print_report(&settings, &report);

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Generate and print every statement without touching a database.
fn dry_run(
    settings: &Settings,
    batcher: &StatementBatcher,
    records: Vec<EventRecord>,
) -> CliResult<ExitCode> {
    let statements = batcher.statements(records)?;
    for unit in &statements {
        output::statement(unit.sql());
    }

    output::success(&format!(
        "Generated {} statement(s) from {} (dry run)",
        statements.len(),
        settings.input.display()
    ));
    Ok(ExitCode::SUCCESS)
}

fn print_report(settings: &Settings, report: &PipelineReport) {
    output::newline();

    for failure in &report.failures {
        output::error(&format!(
            "statement #{} failed for {}",
            failure.sequence, failure.statement
        ));
        output::error(&format!("  message: {}", failure.message));
    }

    if let Some(err) = &report.batch_error {
        output::error(&format!("input aborted: {err}"));
    }
    if report.interrupted {
        output::warn("run interrupted before all records were processed");
    }

    output::success(&format!("Finished processing {}", settings.input.display()));
    output::kv("Statements executed", &report.executed.to_string());
    output::kv("Succeeded", &report.succeeded().to_string());
    output::kv("Failed", &report.failures.len().to_string());
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
