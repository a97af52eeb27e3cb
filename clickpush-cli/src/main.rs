//! clickpush - Load clickstream event CSV files into SQL Server.

use std::process::ExitCode;

use clap::Parser;

use clickpush_cli::cli::Cli;
use clickpush_cli::output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match clickpush_cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::newline();
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
