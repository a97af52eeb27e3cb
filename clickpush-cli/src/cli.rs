//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use clickpush_core::statement::TimestampRule;
use serde::Deserialize;
use std::path::PathBuf;

/// clickpush - Load clickstream event CSV files into SQL Server
#[derive(Parser, Debug)]
#[command(name = "clickpush")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Load clickstream event CSV files into SQL Server", long_about = None)]
pub struct Cli {
    /// Server address: `host`, `host\instance`, or `host,port`
    #[arg(short = 'S', long)]
    pub server: Option<String>,

    /// Database name
    #[arg(short = 'd', long)]
    pub database: Option<String>,

    /// Login id for SQL Server authentication
    #[arg(short = 'U', long)]
    pub user: Option<String>,

    /// Password for SQL Server authentication
    #[arg(short = 'P', long, env = "CLICKPUSH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// CSV file to load
    #[arg(short = 'I', long)]
    pub input: Option<PathBuf>,

    /// Target table name
    #[arg(short = 't', long)]
    pub table: Option<String>,

    /// How many records to insert at once
    #[arg(short = 'm', long)]
    pub max_records: Option<usize>,

    /// How the raw timestamp field is trimmed
    #[arg(long, value_enum)]
    pub timestamp_rule: Option<TimestampRuleArg>,

    /// Trust the server certificate
    #[arg(long)]
    pub trust_cert: bool,

    /// Path to a TOML settings file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Generate and print statements without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Echo generated statements and debug-level logs
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Timestamp trimming rules selectable from the command line.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TimestampRuleArg {
    /// Keep the first 19 characters
    #[default]
    FixedWidth,
    /// Cut one character before the last hyphen
    LastHyphen,
}

impl From<TimestampRuleArg> for TimestampRule {
    fn from(arg: TimestampRuleArg) -> Self {
        match arg {
            TimestampRuleArg::FixedWidth => TimestampRule::FixedWidth,
            TimestampRuleArg::LastHyphen => TimestampRule::BeforeLastHyphen,
        }
    }
}

impl std::fmt::Display for TimestampRuleArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampRuleArg::FixedWidth => write!(f, "fixed-width"),
            TimestampRuleArg::LastHyphen => write!(f, "last-hyphen"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_timestamp_rule_conversion() {
        assert_eq!(
            TimestampRule::from(TimestampRuleArg::FixedWidth),
            TimestampRule::FixedWidth
        );
        assert_eq!(
            TimestampRule::from(TimestampRuleArg::LastHyphen),
            TimestampRule::BeforeLastHyphen
        );
    }
}
