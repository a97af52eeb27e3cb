//! Settings assembly: TOML file defaults overridden by command-line flags.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use clickpush_core::batcher::{BatcherConfig, DEFAULT_MAX_RECORDS};
use clickpush_core::statement::{TimestampRule, DEFAULT_TABLE};
use clickpush_mssql::config::{parse_server_address, MssqlConfig};

use crate::cli::{Cli, TimestampRuleArg};
use crate::error::{CliError, CliResult};

/// Default settings file name (looked up in the working directory).
pub const SETTINGS_FILE_NAME: &str = "clickpush.toml";

/// File-level settings. Every field is optional so flags can fill the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub server: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub input: Option<PathBuf>,
    pub table: Option<String>,
    pub max_records: Option<usize>,
    pub timestamp_rule: Option<TimestampRuleArg>,
    pub trust_cert: Option<bool>,
}

impl SettingsFile {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the default settings file if it exists; empty settings otherwise.
    pub fn discover() -> CliResult<Self> {
        let path = Path::new(SETTINGS_FILE_NAME);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: String,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub input: PathBuf,
    pub table: String,
    pub max_records: usize,
    pub timestamp_rule: TimestampRule,
    pub trust_cert: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Settings {
    /// Merge flag values over file values and validate the required triple.
    pub fn resolve(cli: &Cli, file: SettingsFile) -> CliResult<Self> {
        let server = cli.server.clone().or(file.server);
        let database = cli.database.clone().or(file.database);
        let input = cli.input.clone().or(file.input);

        let (Some(server), Some(database), Some(input)) = (server, database, input) else {
            return Err(CliError::config(
                "server, database, and input file are required",
            ));
        };

        Ok(Self {
            server,
            database,
            user: cli.user.clone().or(file.user),
            password: cli.password.clone().or(file.password),
            input,
            table: cli
                .table
                .clone()
                .or(file.table)
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            max_records: cli
                .max_records
                .or(file.max_records)
                .unwrap_or(DEFAULT_MAX_RECORDS),
            timestamp_rule: cli
                .timestamp_rule
                .or(file.timestamp_rule)
                .unwrap_or_default()
                .into(),
            trust_cert: cli.trust_cert || file.trust_cert.unwrap_or(false),
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Batcher configuration derived from these settings.
    pub fn batcher_config(&self) -> BatcherConfig {
        BatcherConfig {
            table: self.table.clone(),
            max_records: self.max_records,
            timestamp_rule: self.timestamp_rule,
        }
    }

    /// Driver configuration derived from these settings.
    pub fn mssql_config(&self) -> CliResult<MssqlConfig> {
        let address = parse_server_address(&self.server)?;

        let mut builder = MssqlConfig::builder()
            .host(address.host)
            .database(&self.database)
            .trust_cert(self.trust_cert);

        if let Some(port) = address.port {
            builder = builder.port(port);
        }
        if let Some(instance) = address.instance {
            builder = builder.instance_name(instance);
        }
        if let Some(ref user) = self.user {
            builder = builder.username(user);
        }
        if let Some(ref password) = self.password {
            builder = builder.password(password);
        }

        Ok(builder.build()?)
    }
}
