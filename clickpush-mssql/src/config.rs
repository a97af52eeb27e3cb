//! SQL Server connection configuration.

use std::time::Duration;

use tiberius::{AuthMethod, Config, EncryptionLevel};

use crate::error::{MssqlError, MssqlResult};

/// Connection configuration for the loader's single SQL Server session.
#[derive(Debug, Clone)]
pub struct MssqlConfig {
    /// Server host.
    pub host: String,
    /// Server port (default: 1433).
    pub port: u16,
    /// Instance name (for named instances).
    pub instance_name: Option<String>,
    /// Database name.
    pub database: String,
    /// Username for SQL Server authentication.
    pub username: Option<String>,
    /// Password for SQL Server authentication.
    pub password: Option<String>,
    /// Encryption level.
    pub encryption: EncryptionMode,
    /// Trust server certificate.
    pub trust_cert: bool,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Application name (shown in sys.dm_exec_sessions).
    pub application_name: String,
}

/// Encryption mode for connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionMode {
    /// Encryption is off.
    Off,
    /// Encryption is on.
    #[default]
    On,
    /// Encryption is required.
    Required,
    /// Don't use encryption.
    NotSupported,
}

impl From<EncryptionMode> for EncryptionLevel {
    fn from(mode: EncryptionMode) -> Self {
        match mode {
            EncryptionMode::Off => EncryptionLevel::Off,
            EncryptionMode::On => EncryptionLevel::On,
            EncryptionMode::Required => EncryptionLevel::Required,
            EncryptionMode::NotSupported => EncryptionLevel::NotSupported,
        }
    }
}

impl Default for MssqlConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1433,
            instance_name: None,
            database: String::new(),
            username: None,
            password: None,
            encryption: EncryptionMode::On,
            trust_cert: false,
            connect_timeout: Duration::from_secs(30),
            application_name: "clickpush".to_string(),
        }
    }
}

impl MssqlConfig {
    /// Create a builder for configuration.
    pub fn builder() -> MssqlConfigBuilder {
        MssqlConfigBuilder::new()
    }

    /// Convert to a Tiberius Config.
    pub fn to_tiberius_config(&self) -> MssqlResult<Config> {
        let mut config = Config::new();

        config.host(&self.host);
        config.port(self.port);
        config.database(&self.database);
        config.application_name(&self.application_name);

        if let Some(ref instance) = self.instance_name {
            config.instance_name(instance);
        }

        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            config.authentication(AuthMethod::sql_server(user, pass));
        } else {
            return Err(MssqlError::config(
                "username and password are required for SQL Server authentication",
            ));
        }

        config.encryption(self.encryption.into());

        if self.trust_cert {
            config.trust_cert();
        }

        Ok(config)
    }

    /// Human-readable connection summary with the password masked.
    pub fn connection_summary(&self) -> String {
        let mut parts = vec![match (&self.instance_name, self.port) {
            (Some(instance), _) => format!("Server={}\\{}", self.host, instance),
            (None, 1433) => format!("Server={}", self.host),
            (None, port) => format!("Server={},{}", self.host, port),
        }];

        parts.push(format!("Database={}", self.database));
        if let Some(ref user) = self.username {
            parts.push(format!("User Id={}", user));
        }
        if self.password.is_some() {
            parts.push("Password=***".to_string());
        }

        parts.join(";")
    }
}

/// A `-S` style server address split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    /// Host name or address.
    pub host: String,
    /// Named instance, from the `host\instance` form.
    pub instance: Option<String>,
    /// Explicit port, from the `host,port` form.
    pub port: Option<u16>,
}

/// Split a server address into host, named instance, and port.
///
/// Accepted forms: `host`, `host\instance`, `host,port`.
pub fn parse_server_address(address: &str) -> MssqlResult<ServerAddress> {
    let address = address.trim();
    if address.is_empty() {
        return Err(MssqlError::config("server address is empty"));
    }

    if let Some((host, instance)) = address.split_once('\\') {
        if host.is_empty() || instance.is_empty() {
            return Err(MssqlError::config(format!(
                "invalid server address: {address}"
            )));
        }
        return Ok(ServerAddress {
            host: host.to_string(),
            instance: Some(instance.to_string()),
            port: None,
        });
    }

    if let Some((host, port)) = address.split_once(',') {
        let port = port.trim().parse::<u16>().map_err(|_| {
            MssqlError::config(format!("invalid port in server address: {address}"))
        })?;
        if host.is_empty() {
            return Err(MssqlError::config(format!(
                "invalid server address: {address}"
            )));
        }
        return Ok(ServerAddress {
            host: host.to_string(),
            instance: None,
            port: Some(port),
        });
    }

    Ok(ServerAddress {
        host: address.to_string(),
        instance: None,
        port: None,
    })
}

/// Builder for SQL Server configuration.
#[derive(Debug, Default)]
pub struct MssqlConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    instance_name: Option<String>,
    database: Option<String>,
    username: Option<String>,
    password: Option<String>,
    encryption: Option<EncryptionMode>,
    trust_cert: bool,
    connect_timeout: Option<Duration>,
    application_name: Option<String>,
}

impl MssqlConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the instance name (for named instances).
    pub fn instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = Some(name.into());
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the username for SQL Server authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password for SQL Server authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the encryption mode.
    pub fn encryption(mut self, mode: EncryptionMode) -> Self {
        self.encryption = Some(mode);
        self
    }

    /// Trust the server certificate.
    pub fn trust_cert(mut self, trust: bool) -> Self {
        self.trust_cert = trust;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the application name.
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> MssqlResult<MssqlConfig> {
        let database = self
            .database
            .ok_or_else(|| MssqlError::config("database name is required"))?;

        if self.username.is_none() || self.password.is_none() {
            return Err(MssqlError::config(
                "username and password are required for SQL Server authentication",
            ));
        }

        let defaults = MssqlConfig::default();
        Ok(MssqlConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            instance_name: self.instance_name,
            database,
            username: self.username,
            password: self.password,
            encryption: self.encryption.unwrap_or_default(),
            trust_cert: self.trust_cert,
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            application_name: self
                .application_name
                .unwrap_or(defaults.application_name),
        })
    }
}
