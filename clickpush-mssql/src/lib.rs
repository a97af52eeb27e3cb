//! # clickpush-mssql
//!
//! Microsoft SQL Server driver for the clickpush loader, built on
//! `tiberius`.
//!
//! This crate provides:
//! - Connection configuration with a builder and `-S` style address parsing
//! - A single-connection client (connect, ping, raw query access)
//! - The [`MssqlExecutor`] implementation of the core executor trait
//! - Typed result-set cell rendering for the report dump
//!
//! ## Example
//!
//! ```rust,ignore
//! use clickpush_mssql::prelude::*;
//!
//! let config = MssqlConfig::builder()
//!     .host("dbhost")
//!     .database("Clickstream")
//!     .username("loader")
//!     .password("...")
//!     .build()?;
//!
//! let mut client = MssqlClient::connect(&config).await?;
//! client.ping().await?;
//! let executor = MssqlExecutor::new(client, std::io::stdout());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod value;

pub use client::MssqlClient;
pub use config::{parse_server_address, EncryptionMode, MssqlConfig, MssqlConfigBuilder, ServerAddress};
pub use error::{MssqlError, MssqlResult};
pub use executor::MssqlExecutor;
pub use value::SqlValue;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::client::MssqlClient;
    pub use crate::config::{parse_server_address, MssqlConfig, MssqlConfigBuilder};
    pub use crate::error::{MssqlError, MssqlResult};
    pub use crate::executor::MssqlExecutor;
    pub use crate::value::SqlValue;
}
