//! Single-connection SQL Server client.

use tiberius::{Client, QueryStream};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

use crate::config::MssqlConfig;
use crate::error::{MssqlError, MssqlResult};

/// A single live SQL Server connection.
///
/// The loader's resource model is one connection owned by the executor task;
/// there is deliberately no pool.
pub struct MssqlClient {
    inner: Client<Compat<TcpStream>>,
}

impl MssqlClient {
    /// Open a connection using `config`.
    pub async fn connect(config: &MssqlConfig) -> MssqlResult<Self> {
        let tiberius_config = config.to_tiberius_config()?;
        let addr = tiberius_config.get_addr();

        debug!(addr = %addr, "opening tcp connection");
        let tcp = tokio::time::timeout(config.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| MssqlError::ConnectTimeout(config.connect_timeout))?
            .map_err(|e| MssqlError::connection(format!("tcp connect to {addr} failed: {e}")))?;
        tcp.set_nodelay(true)
            .map_err(|e| MssqlError::connection(format!("failed to set nodelay: {e}")))?;

        let inner = Client::connect(tiberius_config, tcp.compat_write()).await?;

        info!(
            host = %config.host,
            database = %config.database,
            "connected to SQL Server"
        );

        Ok(Self { inner })
    }

    /// Round-trip a trivial query to prove the connection is usable.
    pub async fn ping(&mut self) -> MssqlResult<()> {
        debug!("pinging server");
        self.inner.simple_query("SELECT 1").await?.into_results().await?;
        Ok(())
    }

    /// Issue `sql` without parameter binding and stream back its results.
    pub async fn simple_query(&mut self, sql: &str) -> MssqlResult<QueryStream<'_>> {
        Ok(self.inner.simple_query(sql).await?)
    }
}
