//! Connection acquisition and the live-connection seam.
//!
//! [`ConnectionProvider`] hands out one exclusive connection per operation;
//! there is no pool. [`ProcedureClient`] is what the invoker needs from a
//! live connection: run one statement, manage one transaction, close. The
//! production implementation wraps a tiberius client over TCP; tests
//! substitute a scripted double.

use async_trait::async_trait;
use tiberius::Client;
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use crate::db::value::{ResultRow, SpParam, normalize_row};
use crate::error::{DbError, DbResult};

/// One live, exclusively owned database connection.
#[async_trait]
pub trait ProcedureClient: Send {
    /// Execute a read-only statement and return all rows.
    async fn query(&mut self, sql: &str, params: &[SpParam]) -> DbResult<Vec<ResultRow>>;

    /// Execute a mutating statement and return the affected-row count.
    async fn execute(&mut self, sql: &str, params: &[SpParam]) -> DbResult<u64>;

    async fn begin(&mut self) -> DbResult<()>;

    async fn commit(&mut self) -> DbResult<()>;

    async fn rollback(&mut self) -> DbResult<()>;

    /// Release the connection. Consumes the client; a connection is never
    /// reused after close.
    async fn close(self: Box<Self>) -> DbResult<()>;
}

/// Source of fresh connections, one per operation.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Open a new connection. Single attempt, no retry; any failure is a
    /// connection-phase [`DbError`].
    async fn acquire(&self) -> DbResult<Box<dyn ProcedureClient>>;
}

/// Production provider: a fresh tiberius client over TCP per call.
pub struct TiberiusProvider {
    config: tiberius::Config,
}

impl TiberiusProvider {
    pub fn new(config: tiberius::Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConnectionProvider for TiberiusProvider {
    async fn acquire(&self) -> DbResult<Box<dyn ProcedureClient>> {
        let addr = self.config.get_addr();
        debug!(addr = %addr, "Opening connection");

        let tcp = TcpStream::connect(&addr)
            .await
            .map_err(|e| DbError::connection(format!("{addr}: {e}")))?;
        tcp.set_nodelay(true)
            .map_err(|e| DbError::connection(e.to_string()))?;

        let client = Client::connect(self.config.clone(), tcp.compat_write())
            .await
            .map_err(DbError::connection_from)?;

        Ok(Box::new(TiberiusClient { client }))
    }
}

/// A live tiberius connection.
struct TiberiusClient {
    client: Client<Compat<TcpStream>>,
}

impl TiberiusClient {
    fn param_refs(params: &[SpParam]) -> Vec<&dyn tiberius::ToSql> {
        params.iter().map(|p| p as &dyn tiberius::ToSql).collect()
    }

    async fn run_batch(&mut self, sql: &str) -> Result<(), tiberius::error::Error> {
        self.client.simple_query(sql).await?.into_results().await?;
        Ok(())
    }
}

#[async_trait]
impl ProcedureClient for TiberiusClient {
    async fn query(&mut self, sql: &str, params: &[SpParam]) -> DbResult<Vec<ResultRow>> {
        debug!(sql = %sql, params = params.len(), "Executing query");
        let stream = self
            .client
            .query(sql, &Self::param_refs(params))
            .await
            .map_err(DbError::query_from)?;
        let rows = stream
            .into_first_result()
            .await
            .map_err(DbError::query_from)?;
        rows.iter().map(normalize_row).collect()
    }

    async fn execute(&mut self, sql: &str, params: &[SpParam]) -> DbResult<u64> {
        debug!(sql = %sql, params = params.len(), "Executing non-query");
        let result = self
            .client
            .execute(sql, &Self::param_refs(params))
            .await
            .map_err(DbError::non_query_from)?;
        Ok(result.total())
    }

    async fn begin(&mut self) -> DbResult<()> {
        debug!("BEGIN TRANSACTION");
        self.run_batch("BEGIN TRANSACTION")
            .await
            .map_err(DbError::non_query_from)
    }

    async fn commit(&mut self) -> DbResult<()> {
        debug!("COMMIT");
        self.run_batch("COMMIT")
            .await
            .map_err(DbError::non_query_from)
    }

    async fn rollback(&mut self) -> DbResult<()> {
        debug!("ROLLBACK");
        self.run_batch("ROLLBACK")
            .await
            .map_err(DbError::non_query_from)
    }

    async fn close(self: Box<Self>) -> DbResult<()> {
        debug!("Closing connection");
        self.client
            .close()
            .await
            .map_err(|e| DbError::connection(format!("close failed: {e}")))
    }
}
