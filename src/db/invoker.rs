//! The four stored-procedure call shapes.
//!
//! Every operation follows the same lifecycle: optionally verify the call
//! against the signature registry, build the `EXEC` text, acquire a fresh
//! connection, execute, shape the result and release the connection - on the
//! success path and on every failure path alike. Non-query calls add an
//! explicit transaction boundary around the execute.

use tracing::warn;

use crate::db::call::build_exec;
use crate::db::connection::{ConnectionProvider, ProcedureClient};
use crate::db::registry::ProcedureRegistry;
use crate::db::value::{ResultRow, SpParam, SqlValue};
use crate::error::DbResult;

/// Stored-procedure invoker. The entire database surface of the application.
pub struct SpInvoker {
    provider: Box<dyn ConnectionProvider>,
    registry: Option<ProcedureRegistry>,
}

impl SpInvoker {
    /// Invoker without client-side signature checks; arity mismatches
    /// surface from the server at execute time.
    pub fn new(provider: impl ConnectionProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            registry: None,
        }
    }

    /// Invoker that verifies every call against a signature registry before
    /// opening a connection.
    pub fn with_registry(
        provider: impl ConnectionProvider + 'static,
        registry: ProcedureRegistry,
    ) -> Self {
        Self {
            provider: Box::new(provider),
            registry: Some(registry),
        }
    }

    /// Call a procedure returning zero or more rows.
    ///
    /// An empty result set yields an empty vec, never an error.
    pub async fn call_rows(&self, name: &str, params: &[SpParam]) -> DbResult<Vec<ResultRow>> {
        self.run_query(name, params).await
    }

    /// Call a procedure expected to return at most one row.
    ///
    /// Zero rows yield `None`; that is a valid outcome ("not found",
    /// "authentication failed"), not an error.
    pub async fn call_single_row(
        &self,
        name: &str,
        params: &[SpParam],
    ) -> DbResult<Option<ResultRow>> {
        let rows = self.run_query(name, params).await?;
        Ok(rows.into_iter().next())
    }

    /// Call a procedure and return the first column of the first row, or
    /// `None` if no row came back.
    pub async fn call_scalar(&self, name: &str, params: &[SpParam]) -> DbResult<Option<SqlValue>> {
        let rows = self.run_query(name, params).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_values().next()))
    }

    /// Call a data-modifying procedure inside an explicit transaction and
    /// return the affected-row count.
    ///
    /// Commits on success. On any execution failure a rollback is attempted
    /// before the error is returned; a rollback failure is logged and never
    /// masks the original error.
    pub async fn call_non_query(&self, name: &str, params: &[SpParam]) -> DbResult<u64> {
        self.verify(name, params)?;
        let sql = build_exec(name, params.len());

        let mut client = self.provider.acquire().await?;
        let outcome = transact(client.as_mut(), &sql, params).await;
        release(client).await;
        outcome
    }

    async fn run_query(&self, name: &str, params: &[SpParam]) -> DbResult<Vec<ResultRow>> {
        self.verify(name, params)?;
        let sql = build_exec(name, params.len());

        let mut client = self.provider.acquire().await?;
        let result = client.query(&sql, params).await;
        release(client).await;
        result
    }

    fn verify(&self, name: &str, params: &[SpParam]) -> DbResult<()> {
        match &self.registry {
            Some(registry) => registry.verify(name, params.len()),
            None => Ok(()),
        }
    }
}

/// BEGIN -> EXECUTE -> COMMIT on success | ROLLBACK on failure.
async fn transact(client: &mut dyn ProcedureClient, sql: &str, params: &[SpParam]) -> DbResult<u64> {
    client.begin().await?;
    match client.execute(sql, params).await {
        Ok(affected) => match client.commit().await {
            Ok(()) => Ok(affected),
            Err(commit_err) => {
                rollback_best_effort(client, &commit_err).await;
                Err(commit_err)
            }
        },
        Err(exec_err) => {
            rollback_best_effort(client, &exec_err).await;
            Err(exec_err)
        }
    }
}

async fn rollback_best_effort(client: &mut dyn ProcedureClient, original: &crate::error::DbError) {
    if let Err(rollback_err) = client.rollback().await {
        warn!(
            original = %original,
            error = %rollback_err,
            "Rollback failed after non-query error"
        );
    }
}

/// Release the connection unconditionally. A close failure after the
/// operation already produced its outcome is logged, not propagated.
async fn release(client: Box<dyn ProcedureClient>) {
    if let Err(e) = client.close().await {
        warn!(error = %e, "Failed to close connection");
    }
}
