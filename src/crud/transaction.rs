//! Transaction context.
//!
//! Single-slot holder for an in-flight transaction. One context exists
//! per executor; it is populated by `begin` and cleared by `commit` or
//! `rollback` through a single path: the transaction is taken out of the
//! slot *before* the driver call runs, so the context ends up idle no
//! matter how that call ends. Connection release is handled by
//! [`DbTransaction`]'s consume-on-commit/rollback semantics, which return
//! the connection to the pool on every outcome.

use crate::db::{DbPool, DbTransaction};
use crate::error::{CrudError, CrudResult};
use tracing::info;

/// Holds at most one active transaction's connection.
///
/// State machine: `IDLE → begin → ACTIVE → (commit | rollback) → IDLE`.
/// `begin` while active and `commit` while idle are rejected; `rollback`
/// while idle is a no-op.
#[derive(Default)]
pub struct TransactionContext {
    current: Option<DbTransaction>,
}

impl TransactionContext {
    /// Create an idle context.
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Whether a transaction is currently in flight.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut DbTransaction> {
        self.current.as_mut()
    }

    /// Begin a transaction on a connection acquired from `pool`.
    ///
    /// The connection is held exclusively until `commit` or `rollback`.
    /// Fails with [`CrudError::AlreadyInTransaction`] if one is in flight.
    pub async fn begin(&mut self, pool: &DbPool) -> CrudResult<()> {
        if self.current.is_some() {
            return Err(CrudError::AlreadyInTransaction);
        }
        let tx = DbTransaction::begin(pool)
            .await
            .map_err(|e| CrudError::from_driver("begin transaction", e))?;
        self.current = Some(tx);
        info!("transaction started");
        Ok(())
    }

    /// Commit the in-flight transaction.
    ///
    /// Fails with [`CrudError::NoActiveTransaction`] if idle. The slot is
    /// cleared before the commit runs; if the commit itself fails the
    /// error propagates, but the context is already idle and the
    /// connection has been returned to the pool.
    pub async fn commit(&mut self) -> CrudResult<()> {
        let tx = self.current.take().ok_or(CrudError::NoActiveTransaction)?;
        tx.commit()
            .await
            .map_err(|e| CrudError::from_driver("commit transaction", e))?;
        info!("transaction committed");
        Ok(())
    }

    /// Roll back the in-flight transaction, if any.
    ///
    /// Idle contexts are a no-op, so calling this twice in a row is safe.
    /// A failed rollback attempt surfaces as [`CrudError::CleanupFailure`];
    /// the slot is cleared and the connection returned to the pool either
    /// way.
    pub async fn rollback(&mut self) -> CrudResult<()> {
        let Some(tx) = self.current.take() else {
            return Ok(());
        };
        match tx.rollback().await {
            Ok(()) => {
                info!("transaction rolled back");
                Ok(())
            }
            Err(e) => Err(CrudError::cleanup(format!(
                "transaction rollback failed: {}",
                e
            ))),
        }
    }
}
