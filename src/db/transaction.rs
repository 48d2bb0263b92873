//! Database-specific transaction wrapper.
//!
//! [`DbTransaction`] wraps the sqlx transaction types behind one
//! interface. Both `commit` and `rollback` consume the value; sqlx
//! returns the underlying connection to its pool on every outcome of
//! either call, and a dropped transaction rolls back as a backstop.

use crate::db::pool::{DatabaseType, DbPool};
use sqlx::{MySql, Postgres, Sqlite, Transaction};

pub enum DbTransaction {
    /// MySQL transaction
    MySql(Transaction<'static, MySql>),
    /// PostgreSQL transaction
    Postgres(Transaction<'static, Postgres>),
    /// SQLite transaction
    SQLite(Transaction<'static, Sqlite>),
}

impl DbTransaction {
    /// Begin a transaction, acquiring a dedicated connection from the
    /// pool. The connection runs without auto-commit until the
    /// transaction is resolved.
    pub async fn begin(pool: &DbPool) -> Result<Self, sqlx::Error> {
        Ok(match pool {
            DbPool::MySql(p) => DbTransaction::MySql(p.begin().await?),
            DbPool::Postgres(p) => DbTransaction::Postgres(p.begin().await?),
            DbPool::SQLite(p) => DbTransaction::SQLite(p.begin().await?),
        })
    }

    /// Get the database type for this transaction.
    pub fn db_type(&self) -> DatabaseType {
        match self {
            DbTransaction::MySql(_) => DatabaseType::MySQL,
            DbTransaction::Postgres(_) => DatabaseType::PostgreSQL,
            DbTransaction::SQLite(_) => DatabaseType::SQLite,
        }
    }

    /// Commit the transaction, releasing its connection.
    pub async fn commit(self) -> Result<(), sqlx::Error> {
        match self {
            DbTransaction::MySql(tx) => tx.commit().await,
            DbTransaction::Postgres(tx) => tx.commit().await,
            DbTransaction::SQLite(tx) => tx.commit().await,
        }
    }

    /// Roll the transaction back, releasing its connection.
    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        match self {
            DbTransaction::MySql(tx) => tx.rollback().await,
            DbTransaction::Postgres(tx) => tx.rollback().await,
            DbTransaction::SQLite(tx) => tx.rollback().await,
        }
    }
}
