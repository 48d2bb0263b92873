//! CRUD execution core.
//!
//! [`CrudExecutor`] orchestrates every operation: it resolves a
//! connection (the active transaction's, or the pool for the duration of
//! the call), builds the statement, binds values positionally, executes,
//! maps results, and on failure rolls back any active transaction before
//! the error reaches the caller.
//!
//! One executor serves one logical caller. Operations take `&mut self`,
//! so a single executor cannot be driven concurrently; independent
//! callers each construct their own executor over a clone of the pool.

use crate::crud::transaction::TransactionContext;
use crate::db::executor::{mysql, postgres, sqlite};
use crate::db::{DatabaseType, DbPool, DbTransaction};
use crate::error::{CrudError, CrudResult};
use crate::models::{Row, SqlValue, Statement};
use crate::sql;
use tracing::{error, info, warn};

pub struct CrudExecutor {
    pool: DbPool,
    tx: TransactionContext,
}

impl CrudExecutor {
    /// Create an executor over a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            tx: TransactionContext::new(),
        }
    }

    /// The pool this executor draws connections from.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// The database type behind this executor.
    pub fn database_type(&self) -> DatabaseType {
        self.pool.db_type()
    }

    /// Whether a transaction is currently in flight.
    pub fn in_transaction(&self) -> bool {
        self.tx.is_active()
    }

    /// Begin a transaction. Until commit or rollback, every operation on
    /// this executor runs on the transaction's dedicated connection, in
    /// call order.
    pub async fn begin_transaction(&mut self) -> CrudResult<()> {
        self.tx.begin(&self.pool).await
    }

    /// Commit the in-flight transaction.
    pub async fn commit_transaction(&mut self) -> CrudResult<()> {
        self.tx.commit().await
    }

    /// Roll back the in-flight transaction, if any.
    ///
    /// Like the operations' automatic rollback, a failed rollback attempt
    /// is logged and swallowed; the transaction state is cleared and the
    /// connection returned to the pool regardless.
    pub async fn rollback_transaction(&mut self) {
        if let Err(e) = self.tx.rollback().await {
            warn!(error = %e, "rollback reported an error; transaction state is cleared");
        }
    }

    /// Insert one record. Returns the affected-row count.
    pub async fn create(
        &mut self,
        table: &str,
        columns: &[&str],
        values: Vec<SqlValue>,
    ) -> CrudResult<u64> {
        let stmt = sql::build_insert(self.database_type(), table, columns, values)?;
        match self.execute_write(&stmt).await {
            Ok(count) => {
                info!(operation = "create", table, rows_affected = count, "record created");
                Ok(count)
            }
            Err(e) => Err(self.fail("create", e).await),
        }
    }

    /// Read records. `columns == None` selects every column; a non-empty
    /// `where_clause` filters the result.
    ///
    /// The clause is a trusted raw SQL fragment concatenated verbatim
    /// into the statement; never pass untrusted input. Rows come back in
    /// driver order, keyed by driver-reported column names.
    pub async fn read(
        &mut self,
        table: &str,
        columns: Option<&[&str]>,
        where_clause: Option<&str>,
    ) -> CrudResult<Vec<Row>> {
        let stmt = sql::build_select(table, columns, where_clause);
        match self.fetch_rows(&stmt).await {
            Ok(rows) => {
                info!(operation = "read", table, rows = rows.len(), "records read");
                Ok(rows)
            }
            Err(e) => Err(self.fail("read", e).await),
        }
    }

    /// Update matching records. Returns the affected-row count.
    ///
    /// The clause is a trusted raw SQL fragment; never pass untrusted
    /// input. Only the column values are parameter-bound.
    pub async fn update(
        &mut self,
        table: &str,
        columns: &[&str],
        values: Vec<SqlValue>,
        where_clause: &str,
    ) -> CrudResult<u64> {
        let stmt = sql::build_update(self.database_type(), table, columns, values, where_clause)?;
        match self.execute_write(&stmt).await {
            Ok(count) => {
                info!(operation = "update", table, rows_affected = count, "records updated");
                Ok(count)
            }
            Err(e) => Err(self.fail("update", e).await),
        }
    }

    /// Delete matching records. Returns the affected-row count.
    ///
    /// The clause is a trusted raw SQL fragment; never pass untrusted
    /// input.
    pub async fn delete(&mut self, table: &str, where_clause: &str) -> CrudResult<u64> {
        let stmt = sql::build_delete(table, where_clause);
        match self.execute_write(&stmt).await {
            Ok(count) => {
                info!(operation = "delete", table, rows_affected = count, "records deleted");
                Ok(count)
            }
            Err(e) => Err(self.fail("delete", e).await),
        }
    }

    /// Execute a fully pre-formed join query and return its rows.
    ///
    /// The query text is trusted raw SQL executed verbatim; never pass
    /// untrusted input. For the builder-assisted variant see [`Self::join`].
    pub async fn execute_join_query(&mut self, query: &str) -> CrudResult<Vec<Row>> {
        let stmt = Statement::new(query);
        match self.fetch_rows(&stmt).await {
            Ok(rows) => {
                info!(operation = "join_query", rows = rows.len(), "join query executed");
                Ok(rows)
            }
            Err(e) => Err(self.fail("join query", e).await),
        }
    }

    /// Join two or more tables on a condition and return all columns.
    ///
    /// The condition is a trusted raw SQL fragment; never pass untrusted
    /// input.
    pub async fn join(&mut self, tables: &[&str], condition: &str) -> CrudResult<Vec<Row>> {
        let stmt = sql::build_join(tables, condition)?;
        match self.fetch_rows(&stmt).await {
            Ok(rows) => {
                info!(operation = "join", tables = ?tables, rows = rows.len(), "join executed");
                Ok(rows)
            }
            Err(e) => Err(self.fail("join", e).await),
        }
    }

    /// Call a stored procedure with positionally bound parameters.
    ///
    /// Fire-and-collect: rows are returned when the procedure yields any,
    /// otherwise the result is empty. Fails with
    /// [`CrudError::InvalidArgument`] on SQLite, which has no stored
    /// procedures.
    pub async fn execute_stored_procedure(
        &mut self,
        name: &str,
        params: Vec<SqlValue>,
    ) -> CrudResult<Vec<Row>> {
        let stmt = sql::build_procedure_call(self.database_type(), name, params)?;
        match self.fetch_rows(&stmt).await {
            Ok(rows) => {
                info!(
                    operation = "stored_procedure",
                    procedure = name,
                    rows = rows.len(),
                    "stored procedure executed"
                );
                Ok(rows)
            }
            Err(e) => Err(self.fail("stored procedure", e).await),
        }
    }

    /// Classify a driver failure, roll back any active transaction, and
    /// hand the primary error back for propagation. A rollback failure is
    /// logged and never returned in place of the primary error.
    async fn fail(&mut self, operation: &'static str, err: sqlx::Error) -> CrudError {
        let err = CrudError::from_driver(operation, err);
        error!(operation, error = %err, "operation failed");
        if self.tx.is_active() {
            warn!(operation, "rolling back active transaction after failure");
            if let Err(cleanup) = self.tx.rollback().await {
                warn!(error = %cleanup, "rollback after failed operation also failed");
            }
        }
        err
    }

    /// Run a write statement on the transaction's connection when one is
    /// active, otherwise on a pooled connection scoped to this call.
    async fn execute_write(&mut self, stmt: &Statement) -> Result<u64, sqlx::Error> {
        if let Some(tx) = self.tx.active_mut() {
            match tx {
                DbTransaction::MySql(t) => {
                    mysql::execute_write(&mut **t, &stmt.sql, &stmt.params).await
                }
                DbTransaction::Postgres(t) => {
                    postgres::execute_write(&mut **t, &stmt.sql, &stmt.params).await
                }
                DbTransaction::SQLite(t) => {
                    sqlite::execute_write(&mut **t, &stmt.sql, &stmt.params).await
                }
            }
        } else {
            match &self.pool {
                DbPool::MySql(p) => mysql::execute_write(p, &stmt.sql, &stmt.params).await,
                DbPool::Postgres(p) => postgres::execute_write(p, &stmt.sql, &stmt.params).await,
                DbPool::SQLite(p) => sqlite::execute_write(p, &stmt.sql, &stmt.params).await,
            }
        }
    }

    /// Run a query statement, same connection routing as `execute_write`.
    async fn fetch_rows(&mut self, stmt: &Statement) -> Result<Vec<Row>, sqlx::Error> {
        if let Some(tx) = self.tx.active_mut() {
            match tx {
                DbTransaction::MySql(t) => {
                    mysql::fetch_rows(&mut **t, &stmt.sql, &stmt.params).await
                }
                DbTransaction::Postgres(t) => {
                    postgres::fetch_rows(&mut **t, &stmt.sql, &stmt.params).await
                }
                DbTransaction::SQLite(t) => {
                    sqlite::fetch_rows(&mut **t, &stmt.sql, &stmt.params).await
                }
            }
        } else {
            match &self.pool {
                DbPool::MySql(p) => mysql::fetch_rows(p, &stmt.sql, &stmt.params).await,
                DbPool::Postgres(p) => postgres::fetch_rows(p, &stmt.sql, &stmt.params).await,
                DbPool::SQLite(p) => sqlite::fetch_rows(p, &stmt.sql, &stmt.params).await,
            }
        }
    }
}
