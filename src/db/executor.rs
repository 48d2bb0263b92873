//! Low-level statement execution.
//!
//! Each database submodule provides the same two entry points, generic
//! over [`sqlx::Executor`] so a single code path serves both `&Pool`
//! (per-call scoped acquisition, released on every exit path) and the
//! connection held by a live transaction.
//!
//! When no parameters are bound, the statement runs over the raw
//! non-prepared path; some statements (e.g. `CREATE PROCEDURE` bodies)
//! reject prepared execution.

use crate::db::params::{bind_mysql_value, bind_postgres_value, bind_sqlite_value};
use crate::db::types::RowToRecord;
use crate::models::{Row, SqlValue};

pub(crate) mod mysql {
    use super::*;
    use sqlx::MySql;
    use sqlx::mysql::MySqlRow;

    pub(crate) async fn fetch_rows<'c, E>(
        executor: E,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<Row>, sqlx::Error>
    where
        E: sqlx::Executor<'c, Database = MySql>,
    {
        let rows: Vec<MySqlRow> = if params.is_empty() {
            executor.fetch_all(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for value in params {
                query = bind_mysql_value(query, value);
            }
            query.fetch_all(executor).await?
        };
        Ok(rows.iter().map(RowToRecord::to_record).collect())
    }

    pub(crate) async fn execute_write<'c, E>(
        executor: E,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<u64, sqlx::Error>
    where
        E: sqlx::Executor<'c, Database = MySql>,
    {
        if params.is_empty() {
            return Ok(executor.execute(sql).await?.rows_affected());
        }
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_mysql_value(query, value);
        }
        Ok(query.execute(executor).await?.rows_affected())
    }
}

pub(crate) mod postgres {
    use super::*;
    use sqlx::Postgres;
    use sqlx::postgres::PgRow;

    pub(crate) async fn fetch_rows<'c, E>(
        executor: E,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<Row>, sqlx::Error>
    where
        E: sqlx::Executor<'c, Database = Postgres>,
    {
        let rows: Vec<PgRow> = if params.is_empty() {
            executor.fetch_all(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for value in params {
                query = bind_postgres_value(query, value);
            }
            query.fetch_all(executor).await?
        };
        Ok(rows.iter().map(RowToRecord::to_record).collect())
    }

    pub(crate) async fn execute_write<'c, E>(
        executor: E,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<u64, sqlx::Error>
    where
        E: sqlx::Executor<'c, Database = Postgres>,
    {
        if params.is_empty() {
            return Ok(executor.execute(sql).await?.rows_affected());
        }
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_postgres_value(query, value);
        }
        Ok(query.execute(executor).await?.rows_affected())
    }
}

pub(crate) mod sqlite {
    use super::*;
    use sqlx::Sqlite;
    use sqlx::sqlite::SqliteRow;

    pub(crate) async fn fetch_rows<'c, E>(
        executor: E,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<Row>, sqlx::Error>
    where
        E: sqlx::Executor<'c, Database = Sqlite>,
    {
        let rows: Vec<SqliteRow> = if params.is_empty() {
            executor.fetch_all(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for value in params {
                query = bind_sqlite_value(query, value);
            }
            query.fetch_all(executor).await?
        };
        Ok(rows.iter().map(RowToRecord::to_record).collect())
    }

    pub(crate) async fn execute_write<'c, E>(
        executor: E,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<u64, sqlx::Error>
    where
        E: sqlx::Executor<'c, Database = Sqlite>,
    {
        if params.is_empty() {
            return Ok(executor.execute(sql).await?.rows_affected());
        }
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_sqlite_value(query, value);
        }
        Ok(query.execute(executor).await?.rows_affected())
    }
}
