//! Transactional CRUD data-access layer.
//!
//! Executes parameterized CRUD and procedural SQL operations against
//! MySQL, PostgreSQL, or SQLite through a pooled connection set. Every
//! operation runs on the active transaction's connection when one is in
//! flight, otherwise on a pooled connection scoped to the call; any
//! failure during a transactional operation rolls the transaction back
//! before the error reaches the caller.
//!
//! ```no_run
//! use sqlcrud::config::DbConfig;
//! use sqlcrud::db::DbPool;
//! use sqlcrud::{CrudExecutor, SqlValue};
//!
//! # async fn demo() -> sqlcrud::CrudResult<()> {
//! let pool = DbPool::connect(&DbConfig::new("sqlite:data.db")?).await?;
//! let mut executor = CrudExecutor::new(pool);
//!
//! executor.begin_transaction().await?;
//! executor
//!     .create("users", &["name", "email"], vec![
//!         SqlValue::from("Ann"),
//!         SqlValue::from("a@x.com"),
//!     ])
//!     .await?;
//! executor.commit_transaction().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crud;
pub mod db;
pub mod error;
pub mod models;
pub mod sql;

pub use crud::{CrudExecutor, TransactionContext};
pub use error::{CrudError, CrudResult};
pub use models::{Row, SqlValue, Statement};
