//! Database abstraction layer.
//!
//! - Connection pool management and type detection
//! - Low-level statement execution, generic over pool and transaction
//! - Positional parameter binding
//! - Row decoding into dynamically typed records

pub(crate) mod executor;
pub(crate) mod params;
pub mod pool;
pub mod transaction;
pub mod types;

pub use pool::{DatabaseType, DbPool};
pub use transaction::DbTransaction;
pub use types::{RowToRecord, TypeCategory, categorize_type};
