//! Transaction-scoped CRUD execution.

pub mod executor;
pub mod transaction;

pub use executor::CrudExecutor;
pub use transaction::TransactionContext;
