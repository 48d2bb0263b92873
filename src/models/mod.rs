//! Data models for the CRUD layer.

pub mod statement;
pub mod value;

pub use statement::Statement;
pub use value::{Row, SqlValue};
