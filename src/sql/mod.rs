//! Statement builders.
//!
//! Pure string/list transformations from table, column, value, and
//! predicate inputs into [`Statement`] descriptors. Nothing here touches a
//! connection; placeholder syntax is chosen per [`DatabaseType`]
//! (`?` for MySQL and SQLite, `$1`, `$2`, … for PostgreSQL).
//!
//! # Trust boundary
//!
//! `where_clause` and join-condition arguments are accepted as raw SQL
//! fragments and concatenated verbatim into the statement text. Only
//! column values (and procedure parameters) are parameter-bound. Never
//! pass untrusted input as a predicate.

use crate::db::DatabaseType;
use crate::error::{CrudError, CrudResult};
use crate::models::{SqlValue, Statement};

/// Build `INSERT INTO <table> (<cols>) VALUES (<placeholders>)` with one
/// positional placeholder per column, values bound in column order.
///
/// Fails with [`CrudError::InvalidArgument`] when the column list is empty
/// or its length differs from the value list.
pub fn build_insert(
    db: DatabaseType,
    table: &str,
    columns: &[&str],
    values: Vec<SqlValue>,
) -> CrudResult<Statement> {
    check_arity(columns, &values)?;

    let placeholders: Vec<String> = (1..=columns.len()).map(|n| db.placeholder(n)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok(Statement::with_params(sql, values))
}

/// Build a SELECT statement.
///
/// `columns == None` yields `SELECT *`. A non-empty `where_clause` is
/// appended verbatim as `WHERE <clause>` (trusted raw fragment, see the
/// module docs); `None` or an empty clause selects the whole table.
pub fn build_select(table: &str, columns: Option<&[&str]>, where_clause: Option<&str>) -> Statement {
    let column_list = match columns {
        Some(cols) if !cols.is_empty() => cols.join(", "),
        _ => "*".to_string(),
    };

    let mut sql = format!("SELECT {} FROM {}", column_list, table);
    if let Some(clause) = where_clause {
        if !clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }
    }
    Statement::new(sql)
}

/// Build `UPDATE <table> SET c1 = ?, c2 = ? WHERE <clause>` with values
/// bound in column order.
///
/// The clause is a trusted raw fragment (see the module docs). Fails with
/// [`CrudError::InvalidArgument`] on a column/value arity mismatch or an
/// empty column list.
pub fn build_update(
    db: DatabaseType,
    table: &str,
    columns: &[&str],
    values: Vec<SqlValue>,
    where_clause: &str,
) -> CrudResult<Statement> {
    check_arity(columns, &values)?;

    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{} = {}", col, db.placeholder(i + 1)))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        table,
        assignments.join(", "),
        where_clause
    );
    Ok(Statement::with_params(sql, values))
}

/// Build `DELETE FROM <table> WHERE <clause>`.
///
/// The clause is a trusted raw fragment (see the module docs).
pub fn build_delete(table: &str, where_clause: &str) -> Statement {
    Statement::new(format!("DELETE FROM {} WHERE {}", table, where_clause))
}

/// Build `SELECT * FROM a JOIN b ON <condition>` over two or more tables.
///
/// The join condition is a trusted raw fragment (see the module docs).
/// Callers with a fully pre-formed join query should use
/// [`crate::crud::CrudExecutor::execute_join_query`] instead.
pub fn build_join(tables: &[&str], condition: &str) -> CrudResult<Statement> {
    if tables.len() < 2 {
        return Err(CrudError::invalid_argument(
            "a join requires at least two tables",
        ));
    }
    Ok(Statement::new(format!(
        "SELECT * FROM {} ON {}",
        tables.join(" JOIN "),
        condition
    )))
}

/// Build `CALL <name>(<placeholders>)` with one positional placeholder per
/// parameter, parameters bound in order.
///
/// SQLite has no stored procedures; requesting one there fails with
/// [`CrudError::InvalidArgument`] before any I/O.
pub fn build_procedure_call(
    db: DatabaseType,
    name: &str,
    params: Vec<SqlValue>,
) -> CrudResult<Statement> {
    if db == DatabaseType::SQLite {
        return Err(CrudError::invalid_argument(
            "SQLite does not support stored procedures",
        ));
    }

    let placeholders: Vec<String> = (1..=params.len()).map(|n| db.placeholder(n)).collect();
    let sql = format!("CALL {}({})", name, placeholders.join(", "));
    Ok(Statement::with_params(sql, params))
}

fn check_arity(columns: &[&str], values: &[SqlValue]) -> CrudResult<()> {
    if columns.is_empty() || values.is_empty() {
        return Err(CrudError::invalid_argument(
            "columns and values must be non-empty",
        ));
    }
    if columns.len() != values.len() {
        return Err(CrudError::invalid_argument(format!(
            "columns and values must be of equal length ({} columns, {} values)",
            columns.len(),
            values.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_placeholder_count_and_order() {
        let values = vec![SqlValue::from("Ann"), SqlValue::from("a@x.com")];
        let stmt = build_insert(
            DatabaseType::SQLite,
            "users",
            &["name", "email"],
            values.clone(),
        )
        .unwrap();

        assert_eq!(stmt.sql, "INSERT INTO users (name, email) VALUES (?, ?)");
        assert_eq!(stmt.sql.matches('?').count(), 2);
        assert_eq!(stmt.params, values);
    }

    #[test]
    fn test_insert_postgres_numbering() {
        let stmt = build_insert(
            DatabaseType::PostgreSQL,
            "users",
            &["name", "email", "age"],
            vec![
                SqlValue::from("Ann"),
                SqlValue::from("a@x.com"),
                SqlValue::Int(30),
            ],
        )
        .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO users (name, email, age) VALUES ($1, $2, $3)"
        );
    }

    #[test]
    fn test_insert_arity_mismatch() {
        let result = build_insert(
            DatabaseType::MySQL,
            "users",
            &["name", "email"],
            vec![SqlValue::from("Ann")],
        );
        assert!(matches!(result, Err(CrudError::InvalidArgument { .. })));
    }

    #[test]
    fn test_insert_empty_columns() {
        let result = build_insert(DatabaseType::MySQL, "users", &[], vec![]);
        assert!(matches!(result, Err(CrudError::InvalidArgument { .. })));
    }

    #[test]
    fn test_select_star_with_where() {
        let stmt = build_select("users", None, Some("age > 25"));
        assert_eq!(stmt.sql, "SELECT * FROM users WHERE age > 25");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_select_columns_no_where() {
        let stmt = build_select("users", Some(&["id", "name"]), None);
        assert_eq!(stmt.sql, "SELECT id, name FROM users");
    }

    #[test]
    fn test_select_empty_where_ignored() {
        let stmt = build_select("users", None, Some(""));
        assert_eq!(stmt.sql, "SELECT * FROM users");
    }

    #[test]
    fn test_update_assignments() {
        let stmt = build_update(
            DatabaseType::SQLite,
            "users",
            &["email", "status"],
            vec![SqlValue::from("new@x.com"), SqlValue::from("inactive")],
            "id = 123",
        )
        .unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE users SET email = ?, status = ? WHERE id = 123"
        );
        assert_eq!(stmt.params.len(), 2);
    }

    #[test]
    fn test_update_postgres_numbering() {
        let stmt = build_update(
            DatabaseType::PostgreSQL,
            "users",
            &["email", "status"],
            vec![SqlValue::from("new@x.com"), SqlValue::from("inactive")],
            "id = 1",
        )
        .unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE users SET email = $1, status = $2 WHERE id = 1"
        );
    }

    #[test]
    fn test_update_arity_mismatch() {
        let result = build_update(
            DatabaseType::SQLite,
            "users",
            &["email"],
            vec![SqlValue::from("a"), SqlValue::from("b")],
            "id = 1",
        );
        assert!(matches!(result, Err(CrudError::InvalidArgument { .. })));
    }

    #[test]
    fn test_delete() {
        let stmt = build_delete("users", "email = 'x@y.com'");
        assert_eq!(stmt.sql, "DELETE FROM users WHERE email = 'x@y.com'");
    }

    #[test]
    fn test_join() {
        let stmt = build_join(&["users", "orders"], "users.id = orders.user_id").unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM users JOIN orders ON users.id = orders.user_id"
        );
    }

    #[test]
    fn test_join_requires_two_tables() {
        let result = build_join(&["users"], "users.id = users.id");
        assert!(matches!(result, Err(CrudError::InvalidArgument { .. })));
    }

    #[test]
    fn test_procedure_call_mysql() {
        let stmt = build_procedure_call(
            DatabaseType::MySQL,
            "get_user_details",
            vec![SqlValue::Int(123)],
        )
        .unwrap();
        assert_eq!(stmt.sql, "CALL get_user_details(?)");
        assert_eq!(stmt.params.len(), 1);
    }

    #[test]
    fn test_procedure_call_postgres() {
        let stmt = build_procedure_call(
            DatabaseType::PostgreSQL,
            "archive_orders",
            vec![SqlValue::Int(2024), SqlValue::Bool(true)],
        )
        .unwrap();
        assert_eq!(stmt.sql, "CALL archive_orders($1, $2)");
    }

    #[test]
    fn test_procedure_call_no_params() {
        let stmt = build_procedure_call(DatabaseType::MySQL, "refresh_stats", vec![]).unwrap();
        assert_eq!(stmt.sql, "CALL refresh_stats()");
    }

    #[test]
    fn test_procedure_call_rejected_on_sqlite() {
        let result = build_procedure_call(DatabaseType::SQLite, "anything", vec![]);
        assert!(matches!(result, Err(CrudError::InvalidArgument { .. })));
    }
}
