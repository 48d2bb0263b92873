//! End-to-end tests for the CRUD operations against a SQLite database.

use sqlcrud::config::{DbConfig, PoolOptions};
use sqlcrud::db::DbPool;
use sqlcrud::{CrudError, CrudExecutor, SqlValue};
use tempfile::TempDir;

async fn sqlite_pool(dir: &TempDir) -> DbPool {
    let path = dir.path().join("test.db");
    let config = DbConfig::with_pool_options(
        format!("sqlite:{}", path.display()),
        PoolOptions {
            max_connections: Some(2),
            acquire_timeout_secs: Some(5),
            ..PoolOptions::default()
        },
    )
    .unwrap();
    DbPool::connect(&config).await.unwrap()
}

async fn setup_users_table(pool: &DbPool) {
    let DbPool::SQLite(p) = pool else {
        panic!("expected a SQLite pool");
    };
    sqlx::query(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT,
            age INTEGER,
            active BOOLEAN,
            score REAL
        )",
    )
    .execute(p)
    .await
    .unwrap();
}

async fn setup_orders_table(pool: &DbPool) {
    let DbPool::SQLite(p) = pool else {
        panic!("expected a SQLite pool");
    };
    sqlx::query(
        "CREATE TABLE orders (
            order_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            total REAL
        )",
    )
    .execute(p)
    .await
    .unwrap();
}

/// One connection borrowed and released, one row inserted, affected count 1.
#[tokio::test]
async fn test_create_single_record() {
    let dir = TempDir::new().unwrap();
    let pool = sqlite_pool(&dir).await;
    setup_users_table(&pool).await;

    let mut executor = CrudExecutor::new(pool.clone());
    let affected = executor
        .create(
            "users",
            &["name", "email"],
            vec![SqlValue::from("Ann"), SqlValue::from("a@x.com")],
        )
        .await
        .unwrap();

    assert_eq!(affected, 1);
    // No connection may remain checked out after a non-transactional call
    assert_eq!((pool.size() as usize).saturating_sub(pool.num_idle()), 0);
}

#[tokio::test]
async fn test_create_arity_mismatch_fails_before_io() {
    let dir = TempDir::new().unwrap();
    let pool = sqlite_pool(&dir).await;
    setup_users_table(&pool).await;

    let mut executor = CrudExecutor::new(pool);
    let result = executor
        .create("users", &["name", "email"], vec![SqlValue::from("Ann")])
        .await;
    assert!(matches!(result, Err(CrudError::InvalidArgument { .. })));
}

/// Row order follows the driver; row keys are the driver-reported column
/// names.
#[tokio::test]
async fn test_read_preserves_order_and_column_names() {
    let dir = TempDir::new().unwrap();
    let pool = sqlite_pool(&dir).await;
    setup_users_table(&pool).await;

    let mut executor = CrudExecutor::new(pool);
    for (name, age) in [("Ann", 34), ("Bob", 22), ("Cleo", 51)] {
        executor
            .create(
                "users",
                &["name", "age"],
                vec![SqlValue::from(name), SqlValue::Int(age)],
            )
            .await
            .unwrap();
    }

    let rows = executor.read("users", None, Some("age > 25")).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], SqlValue::from("Ann"));
    assert_eq!(rows[1]["name"], SqlValue::from("Cleo"));
    for row in &rows {
        let mut keys: Vec<&str> = row.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["active", "age", "email", "id", "name", "score"]);
    }
}

#[tokio::test]
async fn test_read_specific_columns() {
    let dir = TempDir::new().unwrap();
    let pool = sqlite_pool(&dir).await;
    setup_users_table(&pool).await;

    let mut executor = CrudExecutor::new(pool);
    executor
        .create(
            "users",
            &["name", "email", "age"],
            vec![
                SqlValue::from("Ann"),
                SqlValue::from("a@x.com"),
                SqlValue::Int(34),
            ],
        )
        .await
        .unwrap();

    let rows = executor
        .read("users", Some(&["name", "email"]), None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 2);
    assert_eq!(rows[0]["email"], SqlValue::from("a@x.com"));
}

#[tokio::test]
async fn test_value_round_trip() {
    let dir = TempDir::new().unwrap();
    let pool = sqlite_pool(&dir).await;
    setup_users_table(&pool).await;

    let mut executor = CrudExecutor::new(pool);
    executor
        .create(
            "users",
            &["name", "email", "age", "active", "score"],
            vec![
                SqlValue::from("Ann"),
                SqlValue::Null,
                SqlValue::Int(34),
                SqlValue::Bool(true),
                SqlValue::Float(91.5),
            ],
        )
        .await
        .unwrap();

    let rows = executor.read("users", None, None).await.unwrap();
    let row = &rows[0];

    assert_eq!(row["name"], SqlValue::Text("Ann".to_string()));
    assert_eq!(row["email"], SqlValue::Null);
    assert_eq!(row["age"], SqlValue::Int(34));
    assert_eq!(row["active"], SqlValue::Bool(true));
    assert_eq!(row["score"], SqlValue::Float(91.5));
}

#[tokio::test]
async fn test_update_affected_count() {
    let dir = TempDir::new().unwrap();
    let pool = sqlite_pool(&dir).await;
    setup_users_table(&pool).await;

    let mut executor = CrudExecutor::new(pool);
    for name in ["Ann", "Bob"] {
        executor
            .create(
                "users",
                &["name", "email"],
                vec![SqlValue::from(name), SqlValue::from("old@x.com")],
            )
            .await
            .unwrap();
    }

    let affected = executor
        .update(
            "users",
            &["email"],
            vec![SqlValue::from("new@x.com")],
            "email = 'old@x.com'",
        )
        .await
        .unwrap();
    assert_eq!(affected, 2);

    let rows = executor
        .read("users", None, Some("email = 'new@x.com'"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

/// Delete one matching row, then the same predicate reads back empty.
#[tokio::test]
async fn test_delete_then_read_empty() {
    let dir = TempDir::new().unwrap();
    let pool = sqlite_pool(&dir).await;
    setup_users_table(&pool).await;

    let mut executor = CrudExecutor::new(pool);
    executor
        .create(
            "users",
            &["name", "email"],
            vec![SqlValue::from("Ann"), SqlValue::from("x@y.com")],
        )
        .await
        .unwrap();

    let affected = executor.delete("users", "email = 'x@y.com'").await.unwrap();
    assert_eq!(affected, 1);

    let rows = executor
        .read("users", None, Some("email = 'x@y.com'"))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_join_entry_points() {
    let dir = TempDir::new().unwrap();
    let pool = sqlite_pool(&dir).await;
    setup_users_table(&pool).await;
    setup_orders_table(&pool).await;

    let mut executor = CrudExecutor::new(pool);
    executor
        .create(
            "users",
            &["name", "email"],
            vec![SqlValue::from("Ann"), SqlValue::from("a@x.com")],
        )
        .await
        .unwrap();
    executor
        .create(
            "orders",
            &["user_id", "total"],
            vec![SqlValue::Int(1), SqlValue::Float(19.99)],
        )
        .await
        .unwrap();

    // Raw entry point: a fully pre-formed query
    let rows = executor
        .execute_join_query(
            "SELECT u.name, o.total FROM users u JOIN orders o ON u.id = o.user_id",
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], SqlValue::from("Ann"));
    assert_eq!(rows[0]["total"], SqlValue::Float(19.99));

    // Builder-assisted entry point
    let rows = executor
        .join(&["users", "orders"], "users.id = orders.user_id")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_operation_failure_carries_cause() {
    let dir = TempDir::new().unwrap();
    let pool = sqlite_pool(&dir).await;
    setup_users_table(&pool).await;

    let mut executor = CrudExecutor::new(pool);
    let err = executor
        .read("no_such_table", None, None)
        .await
        .unwrap_err();

    match err {
        CrudError::OperationFailure { operation, source } => {
            assert_eq!(operation, "read");
            assert!(source.to_string().contains("no_such_table"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_stored_procedure_rejected_on_sqlite() {
    let dir = TempDir::new().unwrap();
    let pool = sqlite_pool(&dir).await;

    let mut executor = CrudExecutor::new(pool.clone());
    let result = executor
        .execute_stored_procedure("get_user_details", vec![SqlValue::Int(1)])
        .await;
    assert!(matches!(result, Err(CrudError::InvalidArgument { .. })));
    // Rejected before any I/O, so nothing was borrowed
    assert_eq!((pool.size() as usize).saturating_sub(pool.num_idle()), 0);
}
