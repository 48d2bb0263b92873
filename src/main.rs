//! Demo driver.
//!
//! Runs a CRUD and transaction walkthrough against the configured
//! database: insert, filtered read, update, delete, a join, and a
//! transaction that is rolled back on failure.

use clap::Parser;
use sqlcrud::config::Config;
use sqlcrud::db::DbPool;
use sqlcrud::{CrudExecutor, CrudResult, SqlValue};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_tracing(&config);

    let db_config = config.db_config()?;
    info!(
        target = %db_config.masked_connection_string(),
        "starting sqlcrud demo v{}",
        env!("CARGO_PKG_VERSION")
    );

    let pool = DbPool::connect(&db_config).await?;
    let mut executor = CrudExecutor::new(pool.clone());

    if let Err(e) = run_walkthrough(&mut executor).await {
        // Operations roll back automatically; this covers failures
        // between operations
        executor.rollback_transaction().await;
        pool.close().await;
        return Err(e.into());
    }

    pool.close().await;
    Ok(())
}

async fn run_walkthrough(executor: &mut CrudExecutor) -> CrudResult<()> {
    // Create a record
    let created = executor
        .create(
            "users",
            &["name", "email", "age"],
            vec![
                SqlValue::from("John Doe"),
                SqlValue::from("john@example.com"),
                SqlValue::Int(30),
            ],
        )
        .await?;
    println!("created {} record(s)", created);

    // Read back with a predicate
    let users = executor
        .read("users", Some(&["name", "email"]), Some("age > 25"))
        .await?;
    println!("read {} user(s) older than 25", users.len());
    for user in &users {
        let line = serde_json::to_string(user).unwrap_or_else(|_| format!("{:?}", user));
        println!("  {}", line);
    }

    // Update a column
    let updated = executor
        .update(
            "users",
            &["email"],
            vec![SqlValue::from("new.email@example.com")],
            "email = 'john@example.com'",
        )
        .await?;
    println!("updated {} record(s)", updated);

    // Transactional sequence: both writes commit together
    executor.begin_transaction().await?;
    executor
        .create(
            "users",
            &["name", "email", "age"],
            vec![
                SqlValue::from("Test User"),
                SqlValue::from("test@example.com"),
                SqlValue::Int(41),
            ],
        )
        .await?;
    executor
        .update(
            "users",
            &["age"],
            vec![SqlValue::Int(42)],
            "email = 'test@example.com'",
        )
        .await?;
    executor.commit_transaction().await?;
    println!("transactional insert+update committed");

    // Join the users and orders tables, if orders exists
    match executor
        .join(&["users", "orders"], "users.id = orders.user_id")
        .await
    {
        Ok(rows) => println!("join returned {} row(s)", rows.len()),
        Err(e) => println!("join skipped: {}", e),
    }

    // Clean up the demo rows
    let deleted = executor
        .delete("users", "email IN ('new.email@example.com', 'test@example.com')")
        .await?;
    println!("deleted {} record(s)", deleted);

    Ok(())
}
