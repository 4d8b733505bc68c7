//! Database test fixtures and utilities
//!
//! PostgreSQL tests run only when `TEST_DATABASE_URL` is set; otherwise the
//! fixture returns `None` and the test returns early.

use schoolhub::backend::store::PgStore;

/// Environment variable naming the test database
pub const TEST_DATABASE_ENV: &str = "TEST_DATABASE_URL";

/// Connect, migrate and empty the test database
pub async fn test_pg_store() -> Option<PgStore> {
    let url = std::env::var(TEST_DATABASE_ENV).ok()?;
    let store = PgStore::connect(&url)
        .await
        .expect("Failed to connect to test database");
    store.migrate().await.expect("Failed to run migrations");
    cleanup_test_data(&store).await;
    Some(store)
}

/// Remove all rows while preserving the schema
pub async fn cleanup_test_data(store: &PgStore) {
    sqlx::query("TRUNCATE TABLE records, messages, message_threads")
        .execute(store.pool())
        .await
        .expect("Failed to clean test data");
}
