//! PostgreSQL store tests (skipped without `TEST_DATABASE_URL`)

pub mod pg_store_test;
