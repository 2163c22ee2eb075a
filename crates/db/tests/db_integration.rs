//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `asamblea_test`)
//!   `TEST_DB_PASSWORD` (default: `asamblea_test`)
//!   `TEST_DB_NAME` (default: `asamblea_test`)

#![allow(clippy::unwrap_used)]

use asamblea_db::test_utils::{TestDatabase, TestDbConfig};

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply_cleanly() {
    let db = TestDatabase::create_unique().await.unwrap();
    let result = asamblea_db::migrate(db.connection()).await;
    assert!(result.is_ok(), "Migration failed: {:?}", result.err());
    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_claim_consumes_code_exactly_once() {
    use asamblea_db::repositories::CodeRepository;

    let db = TestDatabase::create_unique().await.unwrap();
    asamblea_db::migrate(db.connection()).await.unwrap();

    db.seed_assembly("asm1", "Test assembly", true).await.unwrap();
    db.seed_code("code1", "asm1", "COV001-AAAA", 1).await.unwrap();

    let repo = CodeRepository::new(db.shared_connection());

    // First claim wins, second must lose
    assert!(repo.claim("code1").await.unwrap());
    assert!(!repo.claim("code1").await.unwrap());

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.ends_with("/postgres"));
}
