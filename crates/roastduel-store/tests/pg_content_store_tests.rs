//! Integration tests for `PgContentStore`. They need a PostgreSQL server
//! reachable through `DATABASE_URL`; run them with `cargo test -- --ignored`.

use roastduel_core::content::ContentAddress;
use roastduel_core::error::DuelError;
use roastduel_core::ports::ContentStore;
use roastduel_store::pg_content_store::PgContentStore;
use sqlx::PgPool;

const ROAST: &[u8] = b"Your empire fell faster than your jokes.";

// --- put ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_put_returns_sha256_address(pool: PgPool) {
    let store = PgContentStore::new(pool);

    let address = store.put(ROAST).await.unwrap();

    assert_eq!(address, ContentAddress::of(ROAST));
    assert!(address.is_well_formed());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_put_is_idempotent(pool: PgPool) {
    let store = PgContentStore::new(pool.clone());

    let first = store.put(ROAST).await.unwrap();
    let second = store.put(ROAST).await.unwrap();

    assert_eq!(first, second);
    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM roast_content")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

// --- get ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_get_returns_stored_bytes(pool: PgPool) {
    let store = PgContentStore::new(pool);
    let address = store.put(ROAST).await.unwrap();

    let bytes = store.get(&address).await.unwrap();

    assert_eq!(bytes, ROAST);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_get_unknown_address_is_not_found(pool: PgPool) {
    let store = PgContentStore::new(pool);

    let err = store.get(&ContentAddress::of(b"missing")).await.unwrap_err();

    assert!(matches!(err, DuelError::ContentNotFound(_)));
}

// --- schema ---

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_ensure_schema_is_repeatable(pool: PgPool) {
    let store = PgContentStore::new(pool);

    store.ensure_schema().await.unwrap();
    store.ensure_schema().await.unwrap();

    assert!(store.put(ROAST).await.is_ok());
}
