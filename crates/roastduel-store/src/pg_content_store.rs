//! `PostgreSQL` implementation of the `ContentStore` trait.
//!
//! Content is keyed by its SHA-256 address, so uploads are idempotent and a
//! committed row is immediately resolvable.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use roastduel_core::content::ContentAddress;
use roastduel_core::error::DuelError;
use roastduel_core::ports::ContentStore;

use crate::schema::CREATE_CONTENT_TABLE;

/// PostgreSQL-backed content store.
#[derive(Debug, Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    /// Creates a new `PgContentStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the content table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DuelError::Infrastructure` if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DuelError> {
        sqlx::raw_sql(CREATE_CONTENT_TABLE)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    #[instrument(skip_all, fields(bytes = bytes.len()))]
    async fn put(&self, bytes: &[u8]) -> Result<ContentAddress, DuelError> {
        let address = ContentAddress::of(bytes);
        let result = sqlx::query(
            "INSERT INTO roast_content (address, body) VALUES ($1, $2) \
             ON CONFLICT (address) DO NOTHING",
        )
        .bind(address.as_str())
        .bind(bytes)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        debug!(%address, inserted = result.rows_affected() == 1, "content stored");
        Ok(address)
    }

    #[instrument(skip_all, fields(%address))]
    async fn get(&self, address: &ContentAddress) -> Result<Vec<u8>, DuelError> {
        let row: Option<(Vec<u8>,)> =
            sqlx::query_as("SELECT body FROM roast_content WHERE address = $1")
                .bind(address.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        row.map(|(body,)| body)
            .ok_or_else(|| DuelError::ContentNotFound(address.clone()))
    }
}

/// Connection-level failures are worth retrying; everything else is not.
fn map_sqlx_error(err: sqlx::Error) -> DuelError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::PoolClosed => {
            DuelError::Unavailable(format!("database unavailable: {err}"))
        }
        other => DuelError::Infrastructure(format!("database error: {other}")),
    }
}
