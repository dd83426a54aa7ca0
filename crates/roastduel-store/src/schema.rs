//! Content store database schema.

/// SQL to create the content table. Mirrors `migrations/0001_roast_content.sql`.
pub const CREATE_CONTENT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS roast_content (
    address    VARCHAR(128) PRIMARY KEY,
    body       BYTEA NOT NULL,
    stored_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";
