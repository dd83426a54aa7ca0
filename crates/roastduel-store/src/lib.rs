//! PostgreSQL-backed content-addressed store for generated roasts.

pub mod pg_content_store;
pub mod schema;
