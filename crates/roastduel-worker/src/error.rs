//! Worker error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roastduel_core::error::{DuelError, ErrorKind};
use serde::Serialize;
use thiserror::Error;

use crate::scheduler::PassKind;

/// Startup errors for the worker.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// A pipeline adapter failed during startup.
    #[error("startup error: {0}")]
    Startup(#[from] DuelError),

    /// Tracing or exporter setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Errors surfaced by the pass trigger routes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A pass of this kind is already running.
    #[error("{0} pass already in progress")]
    PassInProgress(PassKind),

    /// The pass ran and failed as a whole.
    #[error("{kind} pass failed: {message}")]
    PassFailed {
        /// Which pass failed.
        kind: PassKind,
        /// Kind of the failure.
        error_kind: ErrorKind,
        /// Human-readable failure.
        message: String,
    },

    /// The pass task panicked before producing a record.
    #[error("{kind} pass aborted: {message}")]
    PassAborted {
        /// Which pass aborted.
        kind: PassKind,
        /// Join failure.
        message: String,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            Self::PassInProgress(_) => (StatusCode::CONFLICT, "pass_in_progress"),
            Self::PassAborted { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "pass_aborted"),
            Self::PassFailed { error_kind, .. } => match error_kind {
                ErrorKind::Validation => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
                ErrorKind::Transient => (StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable"),
                ErrorKind::Permanent => (StatusCode::BAD_GATEWAY, "upstream_error"),
                ErrorKind::Invariant => (StatusCode::INTERNAL_SERVER_ERROR, "invariant_violation"),
            },
        };

        let body = ErrorBody {
            error: error_code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
