//! Shared mapping from HTTP outcomes to `DuelError`.

use reqwest::{Response, StatusCode};
use roastduel_core::error::DuelError;

/// Rate limits and server errors are worth retrying.
pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

/// Maps a transport failure. Only timeouts and connection failures are
/// transient; a request that could not be built or sent otherwise fails the
/// same way on every attempt.
pub(crate) fn map_send_error(operation: &str, err: &reqwest::Error) -> DuelError {
    if err.is_timeout() || err.is_connect() {
        DuelError::Unavailable(format!("{operation}: {err}"))
    } else if err.is_decode() {
        DuelError::MalformedResponse(format!("{operation}: {err}"))
    } else {
        DuelError::Infrastructure(format!("{operation}: {err}"))
    }
}

/// Maps a non-success status, keeping a bounded slice of the body.
pub(crate) fn map_status(operation: &str, status: StatusCode, body: &str) -> DuelError {
    let detail: String = body.chars().take(200).collect();
    let message = format!("{operation}: HTTP {}: {detail}", status.as_u16());
    if is_retryable_status(status) {
        DuelError::Unavailable(message)
    } else {
        DuelError::Infrastructure(message)
    }
}

/// Consumes a non-success response into an error.
pub(crate) async fn error_from_response(operation: &str, response: Response) -> DuelError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    map_status(operation, status, &body)
}
