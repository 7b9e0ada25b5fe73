use reqwest::StatusCode;
use thiserror::Error;

/// Why a definition could not be fetched.
///
/// The `Display` text is the fixed message shown in place of the tooltip body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("ERROR: This item is not publicly viewable")]
    NotPubliclyViewable,
    #[error("ERROR: The server is currently experiencing errors. Please try again later.")]
    ServerError,
    #[error("ERROR: The server cannot process your request. Please try again later.")]
    RequestRejected,
    #[error("ERROR: No response was received from the server. Please try again later")]
    NoResponse,
    #[error("ERROR: The server sent a response that could not be read. Please try again later.")]
    InvalidResponse,
}

impl FetchError {
    /// Map a non-success HTTP status onto an error category.
    ///
    /// Returns `None` for 2xx statuses.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        Some(match status.as_u16() {
            401 | 403 => FetchError::NotPubliclyViewable,
            500..=599 => FetchError::ServerError,
            _ => FetchError::RequestRejected,
        })
    }

    /// Map a reqwest failure, from sending or from reading the body.
    ///
    /// Timeouts and connection failures mean nothing usable arrived, even
    /// when the headers did and only the body stalled.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            return FetchError::NoResponse;
        }
        if let Some(status) = err.status() {
            return Self::from_status(status).unwrap_or(FetchError::InvalidResponse);
        }
        if err.is_decode() || err.is_body() {
            FetchError::InvalidResponse
        } else {
            FetchError::NoResponse
        }
    }
}
