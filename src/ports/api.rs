//! Transport-level errors shared by every backend port.

use thiserror::Error;

/// What went wrong talking to the backend.
///
/// The `message` on `Status` is already human-readable: adapters extract it
/// defensively from whatever shape the backend returned (structured message
/// field, raw body, or a generic fallback) before it reaches callers.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never completed (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body could not be parsed into the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// The human-readable message for surfacing to the UI.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(m) | ApiError::Decode(m) => m,
            ApiError::Status { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_extracted_message() {
        let err = ApiError::status(401, "Invalid credentials");
        assert_eq!(format!("{}", err), "Invalid credentials");
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[test]
    fn network_error_displays_with_prefix() {
        let err = ApiError::network("connection refused");
        assert_eq!(format!("{}", err), "Network error: connection refused");
    }
}
