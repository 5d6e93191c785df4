use std::error::Error as _;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::resolver::ResolveError;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error: Cannot connect to the server. Please check your internet connection and try again.";
pub const SERVER_UNAVAILABLE_MESSAGE: &str =
    "Server unavailable: Cannot reach the voting system server. Please try again later.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
        payload: Value,
    },
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(#[source] reqwest::Error),
    #[error("{}", SERVER_UNAVAILABLE_MESSAGE)]
    ServerUnavailable(#[source] reqwest::Error),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("unsupported method: {0}")]
    InvalidMethod(String),
    #[error("unexpected response shape: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Wrap a transport failure according to [`classify`].
    pub fn from_transport(err: reqwest::Error) -> Self {
        match classify(&err) {
            TransportFailure::Connection => Self::Network(err),
            TransportFailure::NameResolution => Self::ServerUnavailable(err),
            TransportFailure::Other => Self::Transport(err),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded error body for status failures.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Status { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Connection,
    NameResolution,
    Other,
}

/// Classify a transport error by type. DNS failures are checked first since
/// they are also reported as connect errors.
pub fn classify(err: &reqwest::Error) -> TransportFailure {
    let mut cause = err.source();
    while let Some(current) = cause {
        if current.is::<ResolveError>() {
            return TransportFailure::NameResolution;
        }
        cause = current.source();
    }
    if err.is_connect() {
        TransportFailure::Connection
    } else {
        TransportFailure::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_error_displays_derived_message() {
        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid credentials".into(),
            payload: json!({"detail": "Invalid credentials"}),
        };
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.payload(), Some(&json!({"detail": "Invalid credentials"})));
    }

    #[test]
    fn non_status_errors_carry_no_status() {
        let err = ApiError::InvalidHeader("bad name".into());
        assert_eq!(err.status(), None);
        assert!(err.payload().is_none());
    }
}
