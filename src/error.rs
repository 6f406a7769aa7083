//! Error types shared by the data-fetching core.
//!
//! [`ApiError::Network`] and [`ApiError::Status`] are the failures a page
//! degrades gracefully from. A successful response with zero rows is never an
//! error; see [`crate::list::ListStatus::Empty`].

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, TLS, timeout...).
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-2xx status.
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    /// The body was not the JSON shape the endpoint promises.
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
    #[error("invalid value for header {name}")]
    InvalidHeader { name: String },
}

impl ApiError {
    /// Transport failures and non-2xx answers.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. } | ApiError::Status { .. })
    }

    /// Short message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network { .. } => "The server could not be reached".to_string(),
            ApiError::Status { status, .. } => {
                format!("The server rejected the request ({status})")
            }
            ApiError::Decode { .. } => "The server sent an unexpected response".to_string(),
            ApiError::InvalidUrl(_) | ApiError::InvalidHeader { .. } => {
                "The request could not be built".to_string()
            }
        }
    }
}

/// Raised when a page is asked to filter on a key it does not offer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter key `{0}`")]
    UnknownKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_network_error() {
        let err = ApiError::Status {
            url: "http://x/a".to_string(),
            status: 500,
            body: String::new(),
        };
        assert!(err.is_network());
        assert_eq!(err.user_message(), "The server rejected the request (500)");
    }

    #[test]
    fn test_decode_is_not_network_error() {
        let err = ApiError::Decode {
            url: "http://x/a".to_string(),
            reason: "missing key".to_string(),
        };
        assert!(!err.is_network());
    }
}
