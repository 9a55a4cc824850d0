//! Error types for the dispatcher and the endpoint clients.
//!
//! # Design
//! Three failure families come out of a round-trip: the transport could not
//! complete it (`Transport`), the body was not JSON (`Decode`), or the
//! service answered outside 200-299 (`Request`). The low-level cause of the
//! first two is kept as the error `source` for diagnosis. The remaining
//! variants reject a call before it reaches the network.

use thiserror::Error;

use crate::http::HttpMethod;
use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP round-trip did not complete (DNS, refused connection, TLS, I/O).
    #[error("request failed: {method} {url}")]
    Transport {
        method: HttpMethod,
        url: String,
        #[source]
        source: TransportError,
    },

    /// The response body could not be parsed as JSON.
    #[error("bad JSON in response (status {status})")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The service answered with a status outside 200-299.
    #[error("{status}: {reason}")]
    Request {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("request path must not be empty")]
    InvalidPath,

    #[error("invalid query parameters: {0}")]
    InvalidParams(String),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A merge call could not find the `key` field on the looked-up resource.
    #[error("{resource} {id} has no merge key")]
    MissingKey { resource: &'static str, id: u64 },
}

impl ApiError {
    /// HTTP status attached to the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } | ApiError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_displays_status_and_reason() {
        let err = ApiError::Request {
            status: 404,
            reason: "Not Found".to_string(),
            message: "Not Found - The resource requested could not be found".to_string(),
        };
        assert_eq!(err.to_string(), "404: Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn decode_error_keeps_parse_cause() {
        use std::error::Error as _;

        let cause = serde_json::from_str::<serde_json::Value>("not json{").unwrap_err();
        let err = ApiError::Decode { status: 200, source: cause };
        let source = err.source().expect("decode error has a source");
        assert!(source.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn pre_flight_errors_have_no_status() {
        assert_eq!(ApiError::InvalidPath.status(), None);
    }
}
