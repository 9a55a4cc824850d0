//! Status-code classification.
//!
//! Pure functions: the same code always yields the same kind and text.

/// Why a response fell outside 200-299.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    UnsupportedMediaType,
    TooManyRequests,
    ServerError,
    ClientError,
    /// Informational, redirect and any other code with no rule.
    Other,
}

impl FailureKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => FailureKind::Unauthorized,
            403 => FailureKind::Forbidden,
            404 => FailureKind::NotFound,
            405 => FailureKind::MethodNotAllowed,
            415 => FailureKind::UnsupportedMediaType,
            429 => FailureKind::TooManyRequests,
            500.. => FailureKind::ServerError,
            400.. => FailureKind::ClientError,
            _ => FailureKind::Other,
        }
    }
}

pub fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Human-readable classification for a failed response.
pub fn describe(status: u16, reason: &str) -> String {
    let text = match FailureKind::from_status(status) {
        FailureKind::Unauthorized => "Unauthorized - Valid OAuth2 credentials were not supplied",
        FailureKind::Forbidden => "Forbidden - The current user does not have access to this method",
        FailureKind::NotFound => "Not Found - The resource requested could not be found",
        FailureKind::MethodNotAllowed => "Method Not Allowed - The requested method does not exist",
        FailureKind::UnsupportedMediaType => {
            "Unsupported Media Type - A valid media type (JSON, XML, HTTP URL encoded) was not used"
        }
        FailureKind::TooManyRequests => {
            "Too Many Requests - The current user has hit the daily rate limit"
        }
        FailureKind::ServerError => {
            "5xx Internal Server Error - An error occurred while processing the request"
        }
        FailureKind::ClientError => {
            return format!("{status} Client Error - The request could not be processed");
        }
        FailureKind::Other => return format!("HTTP {status}: {reason}"),
    };
    text.to_string()
}
