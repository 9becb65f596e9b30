use thiserror::Error;

/// Failure taxonomy for calls against the cache service.
///
/// `Transport`, `Status` and `Decode` cover the wire; `Rejected` carries a
/// business-level failure reported inside an otherwise-successful response;
/// `NotFound` is reserved for a missing cache key on the item endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("`{endpoint}` returned status {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("malformed response from `{endpoint}`: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
    #[error("{0}")]
    Rejected(String),
    #[error("cache key not found")]
    NotFound,
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    pub fn status(endpoint: &'static str, status: u16) -> Self {
        Self::Status { endpoint, status }
    }

    pub fn decode(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}
