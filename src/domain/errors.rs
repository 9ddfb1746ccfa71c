use thiserror::Error;

/// Errors reported by the backend API.
///
/// Messages are kept as strings so that failures can be cloned into cache
/// and mutation state and rendered later.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Short message suitable for the status bar.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "could not reach the server".to_string(),
            ApiError::Status { status: 404, .. } => "record not found".to_string(),
            ApiError::Status { status, message } if message.trim().is_empty() => {
                format!("server error ({})", status)
            }
            ApiError::Status { status, message } => format!("{} ({})", message.trim(), status),
            ApiError::Decode(_) => "unexpected response from the server".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
