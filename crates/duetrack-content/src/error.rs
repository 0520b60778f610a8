//! Content source error types.

use reqwest::StatusCode;
use thiserror::Error;

use crate::retry::{is_retryable_status, RetryDecision};

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out")]
    Timeout,
}

impl ContentError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Showing saved assignments.".to_string(),
            Self::Api { status, .. } => format!("Content service error ({}).", status),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::InvalidResponse(_) => "Content service sent unexpected data.".to_string(),
            Self::Timeout => "Content service is not responding.".to_string(),
        }
    }

    /// Whether the request is worth repeating.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => StatusCode::from_u16(*status)
                .map(|s| is_retryable_status(s) == RetryDecision::Retry)
                .unwrap_or(false),
            Self::RateLimited(_) | Self::Timeout => true,
            Self::InvalidResponse(_) => false,
        }
    }
}
