//! Error types for the analysis API client

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Authentication required")]
    Auth,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PaymentRequired(String),

    #[error("Not found")]
    NotFound,

    #[error("Server error (HTTP {0})")]
    Server(u16),

    #[error("Server returned invalid data: {0}")]
    InvalidData(String),

    #[error("Mock response not configured for: {0}")]
    NotConfigured(String),
}

impl ApiError {
    /// The server-provided message, when the failure carries one that is
    /// suitable for showing to the user verbatim.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Validation(msg) | ApiError::PaymentRequired(msg) => Some(msg),
            _ => None,
        }
    }

    /// True for failures of the auth contract (session cleared globally).
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_only_for_user_facing_kinds() {
        assert_eq!(
            ApiError::PaymentRequired("Insufficient funds".to_string()).server_message(),
            Some("Insufficient funds")
        );
        assert_eq!(
            ApiError::Validation("chess_username: too short".to_string()).server_message(),
            Some("chess_username: too short")
        );
        assert_eq!(ApiError::NotFound.server_message(), None);
        assert_eq!(ApiError::Server(500).server_message(), None);
        assert_eq!(ApiError::Auth.server_message(), None);
    }

    #[test]
    fn payment_required_displays_bare_message() {
        let err = ApiError::PaymentRequired("Insufficient funds".to_string());
        assert_eq!(err.to_string(), "Insufficient funds");
    }
}
