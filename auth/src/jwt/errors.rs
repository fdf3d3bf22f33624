use thiserror::Error;

/// Error type for token operations.
///
/// `Expired` is only reported for tokens whose signature verified; anything
/// that cannot be authenticated is `Invalid`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),

    #[error("Token codec misconfigured: {0}")]
    Misconfigured(String),
}
