use thiserror::Error;

/// Error type for password operations.
///
/// A password that does not match is not an error: `verify` returns `Ok(false)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    /// Hashing backend or random source cannot be used. Fatal at startup.
    #[error("Password hashing unavailable: {0}")]
    HashingUnavailable(String),

    /// Stored hash is not a supported PHC string.
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}
