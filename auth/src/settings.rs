use std::fmt;

use serde::Deserialize;

pub const DEFAULT_ALGORITHM: &str = "HS256";
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60;

/// Token signing configuration.
///
/// Loaded once at startup and handed to [`crate::TokenCodec::from_settings`].
#[derive(Clone, Deserialize)]
pub struct TokenSettings {
    /// Symmetric signing secret
    pub secret_key: String,

    /// JWS algorithm name (HS256, HS384 or HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Lifetime of issued access tokens when the caller does not pick one
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
}

impl TokenSettings {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            algorithm: default_algorithm(),
            access_token_expire_minutes: default_access_token_expire_minutes(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    pub fn with_expire_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expire_minutes = minutes;
        self
    }
}

// Keeps the secret out of logs.
impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .finish()
    }
}

/// Argon2id cost parameters.
///
/// Unset fields fall back to the argon2 crate defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PasswordSettings {
    /// Memory cost in KiB
    #[serde(default)]
    pub memory_cost_kib: Option<u32>,

    /// Number of passes
    #[serde(default)]
    pub time_cost: Option<u32>,

    /// Degree of parallelism
    #[serde(default)]
    pub parallelism: Option<u32>,
}

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES
}
