use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;
use crate::identity::Role;
use crate::identity::UserId;

/// Claims as they travel inside the token.
///
/// `sub` is a string on the wire (RFC 7519 StringOrURI) even though user
/// ids are integers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user id, decimal)
    pub sub: String,

    /// Role of the user at issuance
    pub role: Role,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Create claims for a user expiring `ttl` after `issued_at`.
    ///
    /// # Arguments
    /// * `user_id` - Token subject
    /// * `role` - Role recorded in the token
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, role, exp, and iat set
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry falls outside the representable range
    pub fn for_user(
        user_id: UserId,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::EncodingFailed("expiry out of range".to_string()))?;

        Ok(Self {
            sub: user_id.to_string(),
            role,
            exp: expires_at.timestamp(),
            iat: Some(issued_at.timestamp()),
        })
    }

    /// Check if token is expired.
    ///
    /// A token is expired from the second its `exp` is reached.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}

/// Validated token content.
///
/// Only [`crate::TokenCodec::decode`] produces values of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPayload {
    subject: UserId,
    role: Role,
    expires_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    issued_at: Option<i64>,
}

impl TokenPayload {
    pub(crate) fn from_claims(claims: TokenClaims) -> Result<Self, TokenError> {
        let subject = UserId::from_string(&claims.sub)
            .map_err(|e| TokenError::Invalid(format!("bad subject: {}", e)))?;

        Ok(Self {
            subject,
            role: claims.role,
            expires_at: claims.exp,
            issued_at: claims.iat,
        })
    }

    pub fn subject(&self) -> UserId {
        self.subject
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Expiration time (Unix timestamp)
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Issued at (Unix timestamp), absent in tokens from older issuers
    pub fn issued_at(&self) -> Option<i64> {
        self.issued_at
    }
}
