use std::str::FromStr;

use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::claims::TokenPayload;
use super::errors::TokenError;
use crate::identity::Role;
use crate::identity::UserId;
use crate::settings::TokenSettings;

const RECOMMENDED_SECRET_LENGTH: usize = 32;

/// Signed, time-limited identity token encoder and decoder.
///
/// Tokens are JWS compact serializations (`header.payload.signature`)
/// signed with an HMAC algorithm over a process-wide secret. The secret,
/// algorithm and default lifetime are fixed at construction.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl TokenCodec {
    /// Create a new codec.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `algorithm` - HS256, HS384 or HS512
    /// * `default_ttl` - Lifetime used by [`TokenCodec::encode_default`]
    ///
    /// # Returns
    /// Configured TokenCodec
    ///
    /// # Errors
    /// * `Misconfigured` - Empty secret, non-HMAC algorithm, or non-positive default lifetime
    pub fn new(
        secret: &[u8],
        algorithm: Algorithm,
        default_ttl: Duration,
    ) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Misconfigured(
                "signing secret is empty".to_string(),
            ));
        }

        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::Misconfigured(format!(
                "algorithm {:?} is not an HMAC algorithm",
                algorithm
            )));
        }

        if default_ttl <= Duration::zero() {
            return Err(TokenError::Misconfigured(format!(
                "default token lifetime must be positive, got {}s",
                default_ttl.num_seconds()
            )));
        }

        if secret.len() < RECOMMENDED_SECRET_LENGTH {
            tracing::warn!(
                secret_length = secret.len(),
                recommended = RECOMMENDED_SECRET_LENGTH,
                "Token signing secret is shorter than recommended"
            );
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            default_ttl,
        })
    }

    /// Create a codec from loaded settings.
    ///
    /// # Errors
    /// * `Misconfigured` - Unknown algorithm name, out of range lifetime, or any error of [`TokenCodec::new`]
    pub fn from_settings(settings: &TokenSettings) -> Result<Self, TokenError> {
        let algorithm = Algorithm::from_str(&settings.algorithm).map_err(|_| {
            TokenError::Misconfigured(format!("unknown algorithm: {}", settings.algorithm))
        })?;

        let default_ttl = Duration::try_minutes(settings.access_token_expire_minutes)
            .ok_or_else(|| {
                TokenError::Misconfigured(format!(
                    "token lifetime out of range: {} minutes",
                    settings.access_token_expire_minutes
                ))
            })?;

        Self::new(settings.secret_key.as_bytes(), algorithm, default_ttl)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Token subject
    /// * `role` - Role recorded in the token
    /// * `ttl` - Lifetime; the token expires at `now + ttl`
    ///
    /// # Returns
    /// Compact JWS token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry out of range or signing failed
    pub fn encode(
        &self,
        user_id: UserId,
        role: Role,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        if ttl <= Duration::zero() {
            tracing::warn!(
                user_id = %user_id,
                ttl_seconds = ttl.num_seconds(),
                "Issuing a token that is already expired"
            );
        }

        let claims = TokenClaims::for_user(user_id, role, Utc::now(), ttl)?;
        let header = Header::new(self.algorithm);

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        tracing::debug!(user_id = %user_id, role = %role, exp = claims.exp, "Token issued");

        Ok(token)
    }

    /// Issue a token with the configured default lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn encode_default(&self, user_id: UserId, role: Role) -> Result<String, TokenError> {
        self.encode(user_id, role, self.default_ttl)
    }

    /// Verify and decode a token.
    ///
    /// The signature is checked first; expiry is only evaluated for
    /// authentic tokens.
    ///
    /// # Arguments
    /// * `token` - Compact JWS token string
    ///
    /// # Returns
    /// Validated payload
    ///
    /// # Errors
    /// * `Invalid` - Malformed token, wrong algorithm, bad signature, missing or unparseable claims
    /// * `Expired` - Authentic token whose `exp` is not after the current time
    pub fn decode(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // jsonwebtoken accepts exp == now and applies leeway; expiry is checked below instead
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid(e.to_string()),
                }
            })?;

        if token_data.claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        TokenPayload::from_claims(token_data.claims)
    }
}
