use std::sync::Arc;

use crate::errors::AuthError;
use crate::errors::UnauthenticatedReason;
use crate::identity::Identity;
use crate::jwt::TokenCodec;
use crate::store::UserStore;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Resolves the caller of a request from its Authorization header.
///
/// The role in the returned identity is read from the user store on every
/// call, never from the token, so a role change applies to tokens already
/// in circulation.
pub struct AuthResolver<S>
where
    S: UserStore,
{
    codec: Arc<TokenCodec>,
    store: Arc<S>,
}

impl<S> Clone for AuthResolver<S>
where
    S: UserStore,
{
    fn clone(&self) -> Self {
        Self {
            codec: Arc::clone(&self.codec),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> AuthResolver<S>
where
    S: UserStore,
{
    /// Create a new resolver.
    ///
    /// # Arguments
    /// * `codec` - Token codec holding the signing configuration
    /// * `store` - Authoritative user lookup
    pub fn new(codec: Arc<TokenCodec>, store: Arc<S>) -> Self {
        Self { codec, store }
    }

    /// Resolve the identity behind an Authorization header value.
    ///
    /// # Arguments
    /// * `header` - Raw header value, `None` when the request carried none
    ///
    /// # Returns
    /// Identity with the user's current role
    ///
    /// # Errors
    /// * `Unauthenticated` - Header missing or malformed, token invalid or expired
    /// * `PrincipalNotFound` - Token subject no longer exists
    /// * `Store` - User lookup failed
    pub async fn resolve(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let token = extract_bearer_token(header).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected Authorization header");
        })?;

        let payload = self.codec.decode(token).map_err(|e| {
            tracing::warn!(error = %e, "Token validation failed");
            AuthError::from(e)
        })?;

        let user_id = payload.subject();
        let record = self.store.get_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Token subject not found");
            AuthError::PrincipalNotFound(user_id)
        })?;

        if record.role != payload.role() {
            tracing::debug!(
                user_id = %user_id,
                token_role = %payload.role(),
                current_role = %record.role,
                "Role changed since token issuance"
            );
        }

        tracing::debug!(user_id = %user_id, role = %record.role, "Caller resolved");

        Ok(Identity::from_record(&record))
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// # Errors
/// * `Unauthenticated(MissingCredentials)` - No header
/// * `Unauthenticated(MalformedHeader)` - Wrong scheme or empty token
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(UnauthenticatedReason::MissingCredentials)?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or(UnauthenticatedReason::MalformedHeader)?;

    if token.is_empty() {
        return Err(UnauthenticatedReason::MalformedHeader.into());
    }

    Ok(token)
}
