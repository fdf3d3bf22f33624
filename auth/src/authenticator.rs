use std::sync::Arc;

use serde::Serialize;

use crate::identity::UserRecord;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::HashingWorker;
use crate::password::PasswordError;

/// Login coordinator combining password verification and token issuance.
///
/// Hashing runs on the blocking pool through [`HashingWorker`].
pub struct Authenticator {
    hashing_worker: HashingWorker,
    token_codec: Arc<TokenCodec>,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,

    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `hashing_worker` - Password hashing on the blocking pool
    /// * `token_codec` - Codec used to issue access tokens
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(hashing_worker: HashingWorker, token_codec: Arc<TokenCodec>) -> Self {
        Self {
            hashing_worker,
            token_codec,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Hashed password string
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub async fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.hashing_worker.hash(password.to_string()).await
    }

    /// Verify a login password and issue an access token for the user.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `user` - Stored user record, looked up by the caller
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `TokenError` - Token generation failed
    pub async fn authenticate(
        &self,
        password: &str,
        user: &UserRecord,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        // Verify password
        let is_valid = self
            .hashing_worker
            .verify(password.to_string(), user.password_hash.clone())
            .await?;

        if !is_valid {
            tracing::warn!(user_id = %user.id, "Login rejected: invalid credentials");
            return Err(AuthenticationError::InvalidCredentials);
        }

        match self.hashing_worker.hasher().needs_rehash(&user.password_hash) {
            Ok(true) => tracing::info!(
                user_id = %user.id,
                "Stored password hash uses outdated parameters"
            ),
            Ok(false) => {}
            Err(e) => tracing::warn!(
                user_id = %user.id,
                error = %e,
                "Could not inspect stored password hash"
            ),
        }

        // Generate token
        let access_token = self.token_codec.encode_default(user.id, user.role)?;

        Ok(AuthenticationResult {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.token_codec.default_ttl().num_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    use super::*;
    use crate::identity::Role;
    use crate::identity::UserId;
    use crate::password::CredentialHasher;
    use crate::settings::PasswordSettings;

    fn authenticator() -> (Authenticator, Arc<TokenCodec>) {
        let hasher = CredentialHasher::new(&PasswordSettings {
            memory_cost_kib: Some(4096),
            time_cost: Some(1),
            parallelism: Some(1),
        })
        .unwrap();
        let codec = Arc::new(
            TokenCodec::new(
                b"test_secret_key_at_least_32_bytes!",
                Algorithm::HS256,
                Duration::minutes(30),
            )
            .unwrap(),
        );

        (
            Authenticator::new(HashingWorker::new(Arc::new(hasher)), Arc::clone(&codec)),
            codec,
        )
    }

    fn user(password_hash: String) -> UserRecord {
        UserRecord {
            id: UserId(42),
            email: "stagehand@replay.test".to_string(),
            name: "Stagehand".to_string(),
            role: Role::User,
            password_hash,
        }
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let (authenticator, codec) = authenticator();

        // Hash a password
        let hash = authenticator
            .hash_password("my_password")
            .await
            .expect("Failed to hash password");

        // Authenticate with correct password
        let result = authenticator
            .authenticate("my_password", &user(hash))
            .await
            .expect("Authentication failed");

        assert_eq!(result.token_type, "bearer");
        assert_eq!(result.expires_in, 30 * 60);

        // Validate the token
        let payload = codec
            .decode(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(payload.subject(), UserId(42));
        assert_eq!(payload.role(), Role::User);
    }

    #[tokio::test]
    async fn test_authenticate_invalid_password() {
        let (authenticator, _) = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .await
            .expect("Failed to hash password");

        // Try with wrong password
        let result = authenticator
            .authenticate("wrong_password", &user(hash))
            .await;
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_corrupt_stored_hash() {
        let (authenticator, _) = authenticator();

        let result = authenticator
            .authenticate("my_password", &user("plaintext-password".to_string()))
            .await;
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(
                PasswordError::MalformedHash(_)
            ))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_with_outdated_hash_still_issues_token() {
        let (authenticator, codec) = authenticator();
        let old_hash = CredentialHasher::new(&PasswordSettings {
            memory_cost_kib: Some(8192),
            time_cost: Some(1),
            parallelism: Some(1),
        })
        .unwrap()
        .hash("my_password")
        .unwrap();

        let result = authenticator
            .authenticate("my_password", &user(old_hash))
            .await
            .expect("Authentication failed");

        let payload = codec.decode(&result.access_token).unwrap();
        assert_eq!(payload.subject(), UserId(42));
    }
}
