use std::sync::Arc;

use super::argon2::CredentialHasher;
use super::errors::PasswordError;

/// Runs password hashing on tokio's blocking thread pool.
///
/// Argon2 is deliberately slow; calling it inline from an async handler
/// would stall every task scheduled on the same worker thread.
#[derive(Clone)]
pub struct HashingWorker {
    hasher: Arc<CredentialHasher>,
}

impl HashingWorker {
    pub fn new(hasher: Arc<CredentialHasher>) -> Self {
        Self { hasher }
    }

    /// Underlying synchronous hasher.
    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    /// Hash a password off the async scheduler.
    ///
    /// # Errors
    /// * `HashingUnavailable` - Backend failed or the blocking task was lost
    pub async fn hash(&self, password: String) -> Result<String, PasswordError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing task failed");
                PasswordError::HashingUnavailable(format!("hashing task failed: {}", e))
            })?
    }

    /// Verify a password off the async scheduler.
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash cannot be parsed
    /// * `HashingUnavailable` - The blocking task was lost
    pub async fn verify(&self, password: String, hash: String) -> Result<bool, PasswordError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password verification task failed");
                PasswordError::HashingUnavailable(format!("verification task failed: {}", e))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PasswordSettings;

    fn worker() -> HashingWorker {
        let hasher = CredentialHasher::new(&PasswordSettings {
            memory_cost_kib: Some(4096),
            time_cost: Some(1),
            parallelism: Some(1),
        })
        .unwrap();
        HashingWorker::new(Arc::new(hasher))
    }

    #[tokio::test]
    async fn test_hash_and_verify_off_thread() {
        let worker = worker();

        let hash = worker.hash("opening_night".to_string()).await.unwrap();

        assert!(worker
            .verify("opening_night".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!worker
            .verify("closing_night".to_string(), hash)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_verify_malformed_hash_off_thread() {
        let result = worker()
            .verify("password".to_string(), "not-a-phc-string".to_string())
            .await;

        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }
}
