use async_trait::async_trait;
use thiserror::Error;

use crate::identity::UserId;
use crate::identity::UserRecord;

/// Error for user store lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("User store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to persisted users, keyed by the id carried in tokens.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Retrieve user by identifier.
    ///
    /// # Arguments
    /// * `id` - User ID
    ///
    /// # Returns
    /// Optional user record (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage backend failed
    async fn get_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;
}
