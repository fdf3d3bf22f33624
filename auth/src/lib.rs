//! Authentication and authorization core for the RePlay backend
//!
//! Provides:
//! - Password hashing (Argon2id, PHC strings)
//! - Signed access tokens (HMAC JWS) with expiry
//! - Request authorization chain: bearer header → identity → role check
//!
//! The HTTP layer and the user database stay outside this crate. Callers
//! hand in the raw `Authorization` header value and an implementation of
//! [`UserStore`]; they get back an [`Identity`] or an [`AuthError`] whose
//! [`Rejection`] class tells them which status to answer with.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use replay_auth::CredentialHasher;
//!
//! let hasher = CredentialHasher::default();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use replay_auth::{Role, TokenCodec, TokenSettings, UserId};
//!
//! let codec = TokenCodec::from_settings(
//!     &TokenSettings::new("secret_key_at_least_32_bytes_long!").with_expire_minutes(15),
//! )
//! .unwrap();
//! let token = codec.encode_default(UserId(42), Role::User).unwrap();
//! let payload = codec.decode(&token).unwrap();
//! assert_eq!(payload.subject(), UserId(42));
//! ```
//!
//! ## Authorizing a Request
//! ```
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use replay_auth::{
//!     AccessGuard, AuthResolver, Role, StoreError, TokenCodec, TokenSettings, UserId,
//!     UserRecord, UserStore,
//! };
//!
//! struct Users;
//!
//! #[async_trait]
//! impl UserStore for Users {
//!     async fn get_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
//!         Ok(Some(UserRecord {
//!             id,
//!             email: "admin@replay.test".to_string(),
//!             name: "Admin".to_string(),
//!             role: Role::Admin,
//!             password_hash: String::new(),
//!         }))
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let codec = Arc::new(
//!     TokenCodec::from_settings(&TokenSettings::new("secret_key_at_least_32_bytes_long!"))
//!         .unwrap(),
//! );
//! let guard = AccessGuard::new(AuthResolver::new(Arc::clone(&codec), Arc::new(Users)));
//!
//! let header = format!("Bearer {}", codec.encode_default(UserId(1), Role::Admin).unwrap());
//! let admin = guard.require_admin(Some(&header)).await.unwrap();
//! assert!(admin.is_admin());
//! # });
//! ```

pub mod authenticator;
pub mod errors;
pub mod guard;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod resolver;
pub mod settings;
pub mod store;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use errors::AuthError;
pub use errors::Rejection;
pub use errors::UnauthenticatedReason;
pub use guard::require_role;
pub use guard::AccessGuard;
pub use guard::AuthorizationDecision;
pub use identity::Identity;
pub use identity::Role;
pub use identity::UserId;
pub use identity::UserRecord;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenPayload;
pub use password::CredentialHasher;
pub use password::HashingWorker;
pub use password::PasswordError;
pub use resolver::AuthResolver;
pub use settings::PasswordSettings;
pub use settings::TokenSettings;
pub use store::StoreError;
pub use store::UserStore;
