use thiserror::Error;

use crate::identity::Role;
use crate::identity::UserId;
use crate::jwt::TokenError;
use crate::store::StoreError;

/// Why a request carried no usable credential.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    MalformedHeader,

    #[error("{0}")]
    Token(#[from] TokenError),
}

/// Outcome class of a failed authorization, as seen by the caller.
///
/// An HTTP layer maps these to 401, 403 and 5xx respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Unauthenticated,
    Forbidden,
    Unavailable,
}

/// Error for the request authorization chain.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required: {0}")]
    Unauthenticated(#[from] UnauthenticatedReason),

    #[error("User not found: {0}")]
    PrincipalNotFound(UserId),

    #[error("Role {required} required, caller has {actual}")]
    Forbidden { required: Role, actual: Role },

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Collapse the error into the class exposed to the caller.
    ///
    /// Token failures of every kind and unknown principals are all
    /// `Unauthenticated`; the detailed cause stays available on `self`.
    pub fn rejection(&self) -> Rejection {
        match self {
            AuthError::Unauthenticated(_) | AuthError::PrincipalNotFound(_) => {
                Rejection::Unauthenticated
            }
            AuthError::Forbidden { .. } => Rejection::Forbidden,
            AuthError::Store(_) => Rejection::Unavailable,
        }
    }

    /// Token error behind an `Unauthenticated` failure, if any.
    pub fn token_error(&self) -> Option<&TokenError> {
        match self {
            AuthError::Unauthenticated(UnauthenticatedReason::Token(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Unauthenticated(UnauthenticatedReason::Token(err))
    }
}
