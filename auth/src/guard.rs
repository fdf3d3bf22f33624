use crate::errors::AuthError;
use crate::identity::Identity;
use crate::identity::Role;
use crate::resolver::AuthResolver;
use crate::store::UserStore;

/// Final outcome of authorizing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Allow(Identity),
    Deny(AuthError),
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow(_))
    }

    pub fn into_result(self) -> Result<Identity, AuthError> {
        self.into()
    }
}

impl From<Result<Identity, AuthError>> for AuthorizationDecision {
    fn from(result: Result<Identity, AuthError>) -> Self {
        match result {
            Ok(identity) => AuthorizationDecision::Allow(identity),
            Err(e) => AuthorizationDecision::Deny(e),
        }
    }
}

impl From<AuthorizationDecision> for Result<Identity, AuthError> {
    fn from(decision: AuthorizationDecision) -> Self {
        match decision {
            AuthorizationDecision::Allow(identity) => Ok(identity),
            AuthorizationDecision::Deny(e) => Err(e),
        }
    }
}

/// Let an identity through only if it holds the required role.
///
/// # Arguments
/// * `identity` - Identity returned by [`AuthResolver::resolve`]
/// * `required` - Role the operation demands
///
/// # Returns
/// The same identity, unchanged
///
/// # Errors
/// * `Forbidden` - Identity holds another role
pub fn require_role(identity: Identity, required: Role) -> Result<Identity, AuthError> {
    if identity.role() == required {
        Ok(identity)
    } else {
        tracing::warn!(
            user_id = %identity.user_id(),
            role = %identity.role(),
            required = %required,
            "Access denied"
        );
        Err(AuthError::Forbidden {
            required,
            actual: identity.role(),
        })
    }
}

/// Authorization chain: resolve the caller, then check its role.
pub struct AccessGuard<S>
where
    S: UserStore,
{
    resolver: AuthResolver<S>,
}

impl<S> AccessGuard<S>
where
    S: UserStore,
{
    pub fn new(resolver: AuthResolver<S>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &AuthResolver<S> {
        &self.resolver
    }

    /// Allow any authenticated caller.
    pub async fn authenticate(&self, header: Option<&str>) -> AuthorizationDecision {
        self.resolver.resolve(header).await.into()
    }

    /// Allow authenticated callers holding `required`.
    pub async fn authorize(&self, header: Option<&str>, required: Role) -> AuthorizationDecision {
        self.resolver
            .resolve(header)
            .await
            .and_then(|identity| require_role(identity, required))
            .into()
    }

    /// Resolve the caller and require the ADMIN role.
    ///
    /// # Errors
    /// * `Unauthenticated` / `PrincipalNotFound` / `Store` - See [`AuthResolver::resolve`]
    /// * `Forbidden` - Caller is not an administrator
    pub async fn require_admin(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        self.authorize(header, Role::Admin).await.into_result()
    }
}
