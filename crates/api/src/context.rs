use meridian_auth::Role;
use meridian_core::UserId;

/// Principal context for a request (authenticated identity + role claims).
///
/// Inserted by the auth middleware; absent on anonymous routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
    roles: Vec<Role>,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    /// Acting user id passed to services for audit stamps.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}
