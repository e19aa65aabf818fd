use thiserror::Error;

use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing role '{0}'")]
    MissingRole(String),
}

/// Role-claim check.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn require_role(granted: &[Role], required: &Role) -> Result<(), AuthzError> {
    if granted.iter().any(|r| r == required) {
        return Ok(());
    }
    tracing::debug!(required = %required, "role check denied");
    Err(AuthzError::MissingRole(required.as_str().to_string()))
}
