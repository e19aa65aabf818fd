//! Account service port.

use crate::DomainResult;

/// User account lifecycle operations consumed by the API layer.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Reactivate a previously closed account.
    ///
    /// Fails with `InvalidCredentials` when the pair does not match an account,
    /// and with `Conflict` when the account is not closed.
    async fn reopen_account(&self, username: &str, password: &str) -> DomainResult<()>;
}
