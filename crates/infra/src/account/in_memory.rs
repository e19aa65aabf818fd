use std::collections::HashMap;
use std::sync::RwLock;

use sha2::{Digest, Sha256};

use meridian_core::{AccountService, DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Closed,
}

#[derive(Debug, Clone)]
struct AccountRecord {
    password_digest: [u8; 32],
    status: AccountStatus,
}

fn digest(username: &str, password: &str) -> [u8; 32] {
    // Username acts as the salt so equal passwords differ per account.
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// In-memory account store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountService {
    accounts: RwLock<HashMap<String, AccountRecord>>,
}

impl InMemoryAccountService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an account. Usernames are case-insensitive.
    pub fn insert(&self, username: &str, password: &str, status: AccountStatus) {
        let key = username.to_lowercase();
        let record = AccountRecord {
            password_digest: digest(&key, password),
            status,
        };
        if let Ok(mut accounts) = self.accounts.write() {
            accounts.insert(key, record);
        }
    }
}

#[async_trait::async_trait]
impl AccountService for InMemoryAccountService {
    async fn reopen_account(&self, username: &str, password: &str) -> DomainResult<()> {
        let key = username.to_lowercase();
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| DomainError::unavailable("account store lock poisoned"))?;

        let account = accounts
            .get_mut(&key)
            .filter(|a| a.password_digest == digest(&key, password))
            .ok_or(DomainError::InvalidCredentials)?;

        if account.status != AccountStatus::Closed {
            return Err(DomainError::conflict("account is not closed"));
        }

        account.status = AccountStatus::Active;
        tracing::info!(username = %key, "account reopened");
        Ok(())
    }
}
