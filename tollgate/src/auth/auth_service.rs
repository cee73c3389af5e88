use super::error::AuthError;
use super::identity::Principal;
use super::models::{Account, NewAccount};
use super::password::{hash_password_async, verify_password_async};
use super::repository::AccountRepository;
use super::token::{TokenCodec, TokenPair};
use std::sync::Arc;
use tracing::info;

/// Registration and login against the account store.
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    codec: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountRepository>, codec: Arc<TokenCodec>) -> Self {
        Self { accounts, codec }
    }

    /// Create a `USER` account. No tokens are issued; the caller logs in next.
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<Account, AuthError> {
        if self.accounts.email_exists(&email).await? {
            return Err(AuthError::AccountAlreadyExists);
        }

        let password_hash = hash_password_async(password).await?;

        // The store re-checks uniqueness atomically, covering concurrent signups
        let account = self
            .accounts
            .create(NewAccount::new(name, email, password_hash))
            .await?;

        info!(account_id = account.id, "account registered");
        Ok(account)
    }

    /// Check credentials and mint an access/refresh pair.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Account, TokenPair), AuthError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_valid =
            verify_password_async(password.to_string(), account.password_hash.clone()).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.codec.issue_pair(Principal {
            id: account.id,
            role: account.role,
        })?;

        info!(account_id = account.id, "account logged in");
        Ok((account, tokens))
    }
}
