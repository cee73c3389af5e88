use super::error::AuthError;
use super::models::{Account, NewAccount};
use async_trait::async_trait;

/// Credential store for accounts. Email uniqueness is enforced by the
/// implementation, atomically with respect to concurrent creates.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create a new account, assigning its id
    async fn create(&self, account: NewAccount) -> Result<Account, AuthError>;

    /// Find an account by email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;

    /// Find an account by ID
    async fn find_by_id(&self, id: u64) -> Result<Option<Account>, AuthError>;

    /// Replace an existing account record
    async fn update(&self, account: Account) -> Result<Account, AuthError>;

    /// Delete an account by ID
    async fn delete(&self, id: u64) -> Result<(), AuthError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, AuthError>;
}
