use super::error::AuthError;
use super::models::{Account, NewAccount, Role};
use super::password::hash_password_async;
use super::repository::AccountRepository;
use tracing::{info, warn};

/// Build the bootstrap administrator account
pub async fn create_default_admin(email: String, password: String) -> Result<NewAccount, AuthError> {
    let password_hash = hash_password_async(password).await?;
    Ok(NewAccount::new("Administrator".to_string(), email, password_hash).with_role(Role::Admin))
}

/// Make sure an administrator exists for `email`.
///
/// An existing account is left untouched, whatever its role.
pub async fn ensure_default_admin(
    accounts: &dyn AccountRepository,
    email: &str,
    password: &str,
) -> Result<Account, AuthError> {
    if let Some(existing) = accounts.find_by_email(email).await? {
        if existing.role.is_admin() {
            info!("Admin account already exists: {}", email);
        } else {
            warn!("Bootstrap admin email {} belongs to a non-admin account", email);
        }
        return Ok(existing);
    }

    let admin = create_default_admin(email.to_string(), password.to_string()).await?;
    let admin = accounts.create(admin).await?;
    info!("Default admin account created: {}", email);
    Ok(admin)
}
