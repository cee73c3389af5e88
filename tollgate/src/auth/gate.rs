use super::error::AuthError;
use super::identity::{Identity, Principal};

/// Pass when the request carries an authenticated identity.
pub fn require_authenticated(identity: &Identity) -> Result<Principal, AuthError> {
    identity.principal().copied().ok_or(AuthError::Unauthorized)
}

/// Pass when the request carries an authenticated administrator.
pub fn require_admin(identity: &Identity) -> Result<Principal, AuthError> {
    let principal = require_authenticated(identity)?;

    if !principal.role.is_admin() {
        return Err(AuthError::Unauthorized);
    }

    Ok(principal)
}
