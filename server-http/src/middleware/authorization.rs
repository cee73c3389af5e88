use crate::error::ApiError;
use axum::{extract::Request, middleware::Next, response::Response};
use tollgate::auth::{gate, Identity};

/// Identity placed in extensions by the session middleware; anonymous if absent.
fn identity_of(request: &Request) -> Identity {
    request
        .extensions()
        .get::<Identity>()
        .copied()
        .unwrap_or_default()
}

/// Reject anonymous callers with 401
pub async fn require_authenticated(request: Request, next: Next) -> Result<Response, ApiError> {
    gate::require_authenticated(&identity_of(&request))?;
    Ok(next.run(request).await)
}

/// Reject anonymous and non-admin callers with 401
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    gate::require_admin(&identity_of(&request))?;
    Ok(next.run(request).await)
}
