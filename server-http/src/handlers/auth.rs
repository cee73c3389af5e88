use crate::api::{LoginRequest, MessageResponse, SignupRequest};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::Validate;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;

/// POST /api/v1/auth/signup
///
/// Creates a `USER` account. No cookies are set; the client logs in next.
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(req) = body?;
    req.validate()?;

    state
        .auth_service
        .register(req.name, req.email, req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

/// POST /api/v1/auth/login
///
/// Sets the `accessToken` and `refreshToken` cookies on success.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let Json(req) = body?;
    req.validate()?;

    let (_, tokens) = state.auth_service.login(&req.email, &req.password).await?;

    let jar = CookieJar::new()
        .add(state.cookie_policy.access_cookie(tokens.access_token))
        .add(state.cookie_policy.refresh_cookie(tokens.refresh_token));

    Ok((jar, Json(MessageResponse::new("User logged in successfully"))))
}
