use crate::api::{ListProfilesResponse, MessageResponse, ProfileRequest, ProfileResponse};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::Validate;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use tollgate::auth::Identity;
use tracing::info;

type IdParam = Result<Path<u64>, PathRejection>;

fn profile_id(param: IdParam) -> Result<u64, ApiError> {
    param
        .map(|Path(id)| id)
        .map_err(|_| ApiError::Validation("User id is required".to_string()))
}

/// POST /api/v1/users
pub async fn create_profile(
    State(state): State<AppState>,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let Json(req) = body?;
    req.validate()?;

    let profile = state.profile_service.create_profile(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse {
            message: "User profile created successfully",
            user: profile,
        }),
    ))
}

/// GET /api/v1/users
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<ListProfilesResponse>, ApiError> {
    let profiles = state.profile_service.list_profiles().await?;

    Ok(Json(ListProfilesResponse {
        message: "Users fetched successfully",
        users: profiles,
    }))
}

/// GET /api/v1/users/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    id: IdParam,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profile_service.get_profile(profile_id(id)?).await?;

    Ok(Json(ProfileResponse {
        message: "User fetched successfully",
        user: profile,
    }))
}

/// PUT /api/v1/users/{id} - full replacement of name, email and role
pub async fn update_profile(
    State(state): State<AppState>,
    id: IdParam,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let id = profile_id(id)?;
    let Json(req) = body?;
    req.validate()?;

    let profile = state.profile_service.update_profile(id, req.into()).await?;

    Ok(Json(ProfileResponse {
        message: "User updated successfully",
        user: profile,
    }))
}

/// DELETE /api/v1/users/{id} - admin only
pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    id: IdParam,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = profile_id(id)?;

    if let Some(admin) = identity.principal() {
        info!("DELETE_PROFILE: id={}, requested_by={}", id, admin.id);
    }

    state.profile_service.delete_profile(id).await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
