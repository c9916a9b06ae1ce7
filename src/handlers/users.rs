use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::users::{ChangeRoleRequest, CreateUserRequest, UpdateUserRequest, UserQuery};
use crate::error::AppError;
use crate::middleware::{AuthUser, policy};
use crate::utils::ValidatedJson;

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;
    let user = state.accounts.create_user(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("User created successfully", user)),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;
    let users = state.accounts.list_users(query).await?;
    Ok(Json(ApiResponse::list(users)))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_self_or_admin(&claims, &id)?;
    let user = state.accounts.get(&id).await?;
    Ok(Json(ApiResponse::data(user.sanitized())))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.accounts.update_user(&claims, &id, req).await?;
    Ok(Json(ApiResponse::with_message("User updated successfully", user)))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;
    state.accounts.delete_user(&id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

pub async fn deactivate(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;
    let user = state.accounts.set_active(&id, false).await?;
    Ok(Json(ApiResponse::with_message("User deactivated", user)))
}

pub async fn activate(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;
    let user = state.accounts.set_active(&id, true).await?;
    Ok(Json(ApiResponse::with_message("User activated", user)))
}

pub async fn change_role(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;
    let user = state.accounts.change_role(&id, req.role).await?;
    Ok(Json(ApiResponse::with_message("User role updated", user)))
}
