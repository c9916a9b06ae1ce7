use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::auth::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::utils::ValidatedJson;

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state.accounts.register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Registration successful", res)),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state.accounts.login(req).await?;
    Ok(Json(ApiResponse::with_message("Login successful", res)))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let account = state.accounts.get(&claims.sub).await?;
    Ok(Json(ApiResponse::data(account.sanitized())))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.accounts.update_profile(&claims.sub, req).await?;
    Ok(Json(ApiResponse::with_message(
        "Profile updated successfully",
        user,
    )))
}

pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.accounts.change_password(&claims.sub, req).await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}
