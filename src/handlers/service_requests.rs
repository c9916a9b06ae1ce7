use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::service_requests::{
    AssignTicketRequest, CompleteTicketRequest, CreateTicketRequest, FeedbackRequest, TicketQuery,
    UpdateTicketStatusRequest,
};
use crate::error::AppError;
use crate::middleware::{AuthUser, policy};
use crate::utils::ValidatedJson;

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = state.tickets.create(&claims, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Service request created", ticket)),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<TicketQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tickets = state.tickets.list(&claims, query).await?;
    Ok(Json(ApiResponse::list(tickets)))
}

pub async fn by_customer(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tickets = state.tickets.by_customer(&claims, &customer_id).await?;
    Ok(Json(ApiResponse::list(tickets)))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = state.tickets.get(&claims, &id).await?;
    Ok(Json(ApiResponse::data(ticket)))
}

pub async fn assign(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AssignTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_staff(&claims)?;
    let ticket = state.tickets.assign(&id, req).await?;
    Ok(Json(ApiResponse::with_message(
        "Technician assigned successfully",
        ticket,
    )))
}

pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTicketStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_staff(&claims)?;
    let ticket = state.tickets.update_status(&id, req.status).await?;
    Ok(Json(ApiResponse::with_message(
        "Status updated successfully",
        ticket,
    )))
}

pub async fn complete(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<CompleteTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_staff(&claims)?;
    let ticket = state.tickets.complete(&id, req).await?;
    Ok(Json(ApiResponse::with_message(
        "Service completed successfully",
        ticket,
    )))
}

pub async fn feedback(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<FeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = state.tickets.feedback(&claims, &id, req).await?;
    Ok(Json(ApiResponse::with_message(
        "Feedback added successfully",
        ticket,
    )))
}
