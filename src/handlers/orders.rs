use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::orders::{
    CreateOrderRequest, OrderQuery, UpdateOrderStatusRequest, UpdatePaymentStatusRequest,
};
use crate::error::AppError;
use crate::middleware::{AuthUser, policy};
use crate::utils::ValidatedJson;

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.orders.create(&claims, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Order created successfully", order)),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<OrderQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = state.orders.list(&claims, query).await?;
    Ok(Json(ApiResponse::list(orders)))
}

pub async fn by_customer(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let orders = state.orders.by_customer(&claims, &customer_id).await?;
    Ok(Json(ApiResponse::list(orders)))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.orders.get(&claims, &id).await?;
    Ok(Json(ApiResponse::data(order)))
}

pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_staff(&claims)?;
    let order = state.orders.update_status(&id, req.status).await?;
    Ok(Json(ApiResponse::with_message("Order status updated", order)))
}

pub async fn update_payment(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePaymentStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_staff(&claims)?;
    let order = state
        .orders
        .update_payment_status(&id, req.payment_status)
        .await?;
    Ok(Json(ApiResponse::with_message("Payment status updated", order)))
}

pub async fn cancel(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.orders.cancel(&claims, &id).await?;
    Ok(Json(ApiResponse::with_message(
        "Order cancelled successfully",
        order,
    )))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;
    state.orders.delete(&id).await?;
    Ok(Json(ApiResponse::message("Order deleted successfully")))
}
