use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::reports::{LowStockQuery, ReportQuery};
use crate::error::AppError;
use crate::services::reports::parse_date;

pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.reports.dashboard().await?;
    Ok(Json(ApiResponse::data(stats)))
}

pub async fn low_stock(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> Result<impl IntoResponse, AppError> {
    let gensets = state.reports.low_stock(query.threshold.unwrap_or(5)).await?;
    Ok(Json(ApiResponse::list(gensets)))
}

pub async fn sales_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (start, end) = parse_range(&query)?;
    let report = state.reports.sales_report(start, end).await?;
    Ok(Json(ApiResponse::data(report)))
}

pub async fn service_metrics(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (start, end) = parse_range(&query)?;
    let metrics = state.reports.service_metrics(start, end).await?;
    Ok(Json(ApiResponse::data(metrics)))
}

fn parse_range(
    query: &ReportQuery,
) -> Result<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>), AppError> {
    match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(start), Some(end)) => Ok((parse_date(start)?, parse_date(end)?)),
        _ => Err(AppError::BadRequest(anyhow::anyhow!(
            "Start date and end date are required"
        ))),
    }
}
