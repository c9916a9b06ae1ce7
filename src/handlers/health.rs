use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::AppState;
use crate::error::AppError;

pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.db.health_check().await?;

    Ok(Json(json!({
        "success": true,
        "message": "Server is running",
        "service": state.config.service_name,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
