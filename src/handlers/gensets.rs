use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::FindOptions,
};

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::gensets::{GensetPayload, GensetQuery};
use crate::error::AppError;
use crate::middleware::{AuthUser, policy};
use crate::models::Genset;
use crate::utils::ValidatedJson;

/// Public storefront listing: active items only, filterable by brand,
/// fuel type, capacity range, condition, and phase.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<GensetQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut filter = doc! { "is_active": true };
    if let Some(brand) = query.brand {
        filter.insert("brand", bson::to_bson(&brand)?);
    }
    if let Some(fuel_type) = query.fuel_type {
        filter.insert("fuel_type", bson::to_bson(&fuel_type)?);
    }
    if let Some(condition) = query.condition {
        filter.insert("condition", bson::to_bson(&condition)?);
    }
    if let Some(phase) = query.phase {
        filter.insert("phase", bson::to_bson(&phase)?);
    }
    if query.min_capacity.is_some() || query.max_capacity.is_some() {
        let mut range = doc! {};
        if let Some(min) = query.min_capacity {
            range.insert("$gte", min);
        }
        if let Some(max) = query.max_capacity {
            range.insert("$lte", max);
        }
        filter.insert("capacity", range);
    }

    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();
    let gensets: Vec<Genset> = state
        .db
        .gensets()
        .find(filter, options)
        .await?
        .try_collect()
        .await?;

    Ok(Json(ApiResponse::list(gensets)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let genset = genset_by_id(&state, &id).await?;
    Ok(Json(ApiResponse::data(genset)))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(payload): ValidatedJson<GensetPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;

    let mut genset = Genset::new(
        payload.model,
        payload.brand,
        payload.capacity,
        payload.fuel_type,
        payload.phase,
        payload.price,
        payload.condition,
        payload.stock,
        payload.warranty_months,
    );
    genset.specifications = payload.specifications;
    genset.images = payload.images;

    state.db.gensets().insert_one(&genset, None).await?;
    tracing::info!(genset_id = %genset.id, model = %genset.model, "Genset created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Genset created successfully", genset)),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<GensetPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;

    let mut genset = genset_by_id(&state, &id).await?;
    genset.model = payload.model;
    genset.brand = payload.brand;
    genset.capacity = payload.capacity;
    genset.fuel_type = payload.fuel_type;
    genset.phase = payload.phase;
    genset.price = payload.price;
    genset.condition = payload.condition;
    genset.specifications = payload.specifications;
    genset.stock = payload.stock;
    genset.images = payload.images;
    genset.warranty_months = payload.warranty_months;
    genset.updated_at = chrono::Utc::now();

    state
        .db
        .gensets()
        .replace_one(doc! { "_id": &genset.id }, &genset, None)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Genset updated successfully",
        genset,
    )))
}

/// Soft delete: the record stays for existing order lines, the storefront
/// stops listing it.
pub async fn deactivate(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;

    let mut genset = genset_by_id(&state, &id).await?;
    genset.is_active = false;
    genset.updated_at = chrono::Utc::now();

    state
        .db
        .gensets()
        .update_one(
            doc! { "_id": &genset.id },
            doc! { "$set": {
                "is_active": false,
                "updated_at": bson::DateTime::from_chrono(genset.updated_at),
            } },
            None,
        )
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Genset deactivated successfully",
        genset,
    )))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    policy::require_admin(&claims)?;

    let result = state
        .db
        .gensets()
        .delete_one(doc! { "_id": &id }, None)
        .await?;
    if result.deleted_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Genset not found")));
    }

    Ok(Json(ApiResponse::message("Genset deleted successfully")))
}

async fn genset_by_id(state: &AppState, id: &str) -> Result<Genset, AppError> {
    state
        .db
        .gensets()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Genset not found")))
}
