use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Brand {
    Cummins,
    Caterpillar,
    Kohler,
    Perkins,
    Honda,
    Generac,
    Kirloskar,
    #[serde(rename = "Ashok Leyland")]
    AshokLeyland,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FuelType {
    Diesel,
    #[serde(rename = "Natural Gas")]
    NaturalGas,
    Propane,
    Gasoline,
    Petrol,
    Gas,
    #[serde(rename = "CNG")]
    Cng,
    #[serde(rename = "LPG")]
    Lpg,
    #[serde(rename = "Bi-Fuel")]
    BiFuel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    #[serde(rename = "Single Phase")]
    Single,
    #[serde(rename = "Three Phase")]
    Three,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Condition {
    New,
    Used,
    Refurbished,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Specifications {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    /// 50Hz or 60Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// Catalog record for one generator-set product.
///
/// Stock is only mutated through the order lifecycle (reserved on Confirm,
/// restored on Cancel of a Confirmed order) or by admin edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genset {
    #[serde(rename = "_id")]
    pub id: String,
    pub model: String,
    pub brand: Brand,
    pub capacity: f64,
    pub fuel_type: FuelType,
    pub phase: Phase,
    pub price: f64,
    pub condition: Condition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Specifications>,
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    pub warranty_months: i64,
    pub is_active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Genset {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model: String,
        brand: Brand,
        capacity: f64,
        fuel_type: FuelType,
        phase: Phase,
        price: f64,
        condition: Condition,
        stock: i64,
        warranty_months: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            model,
            brand,
            capacity,
            fuel_type,
            phase,
            price,
            condition,
            specifications: None,
            stock,
            images: Vec::new(),
            warranty_months,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
