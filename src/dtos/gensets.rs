use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::{Brand, Condition, FuelType, Phase, Specifications};

fn positive(value: f64) -> Result<(), ValidationError> {
    if value > 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive");
        err.message = Some("Capacity must be a positive number".into());
        Err(err)
    }
}

/// Create/update payload for a catalog item. Enum fields reject unknown
/// values at deserialization; numeric ranges are validated here.
#[derive(Debug, Deserialize, Validate)]
pub struct GensetPayload {
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,

    pub brand: Brand,

    #[validate(custom(function = "positive"))]
    pub capacity: f64,

    pub fuel_type: FuelType,
    pub phase: Phase,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    #[serde(default = "default_condition")]
    pub condition: Condition,

    pub specifications: Option<Specifications>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[serde(default)]
    pub stock: i64,

    #[serde(default)]
    pub images: Vec<String>,

    #[validate(range(min = 0, message = "Warranty months cannot be negative"))]
    #[serde(default = "default_warranty_months")]
    pub warranty_months: i64,
}

fn default_condition() -> Condition {
    Condition::New
}

fn default_warranty_months() -> i64 {
    12
}

#[derive(Debug, Deserialize)]
pub struct GensetQuery {
    pub brand: Option<Brand>,
    pub fuel_type: Option<FuelType>,
    pub min_capacity: Option<f64>,
    pub max_capacity: Option<f64>,
    pub condition: Option<Condition>,
    pub phase: Option<Phase>,
}
