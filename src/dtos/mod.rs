pub mod auth;
pub mod gensets;
pub mod orders;
pub mod reports;
pub mod service_requests;
pub mod users;

use serde::Serialize;

/// Account summary embedded in order/ticket views in place of the bare
/// reference id.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl From<&crate::models::Customer> for CustomerSummary {
    fn from(c: &crate::models::Customer) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            company: c.company.clone(),
        }
    }
}

/// Catalog summary embedded in order/ticket views.
#[derive(Debug, Clone, Serialize)]
pub struct GensetSummary {
    pub id: String,
    pub model: String,
    pub brand: crate::models::Brand,
    pub capacity: f64,
    pub price: f64,
}

impl From<&crate::models::Genset> for GensetSummary {
    fn from(g: &crate::models::Genset) -> Self {
        Self {
            id: g.id.clone(),
            model: g.model.clone(),
            brand: g.brand.clone(),
            capacity: g.capacity,
            price: g.price,
        }
    }
}

/// Uniform success envelope: `{success, message?, count?, data?}`.
/// Errors use the matching shape via `AppError::into_response`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: Some(data),
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(items.len()),
            data: Some(items),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: None,
        }
    }
}
