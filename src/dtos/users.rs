use serde::Deserialize;
use validator::Validate;

use crate::models::{Address, CustomerType, Role};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    /// Admin-created accounts may take any role; defaults to customer.
    pub role: Option<Role>,
    pub company: Option<String>,
    pub address: Option<Address>,
    pub customer_type: Option<CustomerType>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<Address>,
    pub customer_type: Option<CustomerType>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    /// Only honored for admin callers.
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub role: Option<Role>,
    /// "active" or "inactive"
    pub status: Option<String>,
    /// Case-insensitive substring match against name or email.
    pub search: Option<String>,
}
