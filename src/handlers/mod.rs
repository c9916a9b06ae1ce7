pub mod auth;
pub mod gensets;
pub mod health;
pub mod orders;
pub mod reports;
pub mod service_requests;
pub mod users;
