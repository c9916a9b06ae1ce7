pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::auth_middleware;
use crate::services::{
    AccountService, JwtService, MongoDb, OrderService, ReportService, TicketService,
};

pub use startup::Application;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: MongoDb,
    pub jwt: JwtService,
    pub accounts: AccountService,
    pub orders: OrderService,
    pub tickets: TicketService,
    pub reports: ReportService,
}

pub fn build_router(state: AppState) -> Router {
    // Everything behind a bearer token; role checks happen in the policy
    // module per handler.
    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/profile", put(handlers::auth::update_profile))
        .route(
            "/auth/change-password",
            post(handlers::auth::change_password),
        )
        .route(
            "/orders",
            post(handlers::orders::create).get(handlers::orders::list),
        )
        .route(
            "/orders/customer/:customer_id",
            get(handlers::orders::by_customer),
        )
        .route(
            "/orders/:id",
            get(handlers::orders::get).delete(handlers::orders::delete),
        )
        .route("/orders/:id/status", patch(handlers::orders::update_status))
        .route(
            "/orders/:id/payment",
            patch(handlers::orders::update_payment),
        )
        .route("/orders/:id/cancel", patch(handlers::orders::cancel))
        .route(
            "/service-requests",
            post(handlers::service_requests::create).get(handlers::service_requests::list),
        )
        .route(
            "/service-requests/customer/:customer_id",
            get(handlers::service_requests::by_customer),
        )
        .route("/service-requests/:id", get(handlers::service_requests::get))
        .route(
            "/service-requests/:id/assign",
            patch(handlers::service_requests::assign),
        )
        .route(
            "/service-requests/:id/status",
            patch(handlers::service_requests::update_status),
        )
        .route(
            "/service-requests/:id/complete",
            patch(handlers::service_requests::complete),
        )
        .route(
            "/service-requests/:id/feedback",
            patch(handlers::service_requests::feedback),
        )
        .route(
            "/users",
            post(handlers::users::create).get(handlers::users::list),
        )
        .route(
            "/users/:id",
            get(handlers::users::get)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route("/users/:id/deactivate", patch(handlers::users::deactivate))
        .route("/users/:id/activate", patch(handlers::users::activate))
        .route("/users/:id/role", patch(handlers::users::change_role))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .allowed_origins
                .iter()
                .map(|origin| {
                    origin.parse::<HeaderValue>().unwrap_or_else(|e| {
                        tracing::error!("Invalid CORS origin '{}': {}. Using fallback.", origin, e);
                        HeaderValue::from_static("*")
                    })
                })
                .collect::<Vec<HeaderValue>>(),
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // Catalog reads are public; mutations share the path, so the auth
        // middleware is attached per method router.
        .route(
            "/gensets",
            post(handlers::gensets::create)
                .route_layer(from_fn_with_state(state.clone(), auth_middleware))
                .get(handlers::gensets::list),
        )
        .route(
            "/gensets/:id",
            put(handlers::gensets::update)
                .delete(handlers::gensets::delete)
                .route_layer(from_fn_with_state(state.clone(), auth_middleware))
                .get(handlers::gensets::get),
        )
        .route(
            "/gensets/:id/deactivate",
            patch(handlers::gensets::deactivate)
                .route_layer(from_fn_with_state(state.clone(), auth_middleware)),
        )
        .route("/dashboard", get(handlers::reports::dashboard))
        .route("/low-stock", get(handlers::reports::low_stock))
        .route("/reports/sales", get(handlers::reports::sales_report))
        .route("/reports/service", get(handlers::reports::service_metrics))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
