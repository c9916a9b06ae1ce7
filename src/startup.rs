use secrecy::ExposeSecret;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::AppError;
use crate::services::{
    AccountService, JwtService, MongoDb, OrderService, ReportService, SequenceService,
    TicketService,
};
use crate::{AppState, build_router};

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connect storage, create indexes, bootstrap the admin account, and
    /// bind the listener (port 0 picks a free port, used by tests).
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let db = MongoDb::connect(
            config.mongodb.uri.expose_secret(),
            &config.mongodb.database,
        )
        .await?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let jwt = JwtService::new(&config.jwt);
        let sequence = SequenceService::new(db.database());
        let accounts = AccountService::new(db.clone(), jwt.clone());
        let orders = OrderService::new(db.clone(), sequence.clone());
        let tickets = TicketService::new(db.clone(), sequence);
        let reports = ReportService::new(db.clone());

        if let (Some(email), Some(password)) = (&config.admin.email, &config.admin.password) {
            accounts
                .ensure_admin(email, password.expose_secret())
                .await?;
        }

        let state = AppState {
            config: config.clone(),
            db,
            jwt,
            accounts,
            orders,
            tickets,
            reports,
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }
}
