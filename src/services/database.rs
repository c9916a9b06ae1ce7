use mongodb::{
    Client as MongoClient, Collection, Database, IndexModel, bson::doc, options::IndexOptions,
};

use crate::error::AppError;
use crate::models::{Customer, Genset, SalesOrder, ServiceRequest};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Connected to MongoDB");
        Ok(Self { client, db })
    }

    /// Unique indexes guard email and order/ticket numbers; the rest
    /// mirror the common query filters.
    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let unique = |name: &str| {
            IndexOptions::builder()
                .name(name.to_string())
                .unique(true)
                .build()
        };
        let named = |name: &str| IndexOptions::builder().name(name.to_string()).build();

        self.customers()
            .create_indexes(
                [
                    IndexModel::builder()
                        .keys(doc! { "email": 1 })
                        .options(unique("email_unique"))
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "role": 1 })
                        .options(named("role_lookup"))
                        .build(),
                ],
                None,
            )
            .await?;

        self.gensets()
            .create_indexes(
                [
                    IndexModel::builder()
                        .keys(doc! { "is_active": 1 })
                        .options(named("active_lookup"))
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "brand": 1 })
                        .options(named("brand_lookup"))
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "capacity": 1 })
                        .options(named("capacity_lookup"))
                        .build(),
                ],
                None,
            )
            .await?;

        self.sales_orders()
            .create_indexes(
                [
                    IndexModel::builder()
                        .keys(doc! { "order_number": 1 })
                        .options(unique("order_number_unique"))
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "customer_id": 1 })
                        .options(named("order_customer_lookup"))
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "status": 1 })
                        .options(named("order_status_lookup"))
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "created_at": -1 })
                        .options(named("order_created_desc"))
                        .build(),
                ],
                None,
            )
            .await?;

        self.service_requests()
            .create_indexes(
                [
                    IndexModel::builder()
                        .keys(doc! { "ticket_number": 1 })
                        .options(unique("ticket_number_unique"))
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "customer_id": 1 })
                        .options(named("ticket_customer_lookup"))
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "status": 1 })
                        .options(named("ticket_status_lookup"))
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "assigned_technician": 1 })
                        .options(named("ticket_technician_lookup"))
                        .build(),
                ],
                None,
            )
            .await?;

        tracing::info!("MongoDB indexes initialized");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn customers(&self) -> Collection<Customer> {
        self.db.collection("customers")
    }

    pub fn gensets(&self) -> Collection<Genset> {
        self.db.collection("gensets")
    }

    pub fn sales_orders(&self) -> Collection<SalesOrder> {
        self.db.collection("sales_orders")
    }

    pub fn service_requests(&self) -> Collection<ServiceRequest> {
        self.db.collection("service_requests")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
