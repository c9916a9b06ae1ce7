use genset_service::config::Config;
use genset_service::models::{Genset, Role};
use genset_service::services::MongoDb;
use genset_service::startup::Application;
use mongodb::bson::doc;
use serde_json::{Value, json};
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        if std::env::var("MONGODB_URI").is_err() {
            std::env::set_var("MONGODB_URI", "mongodb://localhost:27017");
        }

        let db_name = format!("genset_test_{}", Uuid::new_v4().simple());

        let mut config = Config::from_env().expect("Failed to load configuration");
        config.server.port = 0; // Random port for testing
        config.mongodb.database = db_name.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            client,
        }
    }

    /// Register a fresh customer account; returns (token, account id).
    pub async fn register_customer(&self) -> (String, String) {
        let email = format!("buyer-{}@example.com", Uuid::new_v4().simple());
        let response = self
            .client
            .post(format!("{}/auth/register", self.address))
            .json(&json!({
                "name": "Test Buyer",
                "email": email,
                "password": "order-desk-2024",
                "phone": "555-0100"
            }))
            .send()
            .await
            .expect("Failed to execute register request");
        assert_eq!(response.status(), 201, "registration should succeed");

        let body: Value = response.json().await.expect("Failed to parse JSON");
        let token = body["data"]["token"].as_str().unwrap().to_string();
        let id = body["data"]["user"]["id"].as_str().unwrap().to_string();
        (token, id)
    }

    /// Register, then promote the account and log in again so the token
    /// carries the new role.
    pub async fn create_user_with_role(&self, role: Role) -> (String, String) {
        let email = format!("staff-{}@example.com", Uuid::new_v4().simple());
        let response = self
            .client
            .post(format!("{}/auth/register", self.address))
            .json(&json!({
                "name": "Test Staff",
                "email": email,
                "password": "service-bay-2024",
                "phone": "555-0101"
            }))
            .send()
            .await
            .expect("Failed to execute register request");
        assert_eq!(response.status(), 201);

        let body: Value = response.json().await.unwrap();
        let id = body["data"]["user"]["id"].as_str().unwrap().to_string();

        self.db
            .customers()
            .update_one(
                doc! { "_id": &id },
                doc! { "$set": { "role": role.as_str() } },
                None,
            )
            .await
            .expect("Failed to promote account");

        let response = self
            .client
            .post(format!("{}/auth/login", self.address))
            .json(&json!({ "email": email, "password": "service-bay-2024" }))
            .send()
            .await
            .expect("Failed to execute login request");
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        let token = body["data"]["token"].as_str().unwrap().to_string();
        (token, id)
    }

    pub async fn admin_token(&self) -> String {
        self.create_user_with_role(Role::Admin).await.0
    }

    /// Insert a catalog item directly; returns its id.
    pub async fn seed_genset(&self, stock: i64, price: f64) -> String {
        use genset_service::models::{Brand, Condition, FuelType, Phase};

        let genset = Genset::new(
            "DG-5000".to_string(),
            Brand::Cummins,
            5000.0,
            FuelType::Diesel,
            Phase::Three,
            price,
            Condition::New,
            stock,
            12,
        );
        let id = genset.id.clone();
        self.db
            .gensets()
            .insert_one(&genset, None)
            .await
            .expect("Failed to seed genset");
        id
    }

    /// Create a single-line Cash order; returns the order view from the
    /// response.
    pub async fn create_order(&self, token: &str, genset_id: &str, quantity: i64) -> Value {
        let response = self
            .client
            .post(format!("{}/orders", self.address))
            .bearer_auth(token)
            .json(&json!({
                "items": [{ "genset_id": genset_id, "quantity": quantity }],
                "payment_method": "Cash"
            }))
            .send()
            .await
            .expect("Failed to execute create-order request");
        assert_eq!(response.status(), 201, "order creation should succeed");

        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["data"].clone()
    }

    pub async fn set_order_status(
        &self,
        token: &str,
        order_id: &str,
        status: &str,
    ) -> reqwest::Response {
        self.client
            .patch(format!("{}/orders/{}/status", self.address, order_id))
            .bearer_auth(token)
            .json(&json!({ "status": status }))
            .send()
            .await
            .expect("Failed to execute status request")
    }

    pub async fn genset_stock(&self, id: &str) -> i64 {
        self.db
            .gensets()
            .find_one(doc! { "_id": id }, None)
            .await
            .expect("Failed to fetch genset")
            .expect("Genset not found in DB")
            .stock
    }

    pub async fn cleanup(&self) {
        let _ = self
            .db
            .client()
            .database(&self.db_name)
            .drop(None)
            .await;
    }
}
