use anyhow::Result;
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

use crate::error::AppError;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub allowed_origins: Vec<String>,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub expiry_hours: i64,
}

/// Optional bootstrap admin account, created at startup if absent.
#[derive(Deserialize, Clone, Debug)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub password: Option<Secret<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let host = env::var("GENSET_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("GENSET_SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid port: {}", e)))?;

        let mongo_uri = get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?;
        let database = get_env("MONGODB_DATABASE", Some("genset_db"), is_prod)?;

        let jwt_secret = get_env("JWT_SECRET", Some("dev-secret"), is_prod)?;
        let expiry_hours = env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| "168".to_string())
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid JWT_EXPIRY_HOURS: {}", e)))?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            server: ServerConfig { host, port },
            mongodb: MongoConfig {
                uri: Secret::new(mongo_uri),
                database,
            },
            jwt: JwtConfig {
                secret: Secret::new(jwt_secret),
                expiry_hours,
            },
            admin: AdminConfig {
                email: env::var("ADMIN_EMAIL").ok(),
                password: env::var("ADMIN_PASSWORD").ok().map(Secret::new),
            },
            allowed_origins,
            service_name: "genset-service".to_string(),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
