use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::models::Role;

/// Bearer-token claims: account id, email, and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Issues and validates HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours: config.expiry_hours,
        }
    }

    pub fn generate_token(
        &self,
        account_id: &str,
        email: &str,
        role: Role,
    ) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.expiry_hours);

        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))?;
        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn service(expiry_hours: i64) -> JwtService {
        JwtService::new(&JwtConfig {
            secret: Secret::new("test-secret".to_string()),
            expiry_hours,
        })
    }

    #[test]
    fn token_roundtrip_preserves_claims() {
        let jwt = service(168);
        let token = jwt
            .generate_token("acct_123", "buyer@example.com", Role::Customer)
            .unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "acct_123");
        assert_eq!(claims.email, "buyer@example.com");
        assert_eq!(claims.role, Role::Customer);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service(-1);
        let token = jwt
            .generate_token("acct_123", "buyer@example.com", Role::Customer)
            .unwrap();
        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let jwt = service(168);
        let other = JwtService::new(&JwtConfig {
            secret: Secret::new("another-secret".to_string()),
            expiry_hours: 168,
        });
        let token = other
            .generate_token("acct_123", "buyer@example.com", Role::Admin)
            .unwrap();
        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn staff_role_survives_the_roundtrip() {
        let jwt = service(168);
        let token = jwt
            .generate_token("acct_9", "tech@example.com", Role::Technician)
            .unwrap();
        let claims = jwt.validate_token(&token).unwrap();
        assert!(claims.role.is_staff());
    }
}
