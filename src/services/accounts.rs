use futures::TryStreamExt;
use mongodb::bson::{self, doc};

use crate::dtos::auth::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
use crate::dtos::users::{CreateUserRequest, UpdateUserRequest, UserQuery};
use crate::error::AppError;
use crate::models::{Customer, Role, SanitizedCustomer};
use crate::services::{JwtService, MongoDb, jwt::Claims};
use crate::utils::password::{hash_password, verify_password};

/// Account operations: self-service registration/login/profile plus the
/// admin-side user management.
#[derive(Clone)]
pub struct AccountService {
    db: MongoDb,
    jwt: JwtService,
}

impl AccountService {
    pub fn new(db: MongoDb, jwt: JwtService) -> Self {
        Self { db, jwt }
    }

    /// Public registration. The role is always customer, whatever the
    /// request claims.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AppError> {
        self.ensure_email_free(&req.email).await?;

        let mut account = Customer::new(
            req.name,
            req.email,
            req.phone,
            hash_password(&req.password)?,
            Role::Customer,
        );
        account.company = req.company;
        account.address = req.address;

        self.insert_account(&account).await?;
        tracing::info!(account_id = %account.id, "Account registered");

        let token = self
            .jwt
            .generate_token(&account.id, &account.email, account.role)?;
        Ok(AuthResponse {
            token,
            user: account.sanitized(),
        })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = req.email.to_lowercase();
        let account = self
            .db
            .customers()
            .find_one(doc! { "email": &email }, None)
            .await?
            .ok_or_else(|| AppError::AuthError(anyhow::anyhow!("Invalid email or password")))?;

        if !account.is_active {
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "Your account is inactive"
            )));
        }

        verify_password(&req.password, &account.password_hash)
            .map_err(|_| AppError::AuthError(anyhow::anyhow!("Invalid email or password")))?;

        let last_login = chrono::Utc::now();
        self.db
            .customers()
            .update_one(
                doc! { "_id": &account.id },
                doc! { "$set": { "last_login": bson::DateTime::from_chrono(last_login) } },
                None,
            )
            .await?;

        let token = self
            .jwt
            .generate_token(&account.id, &account.email, account.role)?;
        tracing::info!(account_id = %account.id, "Login successful");

        let mut user = account.sanitized();
        user.last_login = Some(last_login);
        Ok(AuthResponse { token, user })
    }

    pub async fn get(&self, id: &str) -> Result<Customer, AppError> {
        self.db
            .customers()
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))
    }

    pub async fn update_profile(
        &self,
        account_id: &str,
        req: UpdateProfileRequest,
    ) -> Result<SanitizedCustomer, AppError> {
        let mut account = self.get(account_id).await?;
        if let Some(name) = req.name {
            account.name = name;
        }
        if let Some(phone) = req.phone {
            account.phone = phone;
        }
        if req.company.is_some() {
            account.company = req.company;
        }
        if req.address.is_some() {
            account.address = req.address;
        }
        account.updated_at = chrono::Utc::now();

        self.replace_account(&account).await?;
        Ok(account.sanitized())
    }

    pub async fn change_password(
        &self,
        account_id: &str,
        req: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let mut account = self.get(account_id).await?;

        verify_password(&req.current_password, &account.password_hash)
            .map_err(|_| AppError::AuthError(anyhow::anyhow!("Current password is incorrect")))?;

        account.password_hash = hash_password(&req.new_password)?;
        account.updated_at = chrono::Utc::now();
        self.replace_account(&account).await?;
        tracing::info!(account_id = %account.id, "Password changed");
        Ok(())
    }

    /// Admin-side creation; any role is allowed.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<SanitizedCustomer, AppError> {
        self.ensure_email_free(&req.email).await?;

        let mut account = Customer::new(
            req.name,
            req.email,
            req.phone,
            hash_password(&req.password)?,
            req.role.unwrap_or(Role::Customer),
        );
        account.company = req.company;
        account.address = req.address;
        if let Some(customer_type) = req.customer_type {
            account.customer_type = customer_type;
        }

        self.insert_account(&account).await?;
        tracing::info!(account_id = %account.id, role = %account.role, "User created");
        Ok(account.sanitized())
    }

    pub async fn list_users(&self, query: UserQuery) -> Result<Vec<SanitizedCustomer>, AppError> {
        let mut filter = doc! {};
        if let Some(role) = query.role {
            filter.insert("role", bson::to_bson(&role)?);
        }
        match query.status.as_deref() {
            Some("active") => {
                filter.insert("is_active", true);
            }
            Some("inactive") => {
                filter.insert("is_active", false);
            }
            _ => {}
        }
        if let Some(search) = query.search {
            let pattern = doc! { "$regex": &search, "$options": "i" };
            filter.insert(
                "$or",
                vec![
                    doc! { "name": pattern.clone() },
                    doc! { "email": pattern },
                ],
            );
        }

        let accounts: Vec<Customer> = self
            .db
            .customers()
            .find(filter, None)
            .await?
            .try_collect()
            .await?;
        Ok(accounts.iter().map(Customer::sanitized).collect())
    }

    /// Admins may edit anyone and any field; other callers only themselves,
    /// and never role or activation.
    pub async fn update_user(
        &self,
        caller: &Claims,
        id: &str,
        mut req: UpdateUserRequest,
    ) -> Result<SanitizedCustomer, AppError> {
        crate::middleware::policy::require_self_or_admin(caller, id)?;

        if caller.role != Role::Admin {
            req.role = None;
            req.is_active = None;
        }

        let mut account = self.get(id).await?;
        if let Some(name) = req.name {
            account.name = name;
        }
        if let Some(phone) = req.phone {
            account.phone = phone;
        }
        if req.company.is_some() {
            account.company = req.company;
        }
        if req.address.is_some() {
            account.address = req.address;
        }
        if let Some(customer_type) = req.customer_type {
            account.customer_type = customer_type;
        }
        if let Some(password) = req.password {
            account.password_hash = hash_password(&password)?;
        }
        if let Some(role) = req.role {
            account.role = role;
        }
        if let Some(is_active) = req.is_active {
            account.is_active = is_active;
        }
        account.updated_at = chrono::Utc::now();

        self.replace_account(&account).await?;
        Ok(account.sanitized())
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let result = self
            .db
            .customers()
            .delete_one(doc! { "_id": id }, None)
            .await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
        }
        tracing::info!(account_id = %id, "User deleted");
        Ok(())
    }

    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<SanitizedCustomer, AppError> {
        let mut account = self.get(id).await?;
        account.is_active = is_active;
        account.updated_at = chrono::Utc::now();
        self.replace_account(&account).await?;
        Ok(account.sanitized())
    }

    pub async fn change_role(&self, id: &str, role: Role) -> Result<SanitizedCustomer, AppError> {
        let mut account = self.get(id).await?;
        account.role = role;
        account.updated_at = chrono::Utc::now();
        self.replace_account(&account).await?;
        tracing::info!(account_id = %id, role = %role, "Role changed");
        Ok(account.sanitized())
    }

    /// Startup hook: create the configured admin account when absent.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        let email = email.to_lowercase();
        if self
            .db
            .customers()
            .find_one(doc! { "email": &email }, None)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let account = Customer::new(
            "Administrator".to_string(),
            email,
            String::new(),
            hash_password(password)?,
            Role::Admin,
        );
        self.insert_account(&account).await?;
        tracing::info!(account_id = %account.id, "Bootstrap admin created");
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), AppError> {
        let existing = self
            .db
            .customers()
            .find_one(doc! { "email": email.to_lowercase() }, None)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Email already registered"
            )));
        }
        Ok(())
    }

    /// The unique index is the real guard; a lost pre-check race surfaces
    /// as a duplicate-key write error and still maps to Conflict.
    async fn insert_account(&self, account: &Customer) -> Result<(), AppError> {
        self.db
            .customers()
            .insert_one(account, None)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::Conflict(anyhow::anyhow!("Email already registered"))
                } else {
                    AppError::from(e)
                }
            })?;
        Ok(())
    }

    async fn replace_account(&self, account: &Customer) -> Result<(), AppError> {
        self.db
            .customers()
            .replace_one(doc! { "_id": &account.id }, account, None)
            .await?;
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == 11000
    )
}
