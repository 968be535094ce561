//! Rider service layer - registration and lookup

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::repository::users;
use crate::user::{RegisterUserRequest, User};

const LIST_LIMIT: i64 = 100;

/// Rider service.
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new rider. Phone numbers are unique.
    pub async fn register_user(&self, req: RegisterUserRequest) -> AppResult<User> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        if req.phone.trim().is_empty() {
            return Err(AppError::validation("phone must not be empty"));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: req.name,
            phone: req.phone,
            created_at: Utc::now(),
        };

        match users::insert(&self.pool, &user).await {
            Ok(()) => Ok(user),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::conflict("phone number is already registered"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a single rider by ID
    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        users::fetch(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))
    }

    /// List the most recently registered riders
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(users::list(&self.pool, LIST_LIMIT).await?)
    }
}
