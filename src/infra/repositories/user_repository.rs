//! User repository.


use std::sync::Arc;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::ROLE_USER;
use crate::domain::User;
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(test)]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find the user holding an unconsumed verification token
    async fn find_by_verification_token(&self, token: &str) -> AppResult<Option<User>>;

    /// Find the user holding an unconsumed reset token
    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>>;

    /// Create a new unverified user holding the given verification token
    async fn create(
        &self,
        email: String,
        password_hash: String,
        verification_token: String,
    ) -> AppResult<User>;

    /// Set the verified flag and clear the verification token (single use)
    async fn mark_email_verified(&self, id: Uuid) -> AppResult<()>;

    /// Store a password reset token
    async fn set_reset_token(&self, id: Uuid, token: String) -> AppResult<()>;

    /// Replace the password hash and clear the reset token (single use)
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    /// List users ordered by creation date, newest first.
    /// Returns the page of users plus the total count.
    async fn list_paginated(&self, page: u64, per_page: u64) -> AppResult<(Vec<User>, u64)>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?
            .ok_or_not_found()
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_verification_token(&self, token: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::VerificationToken.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::ResetToken.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        verification_token: String,
    ) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(ROLE_USER.to_string()),
            is_email_verified: Set(false),
            verification_token: Set(Some(verification_token)),
            reset_token: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn mark_email_verified(&self, id: Uuid) -> AppResult<()> {
        let mut active: ActiveModel = self.fetch(id).await?.into();
        active.is_email_verified = Set(true);
        active.verification_token = Set(None);
        active.updated_at = Set(chrono::Utc::now());

        active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn set_reset_token(&self, id: Uuid, token: String) -> AppResult<()> {
        let mut active: ActiveModel = self.fetch(id).await?.into();
        active.reset_token = Set(Some(token));
        active.updated_at = Set(chrono::Utc::now());

        active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut active: ActiveModel = self.fetch(id).await?.into();
        active.password_hash = Set(password_hash);
        active.reset_token = Set(None);
        active.updated_at = Set(chrono::Utc::now());

        active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn list_paginated(&self, page: u64, per_page: u64) -> AppResult<(Vec<User>, u64)> {
        let paginator = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page);

        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }
}
