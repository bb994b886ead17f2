//! Micropost service.

use microblog_common::{AppError, AppResult, IdGenerator};
use microblog_db::{
    entities::micropost,
    repositories::{MicropostRepository, RelationshipRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Maximum micropost content length.
pub const CONTENT_MAX_LEN: u64 = 140;

/// Micropost service for business logic.
#[derive(Clone)]
pub struct MicropostService {
    micropost_repo: MicropostRepository,
    relationship_repo: RelationshipRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a micropost.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMicropostInput {
    #[validate(
        length(min = 1, max = CONTENT_MAX_LEN),
        custom(function = validate_not_blank)
    )]
    pub content: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

impl MicropostService {
    /// Create a new micropost service.
    #[must_use]
    pub fn new(
        micropost_repo: MicropostRepository,
        relationship_repo: RelationshipRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            micropost_repo,
            relationship_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new micropost owned by `user_id`.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateMicropostInput,
    ) -> AppResult<micropost::Model> {
        input.validate()?;

        // Owner must exist
        let user = self.user_repo.get_by_id(user_id).await?;

        let model = micropost::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user.id.clone()),
            content: Set(input.content),
            ..Default::default()
        };

        let micropost = self.micropost_repo.create(model).await?;
        tracing::debug!(micropost_id = %micropost.id, user_id = %user.id, "Created micropost");

        Ok(micropost)
    }

    /// Get a micropost by ID.
    pub async fn get(&self, id: &str) -> AppResult<micropost::Model> {
        self.micropost_repo.get_by_id(id).await
    }

    /// Delete a micropost. Only the owner may delete it.
    pub async fn delete(&self, user_id: &str, micropost_id: &str) -> AppResult<()> {
        let micropost = self.micropost_repo.get_by_id(micropost_id).await?;

        if micropost.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only delete your own microposts".to_string(),
            ));
        }

        self.micropost_repo.delete(micropost_id).await
    }

    /// Get a user's microposts, newest first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<micropost::Model>> {
        self.micropost_repo
            .find_by_user(user_id, limit, until_id)
            .await
    }

    /// Count a user's microposts.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        self.micropost_repo.count_by_user(user_id).await
    }

    /// Get the feed for a user: own posts plus posts from followed users,
    /// newest first.
    pub async fn feed(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<micropost::Model>> {
        let following_ids = self.relationship_repo.find_following_ids(user_id).await?;

        self.micropost_repo
            .find_feed(user_id, &following_ids, limit, until_id)
            .await
    }
}
