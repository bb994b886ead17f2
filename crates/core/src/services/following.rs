//! Following service.

use microblog_common::{AppError, AppResult, IdGenerator};
use microblog_db::{
    entities::relationship,
    repositories::{RelationshipRepository, UserRepository},
};
use sea_orm::Set;

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    relationship_repo: RelationshipRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub fn new(relationship_repo: RelationshipRepository, user_repo: UserRepository) -> Self {
        Self {
            relationship_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user.
    pub async fn follow(
        &self,
        follower_id: &str,
        followed_id: &str,
    ) -> AppResult<relationship::Model> {
        // Can't follow yourself
        if follower_id == followed_id {
            return Err(AppError::BadRequest("Cannot follow yourself".to_string()));
        }

        // Check if already following
        if self
            .relationship_repo
            .is_following(follower_id, followed_id)
            .await?
        {
            return Err(AppError::BadRequest("Already following".to_string()));
        }

        // Both users must exist
        let follower = self.user_repo.get_by_id(follower_id).await?;
        let followed = self.user_repo.get_by_id(followed_id).await?;

        let model = relationship::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower.id.clone()),
            followed_id: Set(followed.id.clone()),
            ..Default::default()
        };

        let relationship = self.relationship_repo.create(model).await?;
        tracing::debug!(follower_id = %follower.id, followed_id = %followed.id, "Created follow edge");

        Ok(relationship)
    }

    /// Unfollow a user.
    pub async fn unfollow(&self, follower_id: &str, followed_id: &str) -> AppResult<()> {
        if !self
            .relationship_repo
            .is_following(follower_id, followed_id)
            .await?
        {
            return Err(AppError::BadRequest("Not following".to_string()));
        }

        self.relationship_repo
            .delete_by_pair(follower_id, followed_id)
            .await
    }

    /// Check if a user is following another.
    pub async fn is_following(&self, follower_id: &str, followed_id: &str) -> AppResult<bool> {
        self.relationship_repo
            .is_following(follower_id, followed_id)
            .await
    }

    /// Get follow edges where the user is the follower.
    pub async fn following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<relationship::Model>> {
        self.relationship_repo
            .find_following(user_id, limit, until_id)
            .await
    }

    /// Get follow edges where the user is the one being followed.
    pub async fn followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<relationship::Model>> {
        self.relationship_repo
            .find_followers(user_id, limit, until_id)
            .await
    }

    /// Count users this user is following.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        self.relationship_repo.count_following(user_id).await
    }

    /// Count followers of this user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        self.relationship_repo.count_followers(user_id).await
    }
}
