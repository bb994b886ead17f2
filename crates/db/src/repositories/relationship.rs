//! Relationship repository.

use std::sync::Arc;

use crate::entities::{Relationship, relationship};
use microblog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Relationship repository for database operations.
#[derive(Clone)]
pub struct RelationshipRepository {
    db: Arc<DatabaseConnection>,
}

impl RelationshipRepository {
    /// Create a new relationship repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a relationship by follower and followed user.
    pub async fn find_by_pair(
        &self,
        follower_id: &str,
        followed_id: &str,
    ) -> AppResult<Option<relationship::Model>> {
        Relationship::find()
            .filter(relationship::Column::FollowerId.eq(follower_id))
            .filter(relationship::Column::FollowedId.eq(followed_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, follower_id: &str, followed_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(follower_id, followed_id).await?.is_some())
    }

    /// Create a new relationship.
    pub async fn create(&self, model: relationship::ActiveModel) -> AppResult<relationship::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a relationship by pair.
    pub async fn delete_by_pair(&self, follower_id: &str, followed_id: &str) -> AppResult<()> {
        let relationship = self.find_by_pair(follower_id, followed_id).await?;
        if let Some(r) = relationship {
            r.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get follow edges where the user is the follower (paginated).
    pub async fn find_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<relationship::Model>> {
        let mut query = Relationship::find()
            .filter(relationship::Column::FollowerId.eq(user_id))
            .order_by_desc(relationship::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(relationship::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get follow edges where the user is the one being followed (paginated).
    pub async fn find_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<relationship::Model>> {
        let mut query = Relationship::find()
            .filter(relationship::Column::FollowedId.eq(user_id))
            .order_by_desc(relationship::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(relationship::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get IDs of all users this user is following.
    ///
    /// Used for feed composition (own posts plus followed users' posts).
    pub async fn find_following_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        Relationship::find()
            .filter(relationship::Column::FollowerId.eq(user_id))
            .select_only()
            .column(relationship::Column::FollowedId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users this user is following.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        Relationship::find()
            .filter(relationship::Column::FollowerId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count followers of this user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        Relationship::find()
            .filter(relationship::Column::FollowedId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
