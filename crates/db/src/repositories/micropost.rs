//! Micropost repository.

use std::sync::Arc;

use crate::entities::{Micropost, micropost};
use microblog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Micropost repository for database operations.
#[derive(Clone)]
pub struct MicropostRepository {
    db: Arc<DatabaseConnection>,
}

impl MicropostRepository {
    /// Create a new micropost repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a micropost by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<micropost::Model>> {
        Micropost::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a micropost by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<micropost::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::MicropostNotFound(id.to_string()))
    }

    /// Create a new micropost.
    pub async fn create(&self, model: micropost::ActiveModel) -> AppResult<micropost::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a micropost.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Micropost::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get microposts by user (paginated, newest first).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<micropost::Model>> {
        let mut query = Micropost::find()
            .filter(micropost::Column::UserId.eq(user_id))
            .order_by_desc(micropost::Column::CreatedAt)
            .order_by_desc(micropost::Column::Id)
            .limit(limit);

        if let Some(until) = until_id {
            query = query.filter(micropost::Column::Id.lt(until));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the feed for a user: own posts plus posts from followed users,
    /// newest first.
    ///
    /// # Arguments
    /// * `user_id` - The user's ID
    /// * `following_ids` - List of user IDs the user is following
    /// * `limit` - Maximum number of posts to return
    /// * `until_id` - Return posts older than this ID (for pagination)
    pub async fn find_feed(
        &self,
        user_id: &str,
        following_ids: &[String],
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<micropost::Model>> {
        // Include own posts and posts from followed users
        let mut author_ids = following_ids.to_vec();
        author_ids.push(user_id.to_string());

        let mut condition = Condition::all().add(micropost::Column::UserId.is_in(author_ids));

        if let Some(until) = until_id {
            condition = condition.add(micropost::Column::Id.lt(until));
        }

        Micropost::find()
            .filter(condition)
            .order_by_desc(micropost::Column::CreatedAt)
            .order_by_desc(micropost::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count total microposts.
    pub async fn count(&self) -> AppResult<u64> {
        Micropost::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count microposts by user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Micropost::find()
            .filter(micropost::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};
    use std::sync::Arc;

    fn create_test_micropost(id: &str, user_id: &str, content: &str) -> micropost::Model {
        micropost::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let post = create_test_micropost("post1", "user1", "Lorem ipsum");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = MicropostRepository::new(db);
        let result = repo.find_by_id("post1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().content, "Lorem ipsum");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<micropost::Model>::new()])
                .into_connection(),
        );

        let repo = MicropostRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(result.is_err());
        match result {
            Err(AppError::MicropostNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected MicropostNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_create_micropost() {
        let post = create_test_micropost("post1", "user1", "Hello world");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = MicropostRepository::new(db);

        let active = micropost::ActiveModel {
            id: Set("post1".to_string()),
            user_id: Set("user1".to_string()),
            content: Set("Hello world".to_string()),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.user_id, "user1");
    }

    #[tokio::test]
    async fn test_find_by_user_queries_newest_first() {
        let p1 = create_test_micropost("post2", "user1", "newer");
        let p2 = create_test_micropost("post1", "user1", "older");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = MicropostRepository::new(db.clone());
        let result = repo.find_by_user("user1", 10, None).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].content, "newer");

        drop(repo);
        let conn = Arc::try_unwrap(db).map_err(|_| "connection still shared").unwrap();
        let query = conn
            .into_transaction_log()
            .iter()
            .flat_map(|t| t.statements())
            .map(|s| format!("{} {:?}", s.sql, s.values))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(
            query.contains(r#"ORDER BY "micropost"."created_at" DESC, "micropost"."id" DESC"#),
            "unexpected query: {query}"
        );
    }

    #[tokio::test]
    async fn test_find_feed_queries_authors_newest_first() {
        let p1 = create_test_micropost("post3", "user2", "from followed");
        let p2 = create_test_micropost("post2", "user1", "from self");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = MicropostRepository::new(db.clone());
        let result = repo
            .find_feed("user1", &["user2".to_string()], 10, None)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);

        drop(repo);
        let conn = Arc::try_unwrap(db).map_err(|_| "connection still shared").unwrap();
        let query = conn
            .into_transaction_log()
            .iter()
            .flat_map(|t| t.statements())
            .map(|s| format!("{} {:?}", s.sql, s.values))
            .collect::<Vec<_>>()
            .join("\n");
        // Authors are the followed set plus the user's own posts
        assert!(query.contains(r#""micropost"."user_id" IN"#), "unexpected query: {query}");
        assert!(query.contains("user1"), "unexpected query: {query}");
        assert!(query.contains("user2"), "unexpected query: {query}");
        assert!(
            query.contains(r#"ORDER BY "micropost"."created_at" DESC, "micropost"."id" DESC"#),
            "unexpected query: {query}"
        );
    }

    #[tokio::test]
    async fn test_delete_micropost() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = MicropostRepository::new(db);
        let result = repo.delete("post1").await;

        assert!(result.is_ok());
    }
}
