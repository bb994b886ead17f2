//! Account activation flow.
//!
//! A signup stores the digest of a one-time token and mails the plaintext to
//! the user. This service consumes the emailed (email, token) pair. Every
//! failure cause maps to one identical user-facing message so the endpoint
//! cannot be used to enumerate registered emails; the causes stay
//! distinguishable internally for logging and tests.

use std::sync::Arc;

use microblog_common::{verify_secret, AppResult};
use microblog_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;

/// The single user-facing message for every failed activation attempt.
pub const INVALID_ACTIVATION_MESSAGE: &str = "Invalid activation link";

/// Why an activation attempt failed. Internal only; callers surface
/// [`INVALID_ACTIVATION_MESSAGE`] regardless of the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationFailure {
    /// No user with that email.
    UserNotFound,
    /// The account was already activated.
    AlreadyActivated,
    /// The token does not match the stored digest.
    BadToken,
}

impl ActivationFailure {
    /// The user-facing message, identical for every variant.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        INVALID_ACTIVATION_MESSAGE
    }
}

/// Result of an activation attempt.
#[derive(Debug)]
pub enum ActivationOutcome {
    /// The account was activated and the user should be logged in.
    Activated(user::Model),
    /// The attempt failed; report [`INVALID_ACTIVATION_MESSAGE`].
    Invalid(ActivationFailure),
}

/// Collaborator that logs the user in after a successful activation.
#[async_trait::async_trait]
pub trait SessionEstablisher: Send + Sync {
    /// Establish a logged-in session for the user.
    async fn establish_session(&self, user: &user::Model) -> AppResult<()>;
}

/// Account activation service.
#[derive(Clone)]
pub struct ActivationService {
    user_repo: UserRepository,
    session: Option<Arc<dyn SessionEstablisher>>,
}

impl ActivationService {
    /// Create a new activation service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            session: None,
        }
    }

    /// Set the session-establishment collaborator.
    pub fn set_session_establisher(&mut self, session: Arc<dyn SessionEstablisher>) {
        self.session = Some(session);
    }

    /// Attempt to activate the account identified by `email` with `token`.
    ///
    /// Re-activation of an already activated account is rejected.
    pub async fn activate(&self, email: &str, token: &str) -> AppResult<ActivationOutcome> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            tracing::debug!("Activation attempt for unknown email");
            return Ok(ActivationOutcome::Invalid(ActivationFailure::UserNotFound));
        };

        if user.activated {
            tracing::debug!(user_id = %user.id, "Activation attempt on activated account");
            return Ok(ActivationOutcome::Invalid(
                ActivationFailure::AlreadyActivated,
            ));
        }

        let token_matches = match user.activation_digest.as_deref() {
            Some(digest) => verify_secret(token, digest)?,
            None => false,
        };
        if !token_matches {
            tracing::debug!(user_id = %user.id, "Activation attempt with bad token");
            return Ok(ActivationOutcome::Invalid(ActivationFailure::BadToken));
        }

        let user_id = user.id.clone();
        let mut active: user::ActiveModel = user.into();
        active.activated = Set(true);
        active.activated_at = Set(Some(chrono::Utc::now().into()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        tracing::info!(user_id = %user_id, "Activated account");

        if let Some(ref session) = self.session
            && let Err(e) = session.establish_session(&user).await
        {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to establish session");
        }

        Ok(ActivationOutcome::Activated(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use microblog_common::hash_secret;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn create_test_user(id: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: "Example User".to_string(),
            email: email.to_string(),
            email_lower: email.to_lowercase(),
            password_digest: "$argon2id$test".to_string(),
            activated: false,
            activated_at: None,
            activation_digest: None,
            remember_digest: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> ActivationService {
        ActivationService::new(UserRepository::new(db))
    }

    struct RecordingEstablisher {
        called: AtomicBool,
    }

    #[async_trait::async_trait]
    impl SessionEstablisher for RecordingEstablisher {
        async fn establish_session(&self, _user: &user::Model) -> AppResult<()> {
            self.called.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_unknown_email_is_invalid() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = service_with(db);

        let outcome = service.activate("nobody@example.com", "token").await.unwrap();
        match outcome {
            ActivationOutcome::Invalid(ActivationFailure::UserNotFound) => {}
            _ => panic!("Expected UserNotFound failure"),
        }
    }

    #[tokio::test]
    async fn test_reactivation_is_rejected() {
        let token = "one_time_token";
        let mut user = create_test_user("user1", "user@example.com");
        user.activated = true;
        user.activation_digest = Some(hash_secret(token).unwrap());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let service = service_with(db);

        let outcome = service.activate("user@example.com", token).await.unwrap();
        match outcome {
            ActivationOutcome::Invalid(ActivationFailure::AlreadyActivated) => {}
            _ => panic!("Expected AlreadyActivated failure"),
        }
    }

    #[tokio::test]
    async fn test_bad_token_is_invalid() {
        let mut user = create_test_user("user1", "user@example.com");
        user.activation_digest = Some(hash_secret("the_real_token").unwrap());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let service = service_with(db);

        let outcome = service
            .activate("user@example.com", "wrong_token")
            .await
            .unwrap();
        match outcome {
            ActivationOutcome::Invalid(ActivationFailure::BadToken) => {}
            _ => panic!("Expected BadToken failure"),
        }
    }

    #[tokio::test]
    async fn test_missing_digest_is_invalid() {
        let user = create_test_user("user1", "user@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let service = service_with(db);

        let outcome = service.activate("user@example.com", "").await.unwrap();
        match outcome {
            ActivationOutcome::Invalid(ActivationFailure::BadToken) => {}
            _ => panic!("Expected BadToken failure"),
        }
    }

    #[tokio::test]
    async fn test_successful_activation_logs_the_user_in() {
        let token = "one_time_token";
        let mut user = create_test_user("user1", "user@example.com");
        user.activation_digest = Some(hash_secret(token).unwrap());

        let mut activated = user.clone();
        activated.activated = true;
        activated.activated_at = Some(Utc::now().into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_query_results([[activated]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let establisher = Arc::new(RecordingEstablisher {
            called: AtomicBool::new(false),
        });

        let mut service = service_with(db);
        service.set_session_establisher(establisher.clone());

        let outcome = service.activate("user@example.com", token).await.unwrap();
        match outcome {
            ActivationOutcome::Activated(user) => {
                assert!(user.activated);
                assert!(user.activated_at.is_some());
            }
            ActivationOutcome::Invalid(_) => panic!("Expected successful activation"),
        }

        assert!(establisher.called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_all_failures_share_one_user_message() {
        let failures = [
            ActivationFailure::UserNotFound,
            ActivationFailure::AlreadyActivated,
            ActivationFailure::BadToken,
        ];

        for failure in failures {
            assert_eq!(failure.user_message(), INVALID_ACTIVATION_MESSAGE);
        }
    }
}
