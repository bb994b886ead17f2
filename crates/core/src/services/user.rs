//! User service.

use microblog_common::{hash_secret, verify_secret, AppError, AppResult, IdGenerator};
use microblog_db::{entities::user, repositories::UserRepository};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::Set;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// Maximum display name length.
pub const NAME_MAX_LEN: u64 = 50;

/// Maximum email address length.
pub const EMAIL_MAX_LEN: u64 = 255;

/// Minimum password length.
pub const PASSWORD_MIN_LEN: u64 = 6;

/// Email address pattern. Local part allows word characters plus `+-.`,
/// the domain is dot-separated labels of letters/digits/hyphens with an
/// alphabetic final label.
#[allow(clippy::expect_used)]
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\w+\-.]+@[a-z\d\-]+(\.[a-z\d\-]+)*\.[a-z]+$").expect("valid email regex")
});

/// Which stored digest a token is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestKind {
    /// One-time account activation token.
    Activation,
    /// Persistent-login token.
    Remember,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// A freshly signed-up user together with the plaintext activation token.
///
/// The token is returned exactly once so the caller can hand it to the
/// mailer collaborator; only its digest is persisted.
#[derive(Debug)]
pub struct Signup {
    pub user: user::Model,
    pub activation_token: String,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(
        length(min = 1, max = NAME_MAX_LEN),
        custom(function = validate_not_blank)
    )]
    pub name: String,

    #[validate(length(min = 3, max = EMAIL_MAX_LEN), regex(path = *EMAIL_REGEX))]
    pub email: String,

    #[validate(length(min = PASSWORD_MIN_LEN, max = 128))]
    pub password: String,

    /// Must match `password`; checked in [`UserService::create`].
    pub password_confirmation: String,
}

/// Input for updating a user's profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(
        length(min = 1, max = NAME_MAX_LEN),
        custom(function = validate_not_blank)
    )]
    pub name: Option<String>,

    #[validate(length(min = 3, max = EMAIL_MAX_LEN), regex(path = *EMAIL_REGEX))]
    pub email: Option<String>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user.
    ///
    /// The user starts unactivated; the returned [`Signup`] carries the
    /// plaintext activation token for the mailer collaborator.
    pub async fn create(&self, input: SignupInput) -> AppResult<Signup> {
        input.validate()?;

        if input.password != input.password_confirmation {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("confirmation");
            error.message = Some("doesn't match password".into());
            errors.add("password_confirmation", error);
            return Err(AppError::Validation(errors));
        }

        // Email uniqueness is case-insensitive
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("unique");
            error.message = Some("has already been taken".into());
            errors.add("email", error);
            return Err(AppError::Validation(errors));
        }

        let password_digest = hash_secret(&input.password)?;
        let activation_token = self.id_gen.generate_token();
        let activation_digest = hash_secret(&activation_token)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            email: Set(input.email.clone()),
            email_lower: Set(input.email.to_lowercase()),
            password_digest: Set(password_digest),
            activated: Set(false),
            activation_digest: Set(Some(activation_digest)),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, "Created user");

        Ok(Signup {
            user,
            activation_token,
        })
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_email(email).await
    }

    /// List users (paginated, newest first).
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all(limit, offset).await
    }

    /// Authenticate a user by email and password.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_secret(password, &user.password_digest)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Check a plaintext token against one of the user's stored digests.
    ///
    /// Returns false (not an error) when no digest of that kind is stored,
    /// even for an empty token.
    pub fn verify_token(
        &self,
        user: &user::Model,
        kind: DigestKind,
        token: &str,
    ) -> AppResult<bool> {
        let digest = match kind {
            DigestKind::Activation => user.activation_digest.as_deref(),
            DigestKind::Remember => user.remember_digest.as_deref(),
        };

        match digest {
            Some(digest) => verify_secret(token, digest),
            None => Ok(false),
        }
    }

    /// Issue a persistent-login token, storing its digest.
    pub async fn remember(&self, user_id: &str) -> AppResult<String> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let token = self.id_gen.generate_token();
        let digest = hash_secret(&token)?;

        let mut active: user::ActiveModel = user.into();
        active.remember_digest = Set(Some(digest));
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        self.user_repo.update(active).await?;

        Ok(token)
    }

    /// Clear the persistent-login digest.
    pub async fn forget(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.remember_digest = Set(None);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        self.user_repo.update(active).await?;

        Ok(())
    }

    /// Update a user's profile.
    pub async fn update_profile(
        &self,
        id: &str,
        input: UpdateUserInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(id).await?;

        if let Some(ref email) = input.email
            && email.to_lowercase() != user.email_lower
            && self.user_repo.find_by_email(email).await?.is_some()
        {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("unique");
            error.message = Some("has already been taken".into());
            errors.add("email", error);
            return Err(AppError::Validation(errors));
        }

        let mut active: user::ActiveModel = user.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(email) = input.email {
            active.email_lower = Set(email.to_lowercase());
            active.email = Set(email);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Delete a user and everything it owns.
    ///
    /// Owned microposts and relationships in either direction go with the
    /// user, in one transaction.
    pub async fn destroy(&self, id: &str) -> AppResult<()> {
        // Surface UserNotFound before attempting the cascade
        let user = self.user_repo.get_by_id(id).await?;

        self.user_repo.delete_with_dependents(&user.id).await?;
        tracing::info!(user_id = %user.id, "Deleted user");

        Ok(())
    }
}
