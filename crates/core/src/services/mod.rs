//! Business logic services.

#![allow(missing_docs)]

pub mod activation;
pub mod following;
pub mod micropost;
pub mod user;

pub use activation::{
    ActivationFailure, ActivationOutcome, ActivationService, SessionEstablisher,
    INVALID_ACTIVATION_MESSAGE,
};
pub use following::FollowingService;
pub use micropost::{CreateMicropostInput, MicropostService, CONTENT_MAX_LEN};
pub use user::{
    DigestKind, Signup, SignupInput, UpdateUserInput, UserService, EMAIL_MAX_LEN, NAME_MAX_LEN,
    PASSWORD_MIN_LEN,
};
