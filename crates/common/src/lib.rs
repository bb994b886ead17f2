//! Common utilities and shared types for microblog-rs.
//!
//! This crate provides foundational components used across all microblog-rs
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Credential digests**: Salted hashing for passwords and one-time tokens
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use microblog_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod digest;
pub mod error;
pub mod id;

pub use config::Config;
pub use digest::{hash_secret, verify_secret};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
