//! Core business logic for microblog-rs.

pub mod services;

pub use services::*;
