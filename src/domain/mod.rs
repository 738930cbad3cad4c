//! # Domain Layer
//!
//! Conversation models, model configuration and the error type.
//! This layer is independent of the HTTP client and the web framework.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
