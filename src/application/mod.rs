//! # Application Layer
//!
//! Use cases and the ports they depend on. Shells (web, terminal) drive the
//! use cases; connectors implement the ports.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
