//! # Connector Layer
//!
//! External integrations implementing application ports:
//! - Model clients (Gemini over HTTP, offline mock)
//! - Prompt file and in-memory session storage
//! - Hosting shells (web UI, terminal) and their wiring

pub mod adapter;
pub mod api;
pub mod web;

pub use adapter::*;
pub use api::*;
