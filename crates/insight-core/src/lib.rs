//! # insight-core
//!
//! Core types, traits, and validation for the InsightBoard dependency engine.
//!
//! This crate provides the data model shared by every other crate, the
//! store and extraction traits, and the pure validation steps that turn
//! untrusted extraction output into a sanitized task graph.

pub mod defaults;
pub mod dependency;
pub mod error;
pub mod hashing;
pub mod logging;
pub mod models;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use dependency::{detect_cycles, sanitize_and_detect};
pub use error::{Error, Result};
pub use hashing::content_hash;
pub use models::*;
pub use traits::*;
pub use validation::shape_filter;
