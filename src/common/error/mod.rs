//! Unified error types for docmeta.
//!
//! This module provides the error taxonomy every public operation reports,
//! presenting a consistent API over the package and metadata layers.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
