//! Common types and utilities shared across the crate.
//!
//! This module provides the document kind, the unified error type, and the
//! XML escaping and splicing helpers used by the metadata layer.

// Submodule declarations
pub mod detection;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use detection::{DocumentKind, detect_document_kind};
pub use error::{Error, Result};
