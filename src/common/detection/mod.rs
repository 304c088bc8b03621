//! Document kind detection.
//!
//! A package's kind is decided by the content type of its main document part,
//! not by file name or upload headers; those only supply the declared kind the
//! package is checked against.

// Submodule declarations
pub mod ooxml;
pub mod types;

// Re-exports
pub use ooxml::{MainPartKind, detect_document_kind};
pub use types::DocumentKind;
