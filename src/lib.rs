//! docmeta - metadata rewriting for Office Open XML documents
//!
//! This library opens word-processing (.docx), presentation (.pptx) and
//! spreadsheet (.xlsx) packages, reads or rewrites their metadata parts, and
//! re-emits a package in which every other entry is byte-for-byte unchanged.
//!
//! # Features
//!
//! - **Core properties**: title, author, last modified by, timestamps, ...
//! - **Application properties**: company, manager, template, ...
//! - **Custom properties**: typed user-defined properties, created on demand
//! - **Faithful output**: untouched entries are raw-copied, the metadata XML is
//!   spliced rather than re-serialized, and namespaces are resolved by URI
//! - **Typed failures**: every error is one [`Error`] kind
//!
//! # Example - Replacing the author fields
//!
//! ```no_run
//! use docmeta::{DocumentKind, EditRequest, EditSet, MetadataEditor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = std::fs::read("budget.xlsx")?;
//! let edits = EditSet::from_author_fields(Some("Finance Team"), Some("Finance Team"));
//!
//! let output = MetadataEditor::from_env()
//!     .edit(&EditRequest::new(&input, DocumentKind::Spreadsheet).with_edits(edits))?;
//! std::fs::write("budget.xlsx", output)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Inspecting metadata
//!
//! ```no_run
//! use docmeta::{DocumentKind, MetadataEditor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = std::fs::read("deck.pptx")?;
//! let meta = MetadataEditor::default().inspect(&input, DocumentKind::Presentation)?;
//!
//! println!("author: {:?}", meta.author());
//! for (name, value) in meta.custom.iter() {
//!     println!("custom {} = {:?}", name, value);
//! }
//! # Ok(())
//! # }
//! ```

/// Shared types: document kinds, the error taxonomy, XML helpers
pub mod common;

/// Metadata edit orchestration
pub mod editor;

/// OOXML packaging and metadata parts
///
/// The `opc` submodule reads and re-emits packages; the `metadata` submodule
/// reads and rewrites the property parts.
pub mod ooxml;

#[cfg(test)]
mod test_fixtures;

// Re-export commonly used types for convenience
pub use common::{DocumentKind, Error, Result};
pub use editor::{EditRequest, EditStage, EditorConfig, MetadataEditor};
pub use ooxml::metadata::{
    DocumentMetadata, EditSet, FieldName, FieldValue, MetadataFieldMap, UnknownFieldPolicy,
};
