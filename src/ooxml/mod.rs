//! Office Open XML (OOXML) packaging and metadata.
//!
//! # Architecture
//!
//! The module is organized into two layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, content types,
//!    relationships, re-emission)
//! 2. **Metadata Layer** (`metadata`): Locating, reading and rewriting the
//!    core, application and custom property parts
//!
//! # Example: Reading core properties directly
//!
//! ```rust,no_run
//! use docmeta::ooxml::metadata::{locate_metadata_parts, read_metadata};
//! use docmeta::ooxml::opc::OpcPackage;
//! use docmeta::DocumentKind;
//!
//! let bytes = std::fs::read("document.docx")?;
//! let pkg = OpcPackage::open(&bytes, 16 << 20)?;
//! let parts = locate_metadata_parts(&pkg)?;
//! let meta = read_metadata(&pkg, &parts, DocumentKind::WordProcessing)?;
//! println!("title: {:?}", meta.core.text("title"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod metadata;
pub mod opc;

pub use error::{OoxmlError, Result};
