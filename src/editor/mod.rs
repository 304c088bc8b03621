//! Metadata edit orchestration.
//!
//! [`MetadataEditor`] is the public entry point: it checks the declared
//! document kind, then drives the package reader, the metadata part locator,
//! the transformer and the package writer in sequence. A request either
//! produces a complete output package or fails with one typed [`Error`];
//! nothing is written until every stage has succeeded.
//!
//! # Example
//!
//! ```no_run
//! use docmeta::{DocumentKind, EditRequest, MetadataEditor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = std::fs::read("report.docx")?;
//! let editor = MetadataEditor::default();
//!
//! let request = EditRequest::new(&input, DocumentKind::WordProcessing)
//!     .set("author", "Ada Lovelace")
//!     .set("last_modified_by", "Charles Babbage");
//! let output = editor.edit(&request)?;
//!
//! std::fs::write("report.edited.docx", output)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod request;

pub use config::EditorConfig;
pub use request::EditRequest;

use crate::common::detection::{DocumentKind, detect_document_kind};
use crate::common::error::{Error, Result};
use crate::ooxml::metadata::{DocumentMetadata, locate_metadata_parts, read_metadata, transform};
use crate::ooxml::opc::{OpcError, OpcPackage, PackageWriter};
use std::fmt;
use tracing::{debug, instrument, warn};

/// Stages an edit request moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStage {
    Received,
    Opened,
    Located,
    Transformed,
    Written,
    Complete,
}

impl fmt::Display for EditStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EditStage::Received => "received",
            EditStage::Opened => "opened",
            EditStage::Located => "located",
            EditStage::Transformed => "transformed",
            EditStage::Written => "written",
            EditStage::Complete => "complete",
        })
    }
}

/// Rewrites and inspects the metadata of OOXML packages.
///
/// The editor holds configuration only, so one instance can serve any number
/// of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct MetadataEditor {
    config: EditorConfig,
}

impl MetadataEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self { config }
    }

    /// Editor configured from `DOCMETA_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(EditorConfig::from_env())
    }

    #[inline]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Apply an edit request and return the rewritten package.
    ///
    /// # Errors
    /// - [`Error::UnsupportedField`] / [`Error::InvalidFieldValue`] for a bad
    ///   edit set, before the package is opened
    /// - [`Error::CorruptPackage`] when the input is not a readable package
    /// - [`Error::UnexpectedFormat`] when the package is not of the declared kind
    /// - [`Error::MetadataPartMissing`] when there is no core properties part
    /// - [`Error::MalformedMetadataXml`] when a property part does not parse
    /// - [`Error::WriteFailure`] when the output cannot be produced
    #[instrument(
        name = "edit_metadata",
        skip_all,
        fields(
            kind = %request.kind(),
            caller = request.caller().unwrap_or("-"),
            input_len = request.bytes().len(),
        )
    )]
    pub fn edit(&self, request: &EditRequest<'_>) -> Result<Vec<u8>> {
        self.run_edit(request).inspect_err(|e| {
            warn!(code = e.code(), "Metadata edit failed: {}", e);
        })
    }

    /// Read the metadata of a package without changing it.
    #[instrument(
        name = "inspect_metadata",
        skip_all,
        fields(kind = %kind, input_len = bytes.len())
    )]
    pub fn inspect(&self, bytes: &[u8], kind: DocumentKind) -> Result<DocumentMetadata> {
        stage(EditStage::Received);
        let package = self.open(bytes, kind)?;
        stage(EditStage::Opened);
        let parts = locate_metadata_parts(&package)?;
        stage(EditStage::Located);
        let metadata = read_metadata(&package, &parts, kind)?;
        stage(EditStage::Complete);
        Ok(metadata)
    }

    fn run_edit(&self, request: &EditRequest<'_>) -> Result<Vec<u8>> {
        stage(EditStage::Received);
        let edits = request.edits().resolve(self.config.unknown_fields)?;

        let package = self.open(request.bytes(), request.kind())?;
        stage(EditStage::Opened);

        let parts = locate_metadata_parts(&package)?;
        stage(EditStage::Located);

        let replaced = transform(&package, &parts, &edits)?;
        debug!(
            stage = %EditStage::Transformed,
            parts = replaced.len(),
            "Metadata request stage"
        );

        let output = PackageWriter::to_bytes(&package, &replaced).map_err(Error::from_write_error)?;
        debug!(
            stage = %EditStage::Written,
            output_len = output.len(),
            "Metadata request stage"
        );

        stage(EditStage::Complete);
        Ok(output)
    }

    /// Open a package and check it against the declared kind.
    fn open<'data>(&self, bytes: &'data [u8], declared: DocumentKind) -> Result<OpcPackage<'data>> {
        let package = OpcPackage::open(bytes, self.config.max_part_bytes)?;
        // A sound archive without a main document is not an office document.
        let main = match detect_document_kind(&package) {
            Ok(main) => main,
            Err(OpcError::RelationshipNotFound(_)) => {
                return Err(Error::UnexpectedFormat {
                    declared,
                    actual: String::new(),
                });
            },
            Err(e) => return Err(e.into()),
        };

        match main.kind {
            Some(kind) if kind == declared => Ok(package),
            _ => Err(Error::UnexpectedFormat {
                declared,
                actual: main.content_type,
            }),
        }
    }
}

#[inline]
fn stage(stage: EditStage) {
    debug!(stage = %stage, "Metadata request stage");
}
