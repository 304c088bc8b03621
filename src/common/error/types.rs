//! Unified error type for metadata operations.
//!
//! Every failure of an edit or inspection is reported as one of these kinds.
//! The lower layers keep their own error enums; see `conversions` for how
//! they map onto this taxonomy.
use crate::common::detection::DocumentKind;
use thiserror::Error;

/// Main error type for docmeta operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input is not a readable OOXML package
    #[error("Corrupt package: {0}")]
    CorruptPackage(String),

    /// The package's main document part does not match the declared kind
    #[error("Unexpected format: declared {declared}, main document part is '{actual}'")]
    UnexpectedFormat {
        declared: DocumentKind,
        actual: String,
    },

    /// The package has no core properties part
    #[error("Metadata part missing: {0}")]
    MetadataPartMissing(String),

    /// A metadata part could not be parsed
    #[error("Malformed metadata XML in {part}: {reason}")]
    MalformedMetadataXml { part: String, reason: String },

    /// Field name outside the recognized schema
    #[error("Unsupported field: {0}")]
    UnsupportedField(String),

    /// Field value that the field cannot hold
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidFieldValue { field: String, reason: String },

    /// The output package could not be produced
    #[error("Write failure: {0}")]
    WriteFailure(String),
}

impl Error {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Error::CorruptPackage(_) => "corrupt_package",
            Error::UnexpectedFormat { .. } => "unexpected_format",
            Error::MetadataPartMissing(_) => "metadata_part_missing",
            Error::MalformedMetadataXml { .. } => "malformed_metadata_xml",
            Error::UnsupportedField(_) => "unsupported_field",
            Error::InvalidFieldValue { .. } => "invalid_field_value",
            Error::WriteFailure(_) => "write_failure",
        }
    }
}

/// Result type for docmeta operations.
pub type Result<T> = std::result::Result<T, Error>;
