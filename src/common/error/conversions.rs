//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;
use crate::ooxml::error::OoxmlError;
use crate::ooxml::opc::error::OpcError;
use zip::result::ZipError;

// Package-level failures while opening or reading parts
impl From<OpcError> for Error {
    fn from(err: OpcError) -> Self {
        Error::CorruptPackage(err.to_string())
    }
}

impl From<OoxmlError> for Error {
    fn from(err: OoxmlError) -> Self {
        match err {
            OoxmlError::Opc(e) => Error::from(e),
            OoxmlError::Xml(reason) => Error::MalformedMetadataXml {
                part: "<unknown>".to_string(),
                reason,
            },
            OoxmlError::MalformedPart { part, reason } => {
                Error::MalformedMetadataXml { part, reason }
            },
            OoxmlError::PartNotFound(s) => Error::MetadataPartMissing(s),
            OoxmlError::UnsupportedField(name) => Error::UnsupportedField(name),
            OoxmlError::InvalidValue { field, reason } => Error::InvalidFieldValue { field, reason },
            OoxmlError::InvalidFormat(s) => Error::CorruptPackage(s),
        }
    }
}

impl Error {
    /// Map a failure of the package writer.
    ///
    /// An entry that cannot be raw-copied because its header is damaged is a
    /// property of the input; everything else is a write failure.
    pub(crate) fn from_write_error(err: OpcError) -> Self {
        match err {
            OpcError::ZipError(ZipError::InvalidArchive(_))
            | OpcError::ZipError(ZipError::UnsupportedArchive(_)) => {
                Error::CorruptPackage(err.to_string())
            },
            other => Error::WriteFailure(other.to_string()),
        }
    }
}
