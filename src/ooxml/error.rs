/// Error types for OOXML operations.
use thiserror::Error;

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for OOXML operations.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// XML parsing error, not yet attributed to a part
    #[error("XML error: {0}")]
    Xml(String),

    /// A metadata part could not be parsed
    #[error("Malformed part {part}: {reason}")]
    MalformedPart { part: String, reason: String },

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Field name outside the recognized schema
    #[error("Unsupported field: {0}")]
    UnsupportedField(String),

    /// Field value that cannot be stored in the field's type
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl OoxmlError {
    /// Attribute a bare XML error to the part it came from.
    pub fn in_part(self, part: &str) -> Self {
        match self {
            OoxmlError::Xml(reason) => OoxmlError::MalformedPart {
                part: part.to_string(),
                reason,
            },
            other => other,
        }
    }
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for OoxmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}
