//! Edit requests.

use crate::common::detection::DocumentKind;
use crate::ooxml::metadata::{EditSet, FieldValue};

/// One metadata edit: the document, what it claims to be, and what to change.
///
/// The request borrows the document bytes; the editor never copies them.
#[derive(Debug, Clone)]
pub struct EditRequest<'a> {
    bytes: &'a [u8],
    kind: DocumentKind,
    edits: EditSet,
    caller: Option<String>,
}

impl<'a> EditRequest<'a> {
    /// Create a request with no edits.
    ///
    /// # Arguments
    /// * `bytes` - The uploaded package
    /// * `kind` - The kind the caller declared for it
    pub fn new(bytes: &'a [u8], kind: DocumentKind) -> Self {
        Self {
            bytes,
            kind,
            edits: EditSet::new(),
            caller: None,
        }
    }

    /// Replace the edit set.
    pub fn with_edits(mut self, edits: EditSet) -> Self {
        self.edits = edits;
        self
    }

    /// Add one field assignment.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.edits.push(name, value);
        self
    }

    /// Record the authenticated caller, for logging only.
    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    #[inline]
    pub fn edits(&self) -> &EditSet {
        &self.edits
    }

    #[inline]
    pub fn caller(&self) -> Option<&str> {
        self.caller.as_deref()
    }
}
