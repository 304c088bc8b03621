//! OOXML document kind detection.

use crate::common::detection::DocumentKind;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::error::Result;

/// What a package's main document part says about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainPartKind {
    /// Content type of the main document part
    pub content_type: String,
    /// The kind that content type belongs to, if any
    pub kind: Option<DocumentKind>,
}

/// Detect the document kind from the main document part's content type.
///
/// The main part is the target of the package-level `officeDocument`
/// relationship. A main part with no content-type entry reports an empty
/// content type and no kind.
pub fn detect_document_kind(package: &OpcPackage<'_>) -> Result<MainPartKind> {
    let partname = package.main_document_partname()?;
    let content_type = package
        .content_type(&partname)
        .unwrap_or_default()
        .to_string();
    let kind = DocumentKind::from_main_content_type(&content_type);
    Ok(MainPartKind { content_type, kind })
}
