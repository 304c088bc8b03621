/// Open Packaging Conventions (OPC) implementation.
///
/// This module covers the parts of OPC a metadata rewrite needs:
///
/// - ZIP-based physical packaging with on-demand decompression
/// - Content type and package relationship manifests
/// - Re-emission of a package with replaced or added parts, raw-copying
///   every untouched entry
///
/// # Performance Features
///
/// - Uses `atoi_simd` for fast relationship id parsing
/// - Uses `quick-xml` for streaming XML parsing
/// - Borrows the package bytes instead of copying them

pub mod constants;
pub mod error;
pub mod manifest;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use error::{OpcError, Result};
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::Part;
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
