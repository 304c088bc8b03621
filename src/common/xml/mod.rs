//! XML text helpers shared by the manifest and metadata rewriters.

pub mod escape;
pub mod splice;

pub use escape::{escape_xml, resolve_reference, unescape_xml};
pub use splice::Splicer;
