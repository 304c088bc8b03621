//! In-place updates of the package manifests.
//!
//! When a property part is added to a package it needs an `Override` in
//! `[Content_Types].xml` and a `Relationship` in `_rels/.rels`. Both are
//! appended as the last child of the manifest root; the rest of the manifest
//! is emitted byte for byte.

use crate::common::xml::{Splicer, escape_xml};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;

/// Add an `Override` entry for `partname` to a content-types manifest.
pub fn add_content_type_override(
    content_types_xml: &[u8],
    partname: &PackURI,
    content_type: &str,
) -> Result<Vec<u8>> {
    append_to_root(content_types_xml, |prefix| {
        format!(
            r#"<{prefix}Override PartName="{}" ContentType="{}"/>"#,
            escape_xml(partname.as_str()),
            escape_xml(content_type)
        )
    })
}

/// Add an internal `Relationship` entry to a relationships part.
pub fn add_relationship(
    rels_xml: &[u8],
    r_id: &str,
    reltype: &str,
    target_ref: &str,
) -> Result<Vec<u8>> {
    append_to_root(rels_xml, |prefix| {
        format!(
            r#"<{prefix}Relationship Id="{}" Type="{}" Target="{}"/>"#,
            escape_xml(r_id),
            escape_xml(reltype),
            escape_xml(target_ref)
        )
    })
}

/// Insert a child element just before the root end tag.
///
/// `fragment` receives the root's prefix including the colon (or an empty
/// string) so the child lands in the root's namespace.
fn append_to_root(xml: &[u8], fragment: impl FnOnce(&str) -> String) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut depth = 0usize;
    let mut root_name: Option<String> = None;
    let mut splicer = Splicer::new();

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 {
                    root_name = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
                depth += 1;
            },
            Ok(Event::Empty(e)) if depth == 0 => {
                // <Types .../> has to be reopened to take a child.
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let end = reader.buffer_position() as usize;
                let child = fragment(&prefix_of(&name));
                splicer.replace(end - 2..end, format!(">{}</{}>", child, name));
                return Ok(splicer.apply(xml));
            },
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let name = root_name.take().unwrap_or_default();
                    splicer.insert(start, fragment(&prefix_of(&name)));
                    return Ok(splicer.apply(xml));
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OpcError::XmlError(e.to_string())),
            _ => {},
        }
    }

    Err(OpcError::XmlError(
        "Manifest has no closed root element".to_string(),
    ))
}

/// "ct:Types" -> "ct:", "Types" -> "".
fn prefix_of(qname: &str) -> String {
    match qname.split_once(':') {
        Some((prefix, _)) => format!("{}:", prefix),
        None => String::new(),
    }
}
