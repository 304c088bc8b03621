//! Application properties (`docProps/app.xml`).
//!
//! Besides the editable fields, the part carries document statistics
//! (`Pages`, `Words`, `Slides`, ...) that Office recomputes on save. Those are
//! reported under their element names and never written.

use crate::ooxml::error::Result;
use crate::ooxml::metadata::fields::AppField;
use crate::ooxml::metadata::value::{FieldValue, MetadataFieldMap};
use crate::ooxml::metadata::xml::{LeafEdit, LeafValue, PropertyPart, rewrite_leaves};
use crate::ooxml::opc::constants::namespace as ns;

/// Local name of the application properties root element.
const ROOT: &str = "Properties";

/// Serialized form of an application properties part with no fields.
pub const EMPTY_APP_PART: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\r\n",
    r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"/>"#
);

/// Read the textual fields of an application properties part.
///
/// Elements with element content (`HeadingPairs`, `TitlesOfParts`) are skipped.
pub fn read_app(xml: &[u8], partname: &str) -> Result<MetadataFieldMap> {
    let part = PropertyPart::scan(xml).map_err(|e| e.in_part(partname))?;
    part.expect_root(ns::EXTENDED_PROPERTIES, ROOT)
        .map_err(|e| e.in_part(partname))?;

    let mut map = MetadataFieldMap::new();
    for child in part.children.iter().filter(|c| {
        c.element.namespace.as_deref() == Some(ns::EXTENDED_PROPERTIES)
    }) {
        let Some(text) = child.element.text.as_deref() else {
            continue;
        };
        let name = &child.element.local_name;
        match AppField::from_local_name(name) {
            Some(field) => map.insert(field.key(), FieldValue::Text(text.to_string())),
            None => map.insert(name.as_str(), FieldValue::Text(text.to_string())),
        }
    }
    Ok(map)
}

/// Apply application field edits.
pub fn apply_app(xml: &[u8], partname: &str, edits: &[(AppField, String)]) -> Result<Vec<u8>> {
    let leaf_edits: Vec<LeafEdit> = edits
        .iter()
        .map(|(field, value)| LeafEdit {
            namespace: ns::EXTENDED_PROPERTIES,
            local_name: field.local_name(),
            preferred_prefix: "ep",
            w3cdtf: false,
            value: LeafValue::Text(value.clone()),
        })
        .collect();

    rewrite_leaves(xml, ns::EXTENDED_PROPERTIES, ROOT, &leaf_edits)
        .map_err(|e| e.in_part(partname))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PART: &str = "/docProps/app.xml";
    const APP: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Template>Normal.dotm</Template><Pages>2</Pages><Application>Microsoft Office Word</Application><HeadingPairs><vt:vector size="2" baseType="variant"><vt:variant><vt:lpstr>Title</vt:lpstr></vt:variant><vt:variant><vt:i4>1</vt:i4></vt:variant></vt:vector></HeadingPairs><Company>Acme</Company></Properties>"#;

    #[test]
    fn test_read_app() {
        let map = read_app(APP.as_bytes(), PART).unwrap();
        assert_eq!(map.text("template"), Some("Normal.dotm"));
        assert_eq!(map.text("Pages"), Some("2"));
        assert_eq!(map.text("application"), Some("Microsoft Office Word"));
        assert_eq!(map.text("company"), Some("Acme"));
        assert!(map.get("HeadingPairs").is_none());
    }

    #[test]
    fn test_apply_app() {
        let out = apply_app(
            APP.as_bytes(),
            PART,
            &[
                (AppField::Company, "Globex & Co".to_string()),
                (AppField::Manager, "M. Burns".to_string()),
            ],
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("<Company>Globex &amp; Co</Company>"));
        assert!(out.ends_with("<Manager>M. Burns</Manager></Properties>"));
        assert!(out.contains("<vt:lpstr>Title</vt:lpstr>"));
    }

    #[test]
    fn test_empty_template() {
        let out = apply_app(
            EMPTY_APP_PART.as_bytes(),
            PART,
            &[(AppField::Company, "Acme".to_string())],
        )
        .unwrap();
        let map = read_app(&out, PART).unwrap();
        assert_eq!(map.text("company"), Some("Acme"));
        assert_eq!(map.len(), 1);
    }
}
