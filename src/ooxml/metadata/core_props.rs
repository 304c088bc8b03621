//! Core properties (`docProps/core.xml`).

use crate::ooxml::error::Result;
use crate::ooxml::metadata::fields::CoreField;
use crate::ooxml::metadata::value::{FieldValue, MetadataFieldMap, parse_timestamp};
use crate::ooxml::metadata::xml::{LeafEdit, LeafValue, PropertyPart, rewrite_leaves};
use crate::ooxml::opc::constants::namespace as ns;

/// Local name of the core properties root element.
const ROOT: &str = "coreProperties";

/// Read the recognized core fields of a core properties part.
///
/// Timestamp fields that parse are reported as timestamps; everything else as
/// text. Elements outside the recognized schema are skipped.
pub fn read_core(xml: &[u8], partname: &str) -> Result<MetadataFieldMap> {
    let part = PropertyPart::scan(xml).map_err(|e| e.in_part(partname))?;
    part.expect_root(ns::CORE_PROPERTIES, ROOT)
        .map_err(|e| e.in_part(partname))?;

    let mut map = MetadataFieldMap::new();
    for child in &part.children {
        let Some(namespace) = child.element.namespace.as_deref() else {
            continue;
        };
        let Some(field) = CoreField::from_qualified(namespace, &child.element.local_name) else {
            continue;
        };
        let Some(text) = child.element.text.as_deref() else {
            continue;
        };

        let value = match parse_timestamp(text) {
            Some(dt) if field.is_timestamp() => FieldValue::DateTime(dt),
            _ => FieldValue::Text(text.to_string()),
        };
        map.insert(field.key(), value);
    }
    Ok(map)
}

/// Apply core field edits.
///
/// Timestamp fields expect [`FieldValue::DateTime`]; any other value is
/// written as its text form.
pub fn apply_core(xml: &[u8], partname: &str, edits: &[(CoreField, FieldValue)]) -> Result<Vec<u8>> {
    let leaf_edits: Vec<LeafEdit> = edits
        .iter()
        .map(|(field, value)| LeafEdit {
            namespace: field.namespace(),
            local_name: field.local_name(),
            preferred_prefix: field.preferred_prefix(),
            w3cdtf: field.is_w3cdtf(),
            value: match value {
                FieldValue::DateTime(dt) if field.is_timestamp() => LeafValue::Timestamp(*dt),
                other => LeafValue::Text(other.to_xml_string()),
            },
        })
        .collect();

    rewrite_leaves(xml, ns::CORE_PROPERTIES, ROOT, &leaf_edits).map_err(|e| e.in_part(partname))
}
