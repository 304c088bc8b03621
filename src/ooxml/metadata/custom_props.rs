//! Custom properties (`docProps/custom.xml`).
//!
//! Each property is a `<property fmtid=".." pid=".." name="..">` element
//! holding exactly one variant-typed value such as `<vt:lpwstr>`.

use crate::common::xml::{Splicer, escape_xml};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::metadata::value::{FieldValue, MetadataFieldMap, format_timestamp};
use crate::ooxml::metadata::xml::{Child, PropertyPart};
use crate::ooxml::opc::constants::namespace as ns;
use tracing::debug;

/// Local name of the custom properties root element.
const ROOT: &str = "Properties";

/// Format ID that Office writes on every user-defined property.
pub const FORMAT_ID: &str = "{D5CDD505-2E9C-101B-9397-08002B2CF9AE}";

/// Lowest property id available to user-defined properties.
const FIRST_PID: i32 = 2;

/// Serialized form of a custom properties part with no properties.
pub const EMPTY_CUSTOM_PART: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\r\n",
    r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/custom-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"/>"#
);

/// Read the custom properties of a part, keyed by property name.
///
/// Properties whose value is a vector, blob or other non-scalar type are
/// skipped. A scalar whose text does not parse as its declared type is
/// reported as text.
pub fn read_custom(xml: &[u8], partname: &str) -> Result<MetadataFieldMap> {
    let part = PropertyPart::scan(xml).map_err(|e| e.in_part(partname))?;
    part.expect_root(ns::CUSTOM_PROPERTIES, ROOT)
        .map_err(|e| e.in_part(partname))?;

    let mut map = MetadataFieldMap::new();
    for child in part.children_named(ns::CUSTOM_PROPERTIES, "property") {
        let Some(name) = child.element.attribute("name") else {
            continue;
        };
        let Some(value_element) = child.first_child.as_ref() else {
            continue;
        };
        let Some(text) = value_element.text.as_deref() else {
            continue;
        };
        if value_element.namespace.as_deref() != Some(ns::VTYPES) {
            continue;
        }

        match FieldValue::from_xml_string(&value_element.local_name, text) {
            Ok(value) => map.insert(name, value),
            Err(OoxmlError::InvalidValue { .. }) => {
                map.insert(name, FieldValue::Text(text.to_string()))
            },
            Err(e) => debug!("Skipping custom property {}: {}", name, e),
        }
    }
    Ok(map)
}

/// Apply custom property edits.
///
/// An existing property keeps its variant type when a text value parses as
/// that type; otherwise the value's own type is written. New properties get
/// the next free `pid` and are appended in edit order.
pub fn apply_custom(xml: &[u8], partname: &str, edits: &[(String, FieldValue)]) -> Result<Vec<u8>> {
    let part = PropertyPart::scan(xml).map_err(|e| e.in_part(partname))?;
    part.expect_root(ns::CUSTOM_PROPERTIES, ROOT)
        .map_err(|e| e.in_part(partname))?;

    let properties: Vec<&Child> = part
        .children_named(ns::CUSTOM_PROPERTIES, "property")
        .collect();
    let mut next_pid = match properties
        .iter()
        .filter_map(|c| c.element.attribute("pid"))
        .filter_map(|pid| pid.trim().parse::<i32>().ok())
        .max()
    {
        Some(max) => max.checked_add(1).map(|pid| pid.max(FIRST_PID)),
        None => Some(FIRST_PID),
    };

    let mut splicer = Splicer::new();
    let mut appended = String::new();

    for (name, value) in edits {
        let mut found = false;
        for child in properties
            .iter()
            .filter(|c| c.element.attribute("name") == Some(name.as_str()))
        {
            found = true;
            let previous = child
                .first_child
                .as_ref()
                .filter(|v| v.namespace.as_deref() == Some(ns::VTYPES));
            let value = match (value, previous) {
                (FieldValue::Text(s), Some(prev)) if prev.local_name != "lpwstr" => {
                    FieldValue::from_xml_string(&prev.local_name, s)
                        .unwrap_or_else(|_| value.clone())
                },
                _ => value.clone(),
            };
            let like = previous
                .filter(|prev| prev.local_name == "filetime")
                .and_then(|prev| prev.text.as_deref());
            let content = value_xml(&part, &value, like);
            part.replace_content(&mut splicer, child, content)
                .map_err(|e| e.in_part(partname))?;
        }

        if !found {
            let pid = next_pid.ok_or_else(|| OoxmlError::InvalidValue {
                field: format!("custom:{}", name),
                reason: format!("no property id left in {}", partname),
            })?;
            let (qname, decl) = part.qualified_name(ns::CUSTOM_PROPERTIES, "property", "op");
            appended.push_str(&format!(
                r#"<{qname}{decl} fmtid="{}" pid="{}" name="{}">{}</{qname}>"#,
                FORMAT_ID,
                pid,
                escape_xml(name),
                value_xml(&part, value, None),
            ));
            next_pid = pid.checked_add(1);
        }
    }

    part.append(&mut splicer, appended);
    Ok(splicer.apply(xml))
}

/// Serialize a value as its variant-type element.
fn value_xml(part: &PropertyPart<'_>, value: &FieldValue, like: Option<&str>) -> String {
    let element = value.element_name();
    let (qname, decl) = part.qualified_name(ns::VTYPES, element, "vt");
    let text = match value {
        FieldValue::DateTime(dt) => format_timestamp(dt, like),
        other => other.to_xml_string(),
    };
    format!("<{qname}{decl}>{}</{qname}>", escape_xml(&text))
}
