//! Parsers for the two manifest parts every OPC package carries.
//!
//! `[Content_Types].xml` maps part names and extensions to content types, and
//! `_rels/.rels` lists the package-level relationships.

use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Content type map for looking up content types by part name or extension.
///
/// Implements the OPC content type discovery algorithm using Default and Override
/// elements. Keys are lowercased because part names compare case-insensitively.
#[derive(Debug, Default)]
pub struct ContentTypeMap {
    /// Maps file extensions to default content types
    defaults: HashMap<String, String>,

    /// Maps specific partnames to override content types
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Parse content types from [Content_Types].xml.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::default();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut saw_root = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match e.local_name().as_ref() {
                        b"Types" => saw_root = true,
                        b"Default" => {
                            // <Default Extension="xml" ContentType="application/xml"/>
                            let mut extension = None;
                            let mut content_type = None;

                            for attr in e.attributes() {
                                let attr = attr?;
                                match attr.key.as_ref() {
                                    b"Extension" => {
                                        extension = Some(attr.unescape_value()?.to_string());
                                    },
                                    b"ContentType" => {
                                        content_type = Some(attr.unescape_value()?.to_string());
                                    },
                                    _ => {},
                                }
                            }

                            if let (Some(ext), Some(ct)) = (extension, content_type) {
                                map.add_default(&ext, ct);
                            }
                        },
                        b"Override" => {
                            // <Override PartName="/docProps/core.xml" ContentType="..."/>
                            let mut partname = None;
                            let mut content_type = None;

                            for attr in e.attributes() {
                                let attr = attr?;
                                match attr.key.as_ref() {
                                    b"PartName" => {
                                        partname = Some(attr.unescape_value()?.to_string());
                                    },
                                    b"ContentType" => {
                                        content_type = Some(attr.unescape_value()?.to_string());
                                    },
                                    _ => {},
                                }
                            }

                            if let (Some(pn), Some(ct)) = (partname, content_type) {
                                map.add_override(&pn, ct);
                            }
                        },
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        if !saw_root {
            return Err(OpcError::XmlError(
                "Content types part has no <Types> root".to_string(),
            ));
        }

        Ok(map)
    }

    /// Add a default content type mapping for a file extension.
    fn add_default(&mut self, extension: &str, content_type: String) {
        self.defaults.insert(extension.to_lowercase(), content_type);
    }

    /// Add an override content type mapping for a specific partname.
    fn add_override(&mut self, partname: &str, content_type: String) {
        self.overrides.insert(partname.to_lowercase(), content_type);
    }

    /// Get the content type for a partname.
    ///
    /// First checks for an override, then falls back to the default
    /// based on file extension.
    pub fn get(&self, pack_uri: &PackURI) -> Option<&str> {
        self.overrides
            .get(&pack_uri.as_str().to_lowercase())
            .or_else(|| self.defaults.get(&pack_uri.ext().to_lowercase()))
            .map(String::as_str)
    }

    /// Whether a partname has its own Override entry.
    #[inline]
    pub fn has_override(&self, pack_uri: &PackURI) -> bool {
        self.overrides
            .contains_key(&pack_uri.as_str().to_lowercase())
    }
}

/// Parse a `.rels` part into a relationship collection.
///
/// # Arguments
/// * `rels_xml` - Contents of the relationships part
/// * `base_uri` - Base URI of the source the relationships belong to
pub fn parse_rels_xml(rels_xml: &[u8], base_uri: &str) -> Result<Relationships> {
    let mut rels = Relationships::new(base_uri.to_string());
    let mut reader = Reader::from_reader(rels_xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"Relationships" => saw_root = true,
                b"Relationship" => {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut is_external = false;

                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(attr.unescape_value()?.to_string()),
                            b"Type" => reltype = Some(attr.unescape_value()?.to_string()),
                            b"Target" => target_ref = Some(attr.unescape_value()?.to_string()),
                            b"TargetMode" => {
                                is_external = attr.unescape_value()? == target_mode::EXTERNAL;
                            },
                            _ => {},
                        }
                    }

                    if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                        rels.add_relationship(rt, tr, id, is_external);
                    }
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    if !saw_root {
        return Err(OpcError::XmlError(
            "Relationships part has no <Relationships> root".to_string(),
        ));
    }

    Ok(rels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_map() {
        let xml = br#"<?xml version="1.0"?>
            <Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
                <Default Extension="xml" ContentType="application/xml"/>
                <Default Extension="PNG" ContentType="image/png"/>
                <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
            </Types>"#;

        let ct_map = ContentTypeMap::from_xml(xml).unwrap();

        let uri = PackURI::new("/test.xml").unwrap();
        assert_eq!(ct_map.get(&uri), Some("application/xml"));

        let uri = PackURI::new("/media/image1.png").unwrap();
        assert_eq!(ct_map.get(&uri), Some("image/png"));

        let uri = PackURI::new("/docProps/Core.xml").unwrap();
        assert_eq!(
            ct_map.get(&uri),
            Some("application/vnd.openxmlformats-package.core-properties+xml")
        );
        assert!(ct_map.has_override(&uri));

        let uri = PackURI::new("/media/clip.bin").unwrap();
        assert_eq!(ct_map.get(&uri), None);
    }

    #[test]
    fn test_content_types_garbage() {
        assert!(ContentTypeMap::from_xml(b"<Types><Default").is_err());
        assert!(ContentTypeMap::from_xml(b"not xml at all").is_err());
    }

    #[test]
    fn test_parse_rels() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
            <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
                <Relationship Id="rId3" Type="http://example.com/app" Target="docProps/app.xml"/>
                <Relationship Id="rId1" Type="http://example.com/doc" Target="word/document.xml"/>
                <Relationship Id="rId9" Type="http://example.com/link" Target="https://example.com" TargetMode="External"/>
            </Relationships>"#;

        let rels = parse_rels_xml(xml, "/").unwrap();
        assert_eq!(rels.len(), 3);

        let ids: Vec<&str> = rels.iter().map(|r| r.r_id()).collect();
        assert_eq!(ids, ["rId3", "rId1", "rId9"]);
        assert!(rels.get("rId9").unwrap().is_external());
        assert_eq!(
            rels.get("rId3").unwrap().target_partname().unwrap().as_str(),
            "/docProps/app.xml"
        );
    }
}
