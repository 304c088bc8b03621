//! In-memory OOXML packages for unit tests.

use crate::common::detection::DocumentKind;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>Quarterly report</dc:title><dc:creator>Jane Doe</dc:creator><cp:lastModifiedBy>John Smith</cp:lastModifiedBy><cp:revision>3</cp:revision><dcterms:created xsi:type="dcterms:W3CDTF">2023-01-15T10:30:00Z</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">2023-02-20T14:45:00Z</dcterms:modified></cp:coreProperties>"#;

/// A tiny PNG signature; the content only has to survive a raw copy.
const IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Builds a minimal but well-formed package of one kind.
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    kind: DocumentKind,
    content_types: bool,
    content_types_last: bool,
    office_document_rel: bool,
    core_rel: bool,
    core_part: bool,
    app: bool,
    custom: Option<String>,
    core_xml: String,
    stored_image: bool,
}

impl PackageBuilder {
    fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            content_types: true,
            content_types_last: false,
            office_document_rel: true,
            core_rel: true,
            core_part: true,
            app: true,
            custom: None,
            core_xml: CORE_XML.to_string(),
            stored_image: false,
        }
    }

    pub fn docx() -> Self {
        Self::new(DocumentKind::WordProcessing)
    }

    pub fn xlsx() -> Self {
        Self::new(DocumentKind::Spreadsheet)
    }

    pub fn pptx() -> Self {
        Self::new(DocumentKind::Presentation)
    }

    pub fn without_content_types(mut self) -> Self {
        self.content_types = false;
        self
    }

    pub fn content_types_last(mut self) -> Self {
        self.content_types_last = true;
        self
    }

    pub fn without_office_document_rel(mut self) -> Self {
        self.office_document_rel = false;
        self
    }

    pub fn without_core_rel(mut self) -> Self {
        self.core_rel = false;
        self
    }

    /// Keep the core relationship but leave its target out of the archive.
    pub fn without_core_part(mut self) -> Self {
        self.core_part = false;
        self
    }

    pub fn without_app(mut self) -> Self {
        self.app = false;
        self
    }

    pub fn with_custom(mut self, xml: &str) -> Self {
        self.custom = Some(xml.to_string());
        self
    }

    pub fn core_xml(mut self, xml: &str) -> Self {
        self.core_xml = xml.to_string();
        self
    }

    /// Add an uncompressed media entry next to the main part.
    pub fn with_stored_image(mut self) -> Self {
        self.stored_image = true;
        self
    }

    fn main_part(&self) -> (&'static str, &'static str) {
        match self.kind {
            DocumentKind::WordProcessing => ("word/document.xml", ct::WML_DOCUMENT_MAIN),
            DocumentKind::Spreadsheet => ("xl/workbook.xml", ct::SML_SHEET_MAIN),
            DocumentKind::Presentation => ("ppt/presentation.xml", ct::PML_PRESENTATION_MAIN),
        }
    }

    fn media_dir(&self) -> &'static str {
        match self.kind {
            DocumentKind::WordProcessing => "word",
            DocumentKind::Spreadsheet => "xl",
            DocumentKind::Presentation => "ppt",
        }
    }

    fn application(&self) -> &'static str {
        match self.kind {
            DocumentKind::WordProcessing => "Microsoft Office Word",
            DocumentKind::Spreadsheet => "Microsoft Excel",
            DocumentKind::Presentation => "Microsoft Office PowerPoint",
        }
    }

    fn content_types_xml(&self) -> String {
        let (main, main_ct) = self.main_part();
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push_str(&format!(
            r#"<Default Extension="rels" ContentType="{}"/><Default Extension="xml" ContentType="{}"/>"#,
            ct::OPC_RELATIONSHIPS,
            ct::XML
        ));
        if self.stored_image {
            xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
        }
        xml.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            main, main_ct
        ));
        xml.push_str(&format!(
            r#"<Override PartName="/docProps/core.xml" ContentType="{}"/>"#,
            ct::OPC_CORE_PROPERTIES
        ));
        if self.app {
            xml.push_str(&format!(
                r#"<Override PartName="/docProps/app.xml" ContentType="{}"/>"#,
                ct::OFC_EXTENDED_PROPERTIES
            ));
        }
        if self.custom.is_some() {
            xml.push_str(&format!(
                r#"<Override PartName="/docProps/custom.xml" ContentType="{}"/>"#,
                ct::OFC_CUSTOM_PROPERTIES
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn rels_xml(&self) -> String {
        let (main, _) = self.main_part();
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        let mut rel = |id: u32, reltype: &str, target: &str| {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="{}" Target="{}"/>"#,
                id, reltype, target
            ));
        };
        if self.office_document_rel {
            rel(1, rt::OFFICE_DOCUMENT, main);
        }
        if self.core_rel {
            rel(2, rt::CORE_PROPERTIES, "docProps/core.xml");
        }
        if self.app {
            rel(3, rt::EXTENDED_PROPERTIES, "docProps/app.xml");
        }
        if self.custom.is_some() {
            rel(4, rt::CUSTOM_PROPERTIES, "docProps/custom.xml");
        }
        xml.push_str("</Relationships>");
        xml
    }

    fn app_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Template>Normal</Template><TotalTime>4</TotalTime><Application>{}</Application><DocSecurity>0</DocSecurity><Company>Acme</Company><AppVersion>16.0000</AppVersion></Properties>"#,
            self.application()
        )
    }

    /// Serialize the package.
    pub fn build(&self) -> Vec<u8> {
        let (main, _) = self.main_part();
        let mut entries: Vec<(String, Vec<u8>, CompressionMethod)> = Vec::new();
        let deflated = CompressionMethod::Deflated;

        entries.push(("_rels/.rels".to_string(), self.rels_xml().into_bytes(), deflated));
        entries.push((
            main.to_string(),
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><root/>"#.to_vec(),
            deflated,
        ));
        if self.stored_image {
            entries.push((
                format!("{}/media/image1.png", self.media_dir()),
                IMAGE_BYTES.to_vec(),
                CompressionMethod::Stored,
            ));
        }
        if self.core_part {
            entries.push((
                "docProps/core.xml".to_string(),
                self.core_xml.clone().into_bytes(),
                deflated,
            ));
        }
        if self.app {
            entries.push(("docProps/app.xml".to_string(), self.app_xml().into_bytes(), deflated));
        }
        if let Some(custom) = &self.custom {
            entries.push((
                "docProps/custom.xml".to_string(),
                custom.clone().into_bytes(),
                deflated,
            ));
        }
        if self.content_types {
            let content_types = (
                "[Content_Types].xml".to_string(),
                self.content_types_xml().into_bytes(),
                deflated,
            );
            if self.content_types_last {
                entries.push(content_types);
            } else {
                entries.insert(0, content_types);
            }
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data, method) in entries {
            let options = SimpleFileOptions::default().compression_method(method);
            writer.start_file(name, options).unwrap();
            writer.write_all(&data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }
}

/// A word-processing package with core and application properties.
pub fn minimal_docx() -> Vec<u8> {
    PackageBuilder::docx().build()
}

/// Every entry's name and raw (still compressed) bytes, in archive order.
pub fn raw_entries(data: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index_raw(i).unwrap();
            let mut raw = Vec::new();
            file.read_to_end(&mut raw).unwrap();
            (file.name().to_string(), raw)
        })
        .collect()
}
