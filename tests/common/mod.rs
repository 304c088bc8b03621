//! Package fixtures shared by the integration tests.
#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>Draft</dc:title><dc:subject>Planning</dc:subject><dc:creator>Jane Doe</dc:creator><cp:keywords>alpha, beta</cp:keywords><!-- produced by a test --><cp:lastModifiedBy>John Smith</cp:lastModifiedBy><cp:revision>7</cp:revision><dcterms:created xsi:type="dcterms:W3CDTF">2023-01-15T10:30:00.000Z</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">2023-02-20T14:45:00.000Z</dcterms:modified></cp:coreProperties>"#;

pub const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>Microsoft Office Word</Application><Pages>1</Pages><Company>Acme</Company></Properties>"#;

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_APP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_CUSTOM: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/custom-properties";
const CT_CUSTOM: &str = "application/vnd.openxmlformats-officedocument.custom-properties+xml";

/// Main part name and content type for each package kind.
pub fn main_part(ext: &str) -> (&'static str, &'static str) {
    match ext {
        "xlsx" => (
            "xl/workbook.xml",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
        ),
        "pptx" => (
            "ppt/presentation.xml",
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
        ),
        _ => (
            "word/document.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ),
    }
}

/// Options for [`package`].
#[derive(Debug, Clone)]
pub struct Options<'a> {
    pub ext: &'a str,
    pub core_xml: &'a str,
    pub core_rel: bool,
    pub main_rel: bool,
    pub app: bool,
    pub custom: Option<&'a str>,
    pub content_types_first: bool,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            ext: "docx",
            core_xml: CORE_XML,
            core_rel: true,
            main_rel: true,
            app: true,
            custom: None,
            content_types_first: true,
        }
    }
}

/// Build a package with a main part, a stored image, and property parts.
pub fn package(opts: &Options<'_>) -> Vec<u8> {
    let (main, main_ct) = main_part(opts.ext);

    let mut types = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="{CT_RELS}"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/{main}" ContentType="{main_ct}"/><Override PartName="/docProps/core.xml" ContentType="{CT_CORE}"/>"#
    );
    if opts.app {
        types.push_str(&format!(
            r#"<Override PartName="/docProps/app.xml" ContentType="{CT_APP}"/>"#
        ));
    }
    if opts.custom.is_some() {
        types.push_str(&format!(
            r#"<Override PartName="/docProps/custom.xml" ContentType="{CT_CUSTOM}"/>"#
        ));
    }
    types.push_str("</Types>");

    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    if opts.main_rel {
        rels.push_str(&format!(
            r#"<Relationship Id="rId1" Type="{REL_OFFICE_DOCUMENT}" Target="{main}"/>"#
        ));
    }
    if opts.core_rel {
        rels.push_str(&format!(
            r#"<Relationship Id="rId2" Type="{REL_CORE}" Target="docProps/core.xml"/>"#
        ));
    }
    if opts.app {
        rels.push_str(&format!(
            r#"<Relationship Id="rId3" Type="{REL_APP}" Target="docProps/app.xml"/>"#
        ));
    }
    if opts.custom.is_some() {
        rels.push_str(&format!(
            r#"<Relationship Id="rId4" Type="{REL_CUSTOM}" Target="docProps/custom.xml"/>"#
        ));
    }
    rels.push_str("</Relationships>");

    let media = format!("{}/media/image1.png", main.split('/').next().unwrap_or("word"));

    let mut entries: Vec<(String, Vec<u8>, CompressionMethod)> = vec![
        ("_rels/.rels".into(), rels.into_bytes(), CompressionMethod::Deflated),
        (
            main.into(),
            b"<?xml version=\"1.0\"?><body>Hello, world. Hello, world. Hello, world.</body>".to_vec(),
            CompressionMethod::Deflated,
        ),
        (media, b"\x89PNG\r\n\x1a\n-not-really-an-image-".to_vec(), CompressionMethod::Stored),
        (
            "docProps/core.xml".into(),
            opts.core_xml.as_bytes().to_vec(),
            CompressionMethod::Deflated,
        ),
    ];
    if opts.app {
        entries.push((
            "docProps/app.xml".into(),
            APP_XML.as_bytes().to_vec(),
            CompressionMethod::Deflated,
        ));
    }
    if let Some(custom) = opts.custom {
        entries.push((
            "docProps/custom.xml".into(),
            custom.as_bytes().to_vec(),
            CompressionMethod::Deflated,
        ));
    }
    let types_entry = ("[Content_Types].xml".to_string(), types.into_bytes(), CompressionMethod::Deflated);
    if opts.content_types_first {
        entries.insert(0, types_entry);
    } else {
        entries.push(types_entry);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data, method) in entries {
        writer
            .start_file(name, SimpleFileOptions::default().compression_method(method))
            .unwrap();
        writer.write_all(&data).unwrap();
    }
    writer.finish().unwrap().into_inner()
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

/// Decompressed content of one entry.
pub fn entry(data: &[u8], name: &str) -> Option<String> {
    let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    Some(text)
}
