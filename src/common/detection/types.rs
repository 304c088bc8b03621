//! Document kind enumeration.

use crate::ooxml::opc::constants::content_type as ct;
use std::fmt;
use std::str::FromStr;

/// The three Office Open XML document families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Word document (.docx, .docm, .dotx)
    WordProcessing,
    /// PowerPoint presentation (.pptx, .pptm, .potx)
    Presentation,
    /// Excel spreadsheet (.xlsx, .xlsm, .xltx)
    Spreadsheet,
}

impl DocumentKind {
    /// Kind from a file extension, with or without the leading period.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "docx" | "docm" | "dotx" | "dotm" => Some(DocumentKind::WordProcessing),
            "pptx" | "pptm" | "potx" | "potm" | "ppsx" | "ppsm" => Some(DocumentKind::Presentation),
            "xlsx" | "xlsm" | "xltx" | "xltm" => Some(DocumentKind::Spreadsheet),
            _ => None,
        }
    }

    /// Kind from a package MIME type, as sent with an upload.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let mime = mime.split(';').next().unwrap_or_default().trim();
        match mime {
            ct::WML_DOCUMENT => Some(DocumentKind::WordProcessing),
            ct::PML_PRESENTATION => Some(DocumentKind::Presentation),
            ct::SML_SHEET => Some(DocumentKind::Spreadsheet),
            _ => Self::from_main_content_type(mime),
        }
    }

    /// Kind from the content type of a package's main document part.
    ///
    /// Covers the transitional, macro-enabled and template variants.
    pub fn from_main_content_type(content_type: &str) -> Option<Self> {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("wordprocessingml") || content_type.contains("ms-word") {
            Some(DocumentKind::WordProcessing)
        } else if content_type.contains("presentationml") || content_type.contains("ms-powerpoint")
        {
            Some(DocumentKind::Presentation)
        } else if content_type.contains("spreadsheetml") || content_type.contains("ms-excel") {
            Some(DocumentKind::Spreadsheet)
        } else {
            None
        }
    }

    /// MIME type of a package of this kind.
    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::WordProcessing => ct::WML_DOCUMENT,
            DocumentKind::Presentation => ct::PML_PRESENTATION,
            DocumentKind::Spreadsheet => ct::SML_SHEET,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::WordProcessing => "word-processing",
            DocumentKind::Presentation => "presentation",
            DocumentKind::Spreadsheet => "spreadsheet",
        })
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "word-processing" | "wordprocessing" | "word" | "document" => {
                Ok(DocumentKind::WordProcessing)
            },
            "presentation" | "powerpoint" | "slides" => Ok(DocumentKind::Presentation),
            "spreadsheet" | "excel" | "workbook" => Ok(DocumentKind::Spreadsheet),
            other => Self::from_extension(other)
                .or_else(|| Self::from_mime_type(s))
                .ok_or_else(|| format!("Unknown document kind: {}", s)),
        }
    }
}
