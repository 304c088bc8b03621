//! The recognized metadata schema.
//!
//! Core properties live in `docProps/core.xml` and are spread over the `cp`,
//! `dc` and `dcterms` namespaces. Application properties live in
//! `docProps/app.xml`. Custom properties are an open set keyed by name.

use crate::ooxml::error::OoxmlError;
use crate::ooxml::opc::constants::namespace as ns;
use std::fmt;
use std::str::FromStr;

/// A field of the core properties part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreField {
    Title,
    Subject,
    /// Document author; `author` is accepted as an alias
    Creator,
    Keywords,
    /// Free-form description; `comments` is accepted as an alias
    Description,
    LastModifiedBy,
    Revision,
    Category,
    ContentStatus,
    Identifier,
    Language,
    Version,
    Created,
    Modified,
    LastPrinted,
}

impl CoreField {
    pub const ALL: [CoreField; 15] = [
        CoreField::Title,
        CoreField::Subject,
        CoreField::Creator,
        CoreField::Keywords,
        CoreField::Description,
        CoreField::LastModifiedBy,
        CoreField::Revision,
        CoreField::Category,
        CoreField::ContentStatus,
        CoreField::Identifier,
        CoreField::Language,
        CoreField::Version,
        CoreField::Created,
        CoreField::Modified,
        CoreField::LastPrinted,
    ];

    /// Namespace URI of the element.
    pub fn namespace(self) -> &'static str {
        match self {
            CoreField::Title
            | CoreField::Subject
            | CoreField::Creator
            | CoreField::Description
            | CoreField::Identifier
            | CoreField::Language => ns::DC,
            CoreField::Created | CoreField::Modified => ns::DCTERMS,
            CoreField::Keywords
            | CoreField::LastModifiedBy
            | CoreField::Revision
            | CoreField::Category
            | CoreField::ContentStatus
            | CoreField::Version
            | CoreField::LastPrinted => ns::CORE_PROPERTIES,
        }
    }

    /// Prefix conventionally bound to the element's namespace.
    pub fn preferred_prefix(self) -> &'static str {
        match self.namespace() {
            ns::DC => "dc",
            ns::DCTERMS => "dcterms",
            _ => "cp",
        }
    }

    /// Element local name.
    pub fn local_name(self) -> &'static str {
        match self {
            CoreField::Title => "title",
            CoreField::Subject => "subject",
            CoreField::Creator => "creator",
            CoreField::Keywords => "keywords",
            CoreField::Description => "description",
            CoreField::LastModifiedBy => "lastModifiedBy",
            CoreField::Revision => "revision",
            CoreField::Category => "category",
            CoreField::ContentStatus => "contentStatus",
            CoreField::Identifier => "identifier",
            CoreField::Language => "language",
            CoreField::Version => "version",
            CoreField::Created => "created",
            CoreField::Modified => "modified",
            CoreField::LastPrinted => "lastPrinted",
        }
    }

    /// Canonical snake_case name used in field maps.
    pub fn key(self) -> &'static str {
        match self {
            CoreField::LastModifiedBy => "last_modified_by",
            CoreField::ContentStatus => "content_status",
            CoreField::LastPrinted => "last_printed",
            other => other.local_name(),
        }
    }

    /// Whether the field holds an ISO 8601 timestamp.
    #[inline]
    pub fn is_timestamp(self) -> bool {
        matches!(
            self,
            CoreField::Created | CoreField::Modified | CoreField::LastPrinted
        )
    }

    /// Whether the element carries `xsi:type="dcterms:W3CDTF"`.
    #[inline]
    pub fn is_w3cdtf(self) -> bool {
        matches!(self, CoreField::Created | CoreField::Modified)
    }

    /// Look a field up by namespace URI and local name.
    pub fn from_qualified(namespace: &str, local_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.namespace() == namespace && f.local_name() == local_name)
    }
}

/// A field of the application (extended) properties part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppField {
    Application,
    AppVersion,
    Company,
    Manager,
    Template,
    HyperlinkBase,
}

impl AppField {
    pub const ALL: [AppField; 6] = [
        AppField::Application,
        AppField::AppVersion,
        AppField::Company,
        AppField::Manager,
        AppField::Template,
        AppField::HyperlinkBase,
    ];

    /// Element local name, in the extended-properties namespace.
    pub fn local_name(self) -> &'static str {
        match self {
            AppField::Application => "Application",
            AppField::AppVersion => "AppVersion",
            AppField::Company => "Company",
            AppField::Manager => "Manager",
            AppField::Template => "Template",
            AppField::HyperlinkBase => "HyperlinkBase",
        }
    }

    /// Canonical snake_case name used in field maps.
    pub fn key(self) -> &'static str {
        match self {
            AppField::Application => "application",
            AppField::AppVersion => "app_version",
            AppField::Company => "company",
            AppField::Manager => "manager",
            AppField::Template => "template",
            AppField::HyperlinkBase => "hyperlink_base",
        }
    }

    pub fn from_local_name(local_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.local_name() == local_name)
    }
}

/// Prefix that addresses a custom property in an edit set.
pub const CUSTOM_PREFIX: &str = "custom:";

/// A name in the recognized metadata schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldName {
    Core(CoreField),
    App(AppField),
    /// Custom property, by its exact (case-sensitive) property name
    Custom(String),
}

impl FieldName {
    /// Parse a caller-supplied field name.
    ///
    /// Accepts snake_case keys (`last_modified_by`), XML local names
    /// (`lastModifiedBy`), the `author` and `comments` aliases, and
    /// `custom:<Name>` for custom properties. Matching ignores case and the
    /// separators `_`, `-` and space.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();

        if name.len() > CUSTOM_PREFIX.len()
            && name.is_char_boundary(CUSTOM_PREFIX.len())
            && name[..CUSTOM_PREFIX.len()].eq_ignore_ascii_case(CUSTOM_PREFIX)
        {
            let custom = name[CUSTOM_PREFIX.len()..].trim();
            return (!custom.is_empty()).then(|| FieldName::Custom(custom.to_string()));
        }

        let wanted = normalize(name);
        match wanted.as_str() {
            "author" => return Some(FieldName::Core(CoreField::Creator)),
            "comments" => return Some(FieldName::Core(CoreField::Description)),
            _ => {},
        }

        if let Some(field) = CoreField::ALL
            .into_iter()
            .find(|f| normalize(f.key()) == wanted || normalize(f.local_name()) == wanted)
        {
            return Some(FieldName::Core(field));
        }

        AppField::ALL
            .into_iter()
            .find(|f| normalize(f.key()) == wanted || normalize(f.local_name()) == wanted)
            .map(FieldName::App)
    }

    /// Canonical name, as used for field map keys and log output.
    pub fn key(&self) -> String {
        match self {
            FieldName::Core(f) => f.key().to_string(),
            FieldName::App(f) => f.key().to_string(),
            FieldName::Custom(name) => format!("{}{}", CUSTOM_PREFIX, name),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for FieldName {
    type Err = OoxmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::parse(s).ok_or_else(|| OoxmlError::UnsupportedField(s.to_string()))
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_core_names() {
        assert_eq!(
            FieldName::parse("title"),
            Some(FieldName::Core(CoreField::Title))
        );
        assert_eq!(
            FieldName::parse("last_modified_by"),
            Some(FieldName::Core(CoreField::LastModifiedBy))
        );
        assert_eq!(
            FieldName::parse("lastModifiedBy"),
            Some(FieldName::Core(CoreField::LastModifiedBy))
        );
        assert_eq!(
            FieldName::parse(" Content-Status "),
            Some(FieldName::Core(CoreField::ContentStatus))
        );
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            FieldName::parse("author"),
            Some(FieldName::Core(CoreField::Creator))
        );
        assert_eq!(
            FieldName::parse("Comments"),
            Some(FieldName::Core(CoreField::Description))
        );
    }

    #[test]
    fn test_parse_app_and_custom() {
        assert_eq!(
            FieldName::parse("company"),
            Some(FieldName::App(AppField::Company))
        );
        assert_eq!(
            FieldName::parse("AppVersion"),
            Some(FieldName::App(AppField::AppVersion))
        );
        assert_eq!(
            FieldName::parse("custom:Project Code"),
            Some(FieldName::Custom("Project Code".to_string()))
        );
        assert_eq!(
            FieldName::parse("CUSTOM:Reviewer"),
            Some(FieldName::Custom("Reviewer".to_string()))
        );
        assert_eq!(FieldName::parse("custom:"), None);
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(FieldName::parse("not_a_real_field"), None);
        assert!(matches!(
            "not_a_real_field".parse::<FieldName>(),
            Err(OoxmlError::UnsupportedField(_))
        ));
    }

    #[test]
    fn test_schema_tables() {
        for field in CoreField::ALL {
            assert_eq!(
                CoreField::from_qualified(field.namespace(), field.local_name()),
                Some(field)
            );
            assert_eq!(FieldName::parse(field.key()), Some(FieldName::Core(field)));
        }
        for field in AppField::ALL {
            assert_eq!(AppField::from_local_name(field.local_name()), Some(field));
        }
        assert!(CoreField::Created.is_w3cdtf());
        assert!(CoreField::LastPrinted.is_timestamp());
        assert!(!CoreField::LastPrinted.is_w3cdtf());
        assert_eq!(CoreField::Modified.preferred_prefix(), "dcterms");
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldName::Core(CoreField::LastPrinted).to_string(), "last_printed");
        assert_eq!(FieldName::Custom("X".into()).to_string(), "custom:X");
    }
}
