//! Edit sets and their resolution against the metadata schema.

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::metadata::fields::{AppField, CoreField, FieldName};
use crate::ooxml::metadata::value::{FieldValue, parse_timestamp};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// What to do with a field name outside the recognized schema.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Fail the whole edit with an unsupported-field error
    #[default]
    Reject,
    /// Drop the field with a warning and apply the rest
    Ignore,
}

impl fmt::Display for UnknownFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnknownFieldPolicy::Reject => "reject",
            UnknownFieldPolicy::Ignore => "ignore",
        })
    }
}

impl FromStr for UnknownFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "error" | "strict" => Ok(UnknownFieldPolicy::Reject),
            "ignore" | "skip" | "lenient" => Ok(UnknownFieldPolicy::Ignore),
            _ => Err(format!("Unknown field policy: {}", s)),
        }
    }
}

/// An ordered list of field assignments supplied by a caller.
///
/// Names are kept as given until [`EditSet::resolve`]; when the same field is
/// assigned more than once the last assignment wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSet {
    entries: Vec<(String, FieldValue)>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edit set for the common case of replacing the author fields.
    ///
    /// `None` leaves a field unchanged.
    pub fn from_author_fields(author: Option<&str>, last_modified_by: Option<&str>) -> Self {
        let mut edits = Self::new();
        if let Some(author) = author {
            edits.push("creator", author);
        }
        if let Some(name) = last_modified_by {
            edits.push("last_modified_by", name);
        }
        edits
    }

    /// Builder-style assignment.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Map every name onto the schema and validate the values.
    ///
    /// Timestamp fields accept a timestamp value or ISO 8601 text; anything
    /// else fails with [`OoxmlError::InvalidValue`]. Unknown names fail with
    /// [`OoxmlError::UnsupportedField`] under [`UnknownFieldPolicy::Reject`].
    pub fn resolve(&self, policy: UnknownFieldPolicy) -> Result<ResolvedEdits> {
        let mut resolved = ResolvedEdits::default();

        for (name, value) in &self.entries {
            let Some(field) = FieldName::parse(name) else {
                match policy {
                    UnknownFieldPolicy::Reject => {
                        return Err(OoxmlError::UnsupportedField(name.clone()));
                    },
                    UnknownFieldPolicy::Ignore => {
                        warn!(field = %name, "Ignoring unsupported metadata field");
                        continue;
                    },
                }
            };

            match field {
                FieldName::Core(core) => {
                    let value = core_value(core, value)?;
                    upsert(&mut resolved.core, core, value);
                },
                FieldName::App(app) => upsert(&mut resolved.app, app, value.to_xml_string()),
                FieldName::Custom(custom) => upsert(&mut resolved.custom, custom, value.clone()),
            }
        }

        Ok(resolved)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for EditSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut edits = Self::new();
        for (k, v) in iter {
            edits.push(k, v);
        }
        edits
    }
}

/// Edits mapped onto the three property parts, one entry per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedEdits {
    pub core: Vec<(CoreField, FieldValue)>,
    pub app: Vec<(AppField, String)>,
    pub custom: Vec<(String, FieldValue)>,
}

impl ResolvedEdits {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.core.is_empty() && self.app.is_empty() && self.custom.is_empty()
    }
}

/// Replace the value for `key` in place, or append it.
fn upsert<K: PartialEq, V>(entries: &mut Vec<(K, V)>, key: K, value: V) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

/// Validate a core value; timestamps become [`FieldValue::DateTime`], the
/// rest text.
fn core_value(field: CoreField, value: &FieldValue) -> Result<FieldValue> {
    if !field.is_timestamp() {
        return Ok(FieldValue::Text(value.to_xml_string()));
    }
    match value {
        FieldValue::DateTime(dt) => Ok(FieldValue::DateTime(*dt)),
        FieldValue::Text(s) => parse_timestamp(s)
            .map(FieldValue::DateTime)
            .ok_or_else(|| OoxmlError::InvalidValue {
                field: field.key().to_string(),
                reason: format!("'{}' is not an ISO 8601 timestamp", s),
            }),
        other => Err(OoxmlError::InvalidValue {
            field: field.key().to_string(),
            reason: format!("expected a timestamp, got {}", other.element_name()),
        }),
    }
}
