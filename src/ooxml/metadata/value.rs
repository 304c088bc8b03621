//! Field values and field maps.

use crate::common::detection::DocumentKind;
use crate::ooxml::error::{OoxmlError, Result};
use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Seconds between 1601-01-01 (FILETIME epoch) and 1970-01-01, in 100ns ticks.
const WINDOWS_EPOCH_OFFSET: i64 = 116_444_736_000_000_000;

/// A metadata value.
///
/// Core and application fields are text or timestamps; custom properties carry
/// one of the variant types of the custom-properties schema.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// String value (`lpwstr`)
    Text(String),
    /// 32-bit signed integer (`i4`)
    Integer(i32),
    /// 64-bit signed integer (`i8`)
    Long(i64),
    /// 32-bit floating point (`r4`)
    Float(f32),
    /// 64-bit floating point (`r8`)
    Double(f64),
    /// Boolean value (`bool`)
    Boolean(bool),
    /// Timestamp (`filetime`, or a core timestamp field)
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Get the variant-type element name for this value.
    pub fn element_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "lpwstr",
            FieldValue::Integer(_) => "i4",
            FieldValue::Long(_) => "i8",
            FieldValue::Float(_) => "r4",
            FieldValue::Double(_) => "r8",
            FieldValue::Boolean(_) => "bool",
            FieldValue::DateTime(_) => "filetime",
        }
    }

    /// Convert the value to its (unescaped) XML text.
    ///
    /// Timestamps use whole seconds; see [`format_timestamp`] to follow an
    /// existing value's precision.
    pub fn to_xml_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Long(l) => l.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Double(d) => d.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::DateTime(dt) => format_timestamp(dt, None),
        }
    }

    /// Parse a value from a variant-type element and its text.
    ///
    /// # Arguments
    /// * `element` - Variant type local name (`lpwstr`, `i4`, ...)
    /// * `text` - Unescaped element text
    pub fn from_xml_string(element: &str, text: &str) -> Result<Self> {
        let invalid = |reason: String| OoxmlError::InvalidValue {
            field: element.to_string(),
            reason,
        };
        let trimmed = text.trim();

        match element {
            "lpwstr" | "lpstr" | "bstr" => Ok(FieldValue::Text(text.to_string())),
            "i4" | "int" => trimmed
                .parse::<i32>()
                .map(FieldValue::Integer)
                .map_err(|e| invalid(e.to_string())),
            "i8" => trimmed
                .parse::<i64>()
                .map(FieldValue::Long)
                .map_err(|e| invalid(e.to_string())),
            "r4" => trimmed
                .parse::<f32>()
                .map(FieldValue::Float)
                .map_err(|e| invalid(e.to_string())),
            "r8" => trimmed
                .parse::<f64>()
                .map(FieldValue::Double)
                .map_err(|e| invalid(e.to_string())),
            "bool" => parse_bool(trimmed)
                .map(FieldValue::Boolean)
                .ok_or_else(|| invalid(format!("'{}' is not a boolean", trimmed))),
            "filetime" => parse_filetime(trimmed)
                .map(FieldValue::DateTime)
                .ok_or_else(|| invalid(format!("'{}' is not a timestamp", trimmed))),
            other => Err(OoxmlError::InvalidFormat(format!(
                "Unsupported variant type: {}",
                other
            ))),
        }
    }

    /// The value as text, when it is text.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Long(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Double(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::DateTime(v)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ if s.eq_ignore_ascii_case("true") => Some(true),
        _ if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Parse an ISO 8601 / W3CDTF timestamp.
///
/// Supports formats like:
/// - 2023-10-10T14:30:00Z
/// - 2023-10-10T14:30:00.1234567Z
/// - 2023-10-10T14:30:00+02:00
/// - 2023-10-10T14:30:00 (taken as UTC)
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d",
    ]
        .iter()
        .find_map(|fmt| {
            chrono::NaiveDateTime::parse_from_str(s, fmt)
                .ok()
                .or_else(|| {
                    chrono::NaiveDate::parse_from_str(s, fmt)
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
        })
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Parse a `vt:filetime` value: ISO 8601, or a raw FILETIME tick count.
fn parse_filetime(s: &str) -> Option<DateTime<Utc>> {
    if let Some(dt) = parse_timestamp(s) {
        return Some(dt);
    }
    let ticks = s.parse::<i64>().ok()?;
    let unix_ticks = ticks.checked_sub(WINDOWS_EPOCH_OFFSET)?;
    Some(DateTime::from_timestamp_nanos(unix_ticks.checked_mul(100)?))
}

/// How a timestamp spells its time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    /// `Z` suffix
    Utc,
    /// Numeric offset such as `+02:00`
    Offset(FixedOffset),
    /// No zone designator
    Unqualified,
}

/// Format a timestamp in the convention of the value it replaces.
///
/// `like` is the value being replaced. Its fractional-second digit count and
/// its zone form (`Z`, a numeric offset, or none) are kept, and the instant is
/// shifted into that offset. Without a previous value whole seconds with a `Z`
/// suffix are written.
pub fn format_timestamp(dt: &DateTime<Utc>, like: Option<&str>) -> String {
    let (digits, zone) = like
        .map(|s| (fraction_digits(s).min(9), zone_of(s)))
        .unwrap_or((0, Zone::Utc));

    let (local, suffix) = match zone {
        Zone::Utc => (dt.naive_utc(), "Z".to_string()),
        Zone::Offset(offset) => (dt.with_timezone(&offset).naive_local(), offset.to_string()),
        Zone::Unqualified => (dt.naive_utc(), String::new()),
    };

    let mut out = local.format("%Y-%m-%dT%H:%M:%S").to_string();
    if digits > 0 {
        let nanos = format!("{:09}", local.nanosecond() % 1_000_000_000);
        out.push('.');
        out.push_str(&nanos[..digits]);
    }
    out.push_str(&suffix);
    out
}

/// Number of fractional-second digits in an ISO 8601 timestamp.
fn fraction_digits(s: &str) -> usize {
    let Some(time) = s.split_once('T').map(|(_, t)| t) else {
        return 0;
    };
    match time.split_once('.') {
        Some((_, frac)) => frac.chars().take_while(char::is_ascii_digit).count(),
        None => 0,
    }
}

/// Zone designator of an ISO 8601 timestamp.
fn zone_of(s: &str) -> Zone {
    let Some((_, time)) = s.trim().split_once('T') else {
        return Zone::Utc;
    };
    if time.ends_with(['Z', 'z']) {
        return Zone::Utc;
    }
    match time.rfind(['+', '-']) {
        Some(at) => parse_offset(&time[at..]).map_or(Zone::Utc, Zone::Offset),
        None => Zone::Unqualified,
    }
}

/// Parse `+HH:MM`, `-HH:MM` or `+HHMM`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some(parts) => parts,
        None if rest.len() == 4 => rest.split_at(2),
        None => return None,
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Ordered mapping from field name to value, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl MetadataFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing an existing entry in place.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Text of a field, when it is present and textual.
    #[inline]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MetadataFieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Everything inspection reports about a package.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DocumentMetadata {
    pub kind: DocumentKind,
    pub core: MetadataFieldMap,
    pub app: MetadataFieldMap,
    pub custom: MetadataFieldMap,
}

impl DocumentMetadata {
    /// The document author (`creator`).
    #[inline]
    pub fn author(&self) -> Option<&str> {
        self.core.text("creator")
    }

    #[inline]
    pub fn last_modified_by(&self) -> Option<&str> {
        self.core.text("last_modified_by")
    }
}
