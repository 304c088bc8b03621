//! Editor configuration.

use crate::ooxml::metadata::UnknownFieldPolicy;
use std::env;
use tracing::warn;

/// Environment variable selecting the unknown-field policy.
pub const ENV_UNKNOWN_FIELDS: &str = "DOCMETA_UNKNOWN_FIELDS";
/// Environment variable capping the decompressed size of one part.
pub const ENV_MAX_PART_BYTES: &str = "DOCMETA_MAX_PART_BYTES";

/// Default cap on the decompressed size of a metadata or manifest part (16 MiB).
pub const DEFAULT_MAX_PART_BYTES: u64 = 16 * 1024 * 1024;

/// Settings shared by every request an editor handles.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// What to do with field names outside the recognized schema
    pub unknown_fields: UnknownFieldPolicy,
    /// Largest decompressed size accepted for a part the editor reads
    pub max_part_bytes: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::default(),
            max_part_bytes: DEFAULT_MAX_PART_BYTES,
        }
    }
}

impl EditorConfig {
    /// Load configuration from the process environment.
    ///
    /// Unset variables take their default; invalid ones are logged and also
    /// fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let unknown_fields = match lookup(ENV_UNKNOWN_FIELDS) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(
                    "Invalid {}={:?} ({}), using '{}'",
                    ENV_UNKNOWN_FIELDS, raw, e, defaults.unknown_fields
                );
                defaults.unknown_fields
            }),
            None => defaults.unknown_fields,
        };

        let max_part_bytes = match lookup(ENV_MAX_PART_BYTES) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(
                        "Invalid {}={:?}, using {}",
                        ENV_MAX_PART_BYTES, raw, defaults.max_part_bytes
                    );
                    defaults.max_part_bytes
                },
            },
            None => defaults.max_part_bytes,
        };

        Self {
            unknown_fields,
            max_part_bytes,
        }
    }

    /// Builder-style policy override.
    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Builder-style size cap override.
    pub fn with_max_part_bytes(mut self, max_part_bytes: u64) -> Self {
        self.max_part_bytes = max_part_bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EditorConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.unknown_fields, UnknownFieldPolicy::Reject);
        assert_eq!(config.max_part_bytes, DEFAULT_MAX_PART_BYTES);
    }

    #[test]
    fn test_valid_values() {
        let config = EditorConfig::from_lookup(lookup(&[
            (ENV_UNKNOWN_FIELDS, "ignore"),
            (ENV_MAX_PART_BYTES, "4096"),
        ]));
        assert_eq!(config.unknown_fields, UnknownFieldPolicy::Ignore);
        assert_eq!(config.max_part_bytes, 4096);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = EditorConfig::from_lookup(lookup(&[
            (ENV_UNKNOWN_FIELDS, "sometimes"),
            (ENV_MAX_PART_BYTES, "lots"),
        ]));
        assert_eq!(config, EditorConfig::default());

        let config = EditorConfig::from_lookup(lookup(&[(ENV_MAX_PART_BYTES, "0")]));
        assert_eq!(config.max_part_bytes, DEFAULT_MAX_PART_BYTES);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EditorConfig = serde_saphyr::from_str("unknown_fields: ignore\n").unwrap();
        assert_eq!(config.unknown_fields, UnknownFieldPolicy::Ignore);
        assert_eq!(config.max_part_bytes, DEFAULT_MAX_PART_BYTES);
    }
}
