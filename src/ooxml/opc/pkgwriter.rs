//! Package writer for OPC packages.
//!
//! Re-emits an opened package with a set of replaced or added parts. Entries
//! that are not replaced are raw-copied, so their compressed bytes, method and
//! timestamps come out exactly as they went in.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use std::collections::HashMap;

/// Package writer that serializes a rewritten OPC package to bytes.
///
/// Output layout:
/// - `[Content_Types].xml` as the first entry
/// - every other original entry, in original order
/// - parts that did not exist before, in the order given
pub struct PackageWriter;

impl PackageWriter {
    /// Serialize a package with some parts replaced.
    ///
    /// # Arguments
    /// * `package` - The opened source package
    /// * `parts` - Parts whose content replaces the original member, or which
    ///   are added when no member of that name exists
    ///
    /// # Returns
    /// The serialized package as a byte vector
    pub fn to_bytes(package: &OpcPackage<'_>, parts: &[Part]) -> Result<Vec<u8>> {
        let phys = package.phys();
        let mut replacements: HashMap<String, &Part> = parts
            .iter()
            .map(|part| (part.partname().membername().to_lowercase(), part))
            .collect();

        let content_types_uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        let content_types_index = phys
            .index_of(&content_types_uri)
            .ok_or_else(|| OpcError::PartNotFound(content_types_uri.to_string()))?;

        let mut writer = PhysPkgWriter::new();

        Self::write_entry(&mut writer, package, content_types_index, &mut replacements)?;

        for index in 0..phys.len() {
            if index == content_types_index {
                continue;
            }
            Self::write_entry(&mut writer, package, index, &mut replacements)?;
        }

        // Whatever is left had no original member.
        for part in parts {
            let key = part.partname().membername().to_lowercase();
            if replacements.remove(&key).is_some() {
                writer.write(part.partname(), part.blob())?;
            }
        }

        writer.finish()
    }

    /// Write one original entry, either replaced or raw-copied.
    fn write_entry(
        writer: &mut PhysPkgWriter,
        package: &OpcPackage<'_>,
        index: usize,
        replacements: &mut HashMap<String, &Part>,
    ) -> Result<()> {
        let phys = package.phys();
        let entry = &phys.entries()[index];

        match replacements.remove(&entry.name.to_lowercase()) {
            Some(part) if !entry.is_dir => writer.write_like(entry, part.blob()),
            _ => writer.copy_raw(phys, index),
        }
    }
}
