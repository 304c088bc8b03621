//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! Reading borrows the uploaded bytes and decompresses single members on demand.
//! Writing can either store fresh content or raw-copy an existing member, which
//! keeps its compressed bytes, method and timestamp untouched.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Directory information about one archive member, in archive order.
#[derive(Debug, Clone)]
pub struct EntryInfo {
    /// ZIP membername exactly as stored ("docProps/core.xml")
    pub name: String,
    /// Whether the member is a directory entry
    pub is_dir: bool,
    /// Compression method the member was stored with
    pub compression: CompressionMethod,
    /// Last modification time recorded in the archive, if any
    pub last_modified: Option<zip::DateTime>,
    /// Unix permission bits, if the archive recorded them
    pub unix_mode: Option<u32>,
}

impl EntryInfo {
    /// The PackURI addressed by this member.
    #[inline]
    pub fn partname(&self) -> PackURI {
        PackURI::from_membername(&self.name)
    }
}

/// Physical package reader that provides access to parts in a ZIP-based OPC package.
///
/// The archive is indexed once when opened; member contents are decompressed
/// only when requested through [`PhysPkgReader::blob_for`].
pub struct PhysPkgReader<'data> {
    /// The underlying ZIP archive over the borrowed bytes
    archive: ZipArchive<Cursor<&'data [u8]>>,

    /// Members in archive order
    entries: Vec<EntryInfo>,

    /// Lowercased membername to archive index; part names are case-insensitive
    index: HashMap<String, usize>,
}

impl<'data> PhysPkgReader<'data> {
    /// Create a new PhysPkgReader from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The ZIP archive data as a byte slice
    ///
    /// # Returns
    /// A new PhysPkgReader instance, or an error if `data` is not a ZIP archive
    pub fn new(data: &'data [u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let mut entries = Vec::with_capacity(archive.len());
        let mut index = HashMap::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            let entry = EntryInfo {
                name: file.name().to_string(),
                is_dir: file.is_dir(),
                compression: file.compression(),
                last_modified: file.last_modified(),
                unix_mode: file.unix_mode(),
            };
            index.entry(entry.name.to_lowercase()).or_insert(i);
            entries.push(entry);
        }

        Ok(Self {
            archive,
            entries,
            index,
        })
    }

    /// Get the decompressed content of a part.
    ///
    /// # Arguments
    /// * `pack_uri` - The PackURI of the part to read
    /// * `limit` - Maximum decompressed size accepted for this part
    ///
    /// # Returns
    /// The binary content of the part, `PartNotFound` when there is no such
    /// member, or `PartTooLarge` when it inflates past `limit`
    pub fn blob_for(&self, pack_uri: &PackURI, limit: u64) -> Result<Vec<u8>> {
        let i = self
            .index_of(pack_uri)
            .ok_or_else(|| OpcError::PartNotFound(pack_uri.to_string()))?;

        // The archive handle is a cheap clone sharing the parsed central directory.
        let mut archive = self.archive.clone();
        let file = archive.by_index(i).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => OpcError::PartNotFound(pack_uri.to_string()),
            other => OpcError::ZipError(other),
        })?;

        let too_large = || OpcError::PartTooLarge {
            name: pack_uri.to_string(),
            limit,
        };
        if file.size() > limit {
            return Err(too_large());
        }

        let mut blob = Vec::with_capacity(file.size() as usize);
        file.take(limit.saturating_add(1)).read_to_end(&mut blob)?;
        if blob.len() as u64 > limit {
            return Err(too_large());
        }

        Ok(blob)
    }

    /// Check if a specific member exists in the package.
    #[inline]
    pub fn contains(&self, pack_uri: &PackURI) -> bool {
        self.index_of(pack_uri).is_some()
    }

    /// Archive index of a part, matched case-insensitively.
    #[inline]
    pub fn index_of(&self, pack_uri: &PackURI) -> Option<usize> {
        self.index
            .get(&pack_uri.membername().to_lowercase())
            .copied()
    }

    /// All members in archive order.
    #[inline]
    pub fn entries(&self) -> &[EntryInfo] {
        &self.entries
    }

    /// Get the number of members in the package.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the package is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Physical package writer for creating OPC packages in memory.
pub struct PhysPkgWriter {
    /// The underlying ZIP archive writer
    archive: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write a new part with Deflate compression.
    ///
    /// # Arguments
    /// * `pack_uri` - The PackURI for the part
    /// * `blob` - The binary content to write
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.archive.start_file(pack_uri.membername(), options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Write fresh content in place of an existing member.
    ///
    /// The member keeps its name, timestamp and permissions. A stored member
    /// stays stored; anything else is written with Deflate.
    pub fn write_like(&mut self, entry: &EntryInfo, blob: &[u8]) -> Result<()> {
        let method = match entry.compression {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };

        let mut options = SimpleFileOptions::default().compression_method(method);
        if let Some(ts) = entry.last_modified {
            options = options.last_modified_time(ts);
        }
        if let Some(mode) = entry.unix_mode {
            options = options.unix_permissions(mode);
        }

        self.archive.start_file(entry.name.as_str(), options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Copy a member from a source package without recompressing it.
    ///
    /// # Arguments
    /// * `source` - The package the member is copied from
    /// * `index` - Archive index of the member in `source`
    pub fn copy_raw(&mut self, source: &PhysPkgReader<'_>, index: usize) -> Result<()> {
        let mut archive = source.archive.clone();
        let file = archive.by_index_raw(index)?;
        self.archive.raw_copy_file(file)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.archive.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut writer = PhysPkgWriter::new();
        let pack_uri = PackURI::new("/test.txt").unwrap();
        writer.write(&pack_uri, b"Hello, World!").unwrap();
        let zip_data = writer.finish().unwrap();

        let reader = PhysPkgReader::new(&zip_data).unwrap();
        let content = reader.blob_for(&pack_uri, 1024).unwrap();
        assert_eq!(content, b"Hello, World!");
        assert_eq!(reader.len(), 1);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut writer = PhysPkgWriter::new();
        writer
            .write(&PackURI::new("/docProps/core.xml").unwrap(), b"<core/>")
            .unwrap();
        let zip_data = writer.finish().unwrap();

        let reader = PhysPkgReader::new(&zip_data).unwrap();
        let upper = PackURI::new("/DOCPROPS/Core.XML").unwrap();
        assert!(reader.contains(&upper));
        assert_eq!(reader.blob_for(&upper, 1024).unwrap(), b"<core/>");
    }

    #[test]
    fn test_missing_part() {
        let mut writer = PhysPkgWriter::new();
        writer
            .write(&PackURI::new("/a.xml").unwrap(), b"<a/>")
            .unwrap();
        let zip_data = writer.finish().unwrap();

        let reader = PhysPkgReader::new(&zip_data).unwrap();
        let err = reader
            .blob_for(&PackURI::new("/b.xml").unwrap(), 1024)
            .unwrap_err();
        assert!(matches!(err, OpcError::PartNotFound(_)));
    }

    #[test]
    fn test_size_limit() {
        let mut writer = PhysPkgWriter::new();
        let uri = PackURI::new("/big.xml").unwrap();
        writer.write(&uri, &[b'x'; 64]).unwrap();
        let zip_data = writer.finish().unwrap();

        let reader = PhysPkgReader::new(&zip_data).unwrap();
        assert!(matches!(
            reader.blob_for(&uri, 16),
            Err(OpcError::PartTooLarge { limit: 16, .. })
        ));
        assert_eq!(reader.blob_for(&uri, 64).unwrap().len(), 64);
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            PhysPkgReader::new(b"definitely not a zip archive"),
            Err(OpcError::ZipError(_))
        ));
    }

    #[test]
    fn test_raw_copy_preserves_entry() {
        let mut writer = PhysPkgWriter::new();
        let uri = PackURI::new("/media/image1.png").unwrap();
        writer.write(&uri, b"\x89PNG fake image bytes").unwrap();
        let original = writer.finish().unwrap();

        let source = PhysPkgReader::new(&original).unwrap();
        let mut writer = PhysPkgWriter::new();
        writer.copy_raw(&source, 0).unwrap();
        let copied = writer.finish().unwrap();

        let reader = PhysPkgReader::new(&copied).unwrap();
        assert_eq!(
            reader.blob_for(&uri, 1024).unwrap(),
            b"\x89PNG fake image bytes"
        );
        assert_eq!(reader.entries()[0].compression, source.entries()[0].compression);
    }
}
