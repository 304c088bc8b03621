/// Objects that implement reading OPC packages.
///
/// `OpcPackage` is a borrowed view over the uploaded bytes: the archive
/// directory, the content-type map and the package relationships are parsed
/// when it is opened, while every other part stays compressed until asked for.
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_RELS_URI, PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::{ContentTypeMap, parse_rels_xml};
use crate::ooxml::opc::rel::Relationships;

/// Main API type for working with an opened OPC package.
pub struct OpcPackage<'data> {
    /// The physical archive
    phys: PhysPkgReader<'data>,

    /// Parsed `[Content_Types].xml`
    content_types: ContentTypeMap,

    /// Original bytes of `[Content_Types].xml`
    content_types_xml: Vec<u8>,

    /// Package-level relationships
    rels: Relationships,

    /// Original bytes of `_rels/.rels`
    rels_xml: Vec<u8>,

    /// Decompressed size cap for parts read through this package
    max_part_bytes: u64,
}

impl<'data> OpcPackage<'data> {
    /// Open an OPC package from bytes.
    ///
    /// # Arguments
    /// * `data` - The package bytes
    /// * `max_part_bytes` - Size cap for every part read through the package
    ///
    /// # Returns
    /// The opened package, or an error when the bytes are not a ZIP archive or the
    /// content-types and package-relationship manifests are missing or unparseable
    pub fn open(data: &'data [u8], max_part_bytes: u64) -> Result<Self> {
        let phys = PhysPkgReader::new(data)?;

        let content_types_uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        let content_types_xml = phys.blob_for(&content_types_uri, max_part_bytes)?;
        let content_types = ContentTypeMap::from_xml(&content_types_xml)?;

        let rels_uri = PackURI::new(PACKAGE_RELS_URI).map_err(OpcError::InvalidPackUri)?;
        let rels_xml = phys.blob_for(&rels_uri, max_part_bytes)?;
        let rels = parse_rels_xml(&rels_xml, PACKAGE_URI)?;

        Ok(Self {
            phys,
            content_types,
            content_types_xml,
            rels,
            rels_xml,
            max_part_bytes,
        })
    }

    /// Get the physical archive.
    #[inline]
    pub fn phys(&self) -> &PhysPkgReader<'data> {
        &self.phys
    }

    /// Get a reference to the package-level relationships.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Original bytes of `_rels/.rels`.
    #[inline]
    pub fn pkg_rels_xml(&self) -> &[u8] {
        &self.rels_xml
    }

    /// Original bytes of `[Content_Types].xml`.
    #[inline]
    pub fn content_types_xml(&self) -> &[u8] {
        &self.content_types_xml
    }

    /// Get the parsed content-type map.
    #[inline]
    pub fn content_types(&self) -> &ContentTypeMap {
        &self.content_types
    }

    /// Content type of a part, as declared by `[Content_Types].xml`.
    #[inline]
    pub fn content_type(&self, partname: &PackURI) -> Option<&str> {
        self.content_types.get(partname)
    }

    /// Check if a part exists in the package.
    #[inline]
    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.phys.contains(partname)
    }

    /// Read and decompress the bytes of one part.
    pub fn blob(&self, partname: &PackURI) -> Result<Vec<u8>> {
        self.phys.blob_for(partname, self.max_part_bytes)
    }

    /// Partname of the main document part (document, workbook or presentation).
    ///
    /// Both the transitional and the strict relationship type are accepted.
    pub fn main_document_partname(&self) -> Result<PackURI> {
        let rel = match self
            .rels
            .part_with_reltype(relationship_type::OFFICE_DOCUMENT)
        {
            Err(OpcError::RelationshipNotFound(_)) => self
                .rels
                .part_with_reltype(relationship_type::STRICT_OFFICE_DOCUMENT)?,
            other => other?,
        };
        rel.target_partname()
    }

    /// Find the next available partname for a part template.
    ///
    /// # Arguments
    /// * `template` - A format string with a %d placeholder for the number
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        for n in 1u32..=10_000 {
            let candidate =
                PackURI::new(template.replace("%d", &n.to_string())).map_err(OpcError::InvalidPackUri)?;
            if !self.contains_part(&candidate) {
                return Ok(candidate);
            }
        }
        Err(OpcError::InvalidPackUri(
            "Too many parts, cannot find next partname".to_string(),
        ))
    }
}
