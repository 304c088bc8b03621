//! Document metadata: the core, application and custom property parts.
//!
//! Reading produces ordered field maps. Transforming applies a resolved edit
//! set and returns only the parts that changed, including any property part
//! or manifest that had to be created or extended.

pub mod app_props;
pub mod core_props;
pub mod custom_props;
pub mod edits;
pub mod fields;
pub mod locate;
pub mod value;
mod xml;

pub use edits::{EditSet, ResolvedEdits, UnknownFieldPolicy};
pub use fields::{AppField, CoreField, FieldName};
pub use locate::{MetadataParts, locate_metadata_parts};
pub use value::{DocumentMetadata, FieldValue, MetadataFieldMap};

use crate::common::detection::DocumentKind;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_RELS_URI, PACKAGE_URI};
use crate::ooxml::opc::{OpcError, OpcPackage, PackURI, Part, Relationships, manifest};
use tracing::debug;

/// Read every property part of a package.
///
/// Parts the package does not have yield empty maps.
pub fn read_metadata(
    package: &OpcPackage<'_>,
    parts: &MetadataParts,
    kind: DocumentKind,
) -> Result<DocumentMetadata> {
    let core = core_props::read_core(&package.blob(&parts.core)?, parts.core.as_str())?;

    let app = match present(package, parts.app.as_ref()) {
        Some(uri) => app_props::read_app(&package.blob(uri)?, uri.as_str())?,
        None => MetadataFieldMap::new(),
    };
    let custom = match present(package, parts.custom.as_ref()) {
        Some(uri) => custom_props::read_custom(&package.blob(uri)?, uri.as_str())?,
        None => MetadataFieldMap::new(),
    };

    Ok(DocumentMetadata {
        kind,
        core,
        app,
        custom,
    })
}

/// Apply resolved edits and return the parts to replace or add.
///
/// Property parts without edits are left alone. When an application or custom
/// part is edited but does not exist, it is created together with its content
/// type override and package relationship, and the changed manifests are
/// returned as well.
pub fn transform(
    package: &OpcPackage<'_>,
    parts: &MetadataParts,
    edits: &ResolvedEdits,
) -> Result<Vec<Part>> {
    let mut out = Vec::new();
    let mut manifests = ManifestEdits::new(package);

    if !edits.core.is_empty() {
        let blob = package.blob(&parts.core)?;
        let xml = core_props::apply_core(&blob, parts.core.as_str(), &edits.core)?;
        out.push(Part::new(
            parts.core.clone(),
            package
                .content_type(&parts.core)
                .unwrap_or(ct::OPC_CORE_PROPERTIES),
            xml,
        ));
    }

    if !edits.app.is_empty() {
        let target = PropertyTarget {
            located: parts.app.as_ref(),
            default_partname: "/docProps/app.xml",
            partname_template: "/docProps/app%d.xml",
            template: app_props::EMPTY_APP_PART,
            content_type: ct::OFC_EXTENDED_PROPERTIES,
            reltype: rt::EXTENDED_PROPERTIES,
        };
        let (partname, blob) = manifests.load_or_create(&target)?;
        let xml = app_props::apply_app(&blob, partname.as_str(), &edits.app)?;
        out.push(Part::new(partname, target.content_type, xml));
    }

    if !edits.custom.is_empty() {
        let target = PropertyTarget {
            located: parts.custom.as_ref(),
            default_partname: "/docProps/custom.xml",
            partname_template: "/docProps/custom%d.xml",
            template: custom_props::EMPTY_CUSTOM_PART,
            content_type: ct::OFC_CUSTOM_PROPERTIES,
            reltype: rt::CUSTOM_PROPERTIES,
        };
        let (partname, blob) = manifests.load_or_create(&target)?;
        let xml = custom_props::apply_custom(&blob, partname.as_str(), &edits.custom)?;
        out.push(Part::new(partname, target.content_type, xml));
    }

    out.extend(manifests.into_parts()?);
    Ok(out)
}

/// The located partname, if its entry is really in the archive.
fn present<'p>(package: &OpcPackage<'_>, uri: Option<&'p PackURI>) -> Option<&'p PackURI> {
    uri.filter(|uri| package.contains_part(uri))
}

/// Where a property part lives and how to create it.
struct PropertyTarget<'a> {
    located: Option<&'a PackURI>,
    default_partname: &'static str,
    partname_template: &'static str,
    template: &'static str,
    content_type: &'static str,
    reltype: &'static str,
}

/// Pending changes to `[Content_Types].xml` and `_rels/.rels`.
struct ManifestEdits<'p, 'data> {
    package: &'p OpcPackage<'data>,
    rels: Relationships,
    content_types_xml: Option<Vec<u8>>,
    rels_xml: Option<Vec<u8>>,
}

impl<'p, 'data> ManifestEdits<'p, 'data> {
    fn new(package: &'p OpcPackage<'data>) -> Self {
        Self {
            package,
            rels: package.rels().clone(),
            content_types_xml: None,
            rels_xml: None,
        }
    }

    /// Bytes of an existing property part, or the empty template plus the
    /// manifest entries that make a new part reachable.
    fn load_or_create(&mut self, target: &PropertyTarget<'_>) -> Result<(PackURI, Vec<u8>)> {
        if let Some(uri) = present(self.package, target.located) {
            return Ok((uri.clone(), self.package.blob(uri)?));
        }

        let partname = match target.located {
            // Relationship present but its target is missing: recreate it there.
            Some(uri) => uri.clone(),
            None => {
                let default = PackURI::new(target.default_partname).map_err(OpcError::InvalidPackUri)?;
                if self.package.contains_part(&default) {
                    self.package.next_partname(target.partname_template)?
                } else {
                    default
                }
            },
        };
        debug!(part = %partname, "Creating property part");

        if !self.package.content_types().has_override(&partname) {
            let current = self
                .content_types_xml
                .as_deref()
                .unwrap_or(self.package.content_types_xml());
            self.content_types_xml = Some(manifest::add_content_type_override(
                current,
                &partname,
                target.content_type,
            )?);
        }

        if target.located.is_none() {
            let r_id = self.rels.next_r_id();
            let target_ref = partname.relative_ref(PACKAGE_URI);
            let current = self.rels_xml.as_deref().unwrap_or(self.package.pkg_rels_xml());
            self.rels_xml = Some(manifest::add_relationship(
                current,
                &r_id,
                target.reltype,
                &target_ref,
            )?);
            self.rels
                .add_relationship(target.reltype.to_string(), target_ref, r_id, false);
        }

        Ok((partname, target.template.as_bytes().to_vec()))
    }

    /// Manifests that changed, as parts.
    fn into_parts(self) -> Result<Vec<Part>> {
        let mut parts = Vec::new();
        if let Some(xml) = self.content_types_xml {
            parts.push(Part::new(
                PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?,
                ct::XML,
                xml,
            ));
        }
        if let Some(xml) = self.rels_xml {
            parts.push(Part::new(
                PackURI::new(PACKAGE_RELS_URI).map_err(OpcError::InvalidPackUri)?,
                ct::OPC_RELATIONSHIPS,
                xml,
            ));
        }
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::PackageBuilder;
    use crate::ooxml::opc::pkgreader::{ContentTypeMap, parse_rels_xml};

    fn open_and_locate(bytes: &[u8]) -> (OpcPackage<'_>, MetadataParts) {
        let pkg = OpcPackage::open(bytes, 1 << 20).unwrap();
        let parts = locate_metadata_parts(&pkg).unwrap();
        (pkg, parts)
    }

    #[test]
    fn test_read_metadata() {
        let bytes = PackageBuilder::docx().build();
        let (pkg, parts) = open_and_locate(&bytes);
        let meta = read_metadata(&pkg, &parts, DocumentKind::WordProcessing).unwrap();

        assert_eq!(meta.author(), Some("Jane Doe"));
        assert_eq!(meta.last_modified_by(), Some("John Smith"));
        assert_eq!(meta.app.text("application"), Some("Microsoft Office Word"));
        assert!(meta.custom.is_empty());
    }

    #[test]
    fn test_transform_without_edits() {
        let bytes = PackageBuilder::docx().build();
        let (pkg, parts) = open_and_locate(&bytes);
        let out = transform(&pkg, &parts, &ResolvedEdits::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_transform_core_only() {
        let bytes = PackageBuilder::docx().build();
        let (pkg, parts) = open_and_locate(&bytes);
        let edits = EditSet::new()
            .set("author", "Alice")
            .resolve(UnknownFieldPolicy::Reject)
            .unwrap();

        let out = transform(&pkg, &parts, &edits).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].partname().as_str(), "/docProps/core.xml");
        assert_eq!(out[0].content_type(), ct::OPC_CORE_PROPERTIES);

        let core = core_props::read_core(out[0].blob(), "/docProps/core.xml").unwrap();
        assert_eq!(core.text("creator"), Some("Alice"));
    }

    #[test]
    fn test_transform_creates_custom_part() {
        let bytes = PackageBuilder::docx().build();
        let (pkg, parts) = open_and_locate(&bytes);
        let edits = EditSet::new()
            .set("custom:Client", "Initech")
            .resolve(UnknownFieldPolicy::Reject)
            .unwrap();

        let out = transform(&pkg, &parts, &edits).unwrap();
        let names: Vec<&str> = out.iter().map(|p| p.partname().as_str()).collect();
        assert_eq!(
            names,
            ["/docProps/custom.xml", "/[Content_Types].xml", "/_rels/.rels"]
        );

        let custom = custom_props::read_custom(out[0].blob(), "/docProps/custom.xml").unwrap();
        assert_eq!(custom.text("Client"), Some("Initech"));

        let content_types = ContentTypeMap::from_xml(out[1].blob()).unwrap();
        assert_eq!(
            content_types.get(&PackURI::new("/docProps/custom.xml").unwrap()),
            Some(ct::OFC_CUSTOM_PROPERTIES)
        );

        let rels = parse_rels_xml(out[2].blob(), PACKAGE_URI).unwrap();
        let rel = rels.part_with_reltype(rt::CUSTOM_PROPERTIES).unwrap();
        assert_eq!(rel.target_ref(), "docProps/custom.xml");
        assert!(pkg.rels().get(rel.r_id()).is_none());
    }

    #[test]
    fn test_transform_creates_app_and_custom() {
        let bytes = PackageBuilder::xlsx().without_app().build();
        let (pkg, parts) = open_and_locate(&bytes);
        let edits = EditSet::new()
            .set("company", "Acme")
            .set("custom:Budget", 5)
            .resolve(UnknownFieldPolicy::Reject)
            .unwrap();

        let out = transform(&pkg, &parts, &edits).unwrap();
        let rels_part = out
            .iter()
            .find(|p| p.partname().as_str() == PACKAGE_RELS_URI)
            .unwrap();
        let rels = parse_rels_xml(rels_part.blob(), PACKAGE_URI).unwrap();

        let app = rels.part_with_reltype(rt::EXTENDED_PROPERTIES).unwrap();
        let custom = rels.part_with_reltype(rt::CUSTOM_PROPERTIES).unwrap();
        assert_ne!(app.r_id(), custom.r_id());
        assert_eq!(rels.len(), pkg.rels().len() + 2);
    }
}
