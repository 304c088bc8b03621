//! Locating the property parts through the package relationships.

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{OpcError, OpcPackage, PackURI};

/// Partnames of the property parts a package declares.
///
/// `app` and `custom` are `Some` whenever the package has the relationship,
/// even if the target entry is absent from the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataParts {
    pub core: PackURI,
    pub app: Option<PackURI>,
    pub custom: Option<PackURI>,
}

/// Resolve the core, application and custom property parts.
///
/// Only the core part is required: a missing core-properties relationship, or
/// one whose target is not in the archive, is [`OoxmlError::PartNotFound`].
pub fn locate_metadata_parts(package: &OpcPackage<'_>) -> Result<MetadataParts> {
    let core = match optional_target(package, rt::CORE_PROPERTIES)? {
        Some(core) if package.contains_part(&core) => core,
        Some(core) => {
            return Err(OoxmlError::PartNotFound(format!(
                "core properties part {} is not in the package",
                core
            )));
        },
        None => {
            return Err(OoxmlError::PartNotFound(
                "package has no core properties relationship".to_string(),
            ));
        },
    };

    Ok(MetadataParts {
        core,
        app: optional_target(package, rt::EXTENDED_PROPERTIES)?,
        custom: optional_target(package, rt::CUSTOM_PROPERTIES)?,
    })
}

/// Target of the single package relationship of `reltype`, if there is one.
fn optional_target(package: &OpcPackage<'_>, reltype: &str) -> Result<Option<PackURI>> {
    match package.rels().part_with_reltype(reltype) {
        Ok(rel) => Ok(Some(rel.target_partname()?)),
        Err(OpcError::RelationshipNotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::PackageBuilder;

    #[test]
    fn test_locate_parts() {
        let bytes = PackageBuilder::docx().build();
        let pkg = OpcPackage::open(&bytes, 1 << 20).unwrap();
        let parts = locate_metadata_parts(&pkg).unwrap();

        assert_eq!(parts.core.as_str(), "/docProps/core.xml");
        assert_eq!(parts.app.as_ref().map(PackURI::as_str), Some("/docProps/app.xml"));
        assert_eq!(parts.custom, None);
    }

    #[test]
    fn test_missing_core_relationship() {
        let bytes = PackageBuilder::docx().without_core_rel().build();
        let pkg = OpcPackage::open(&bytes, 1 << 20).unwrap();
        assert!(matches!(
            locate_metadata_parts(&pkg),
            Err(OoxmlError::PartNotFound(_))
        ));
    }

    #[test]
    fn test_dangling_core_relationship() {
        let bytes = PackageBuilder::docx().without_core_part().build();
        let pkg = OpcPackage::open(&bytes, 1 << 20).unwrap();
        assert!(matches!(
            locate_metadata_parts(&pkg),
            Err(OoxmlError::PartNotFound(_))
        ));
    }

    #[test]
    fn test_without_app() {
        let bytes = PackageBuilder::pptx().without_app().build();
        let pkg = OpcPackage::open(&bytes, 1 << 20).unwrap();
        let parts = locate_metadata_parts(&pkg).unwrap();
        assert_eq!(parts.app, None);
    }
}
