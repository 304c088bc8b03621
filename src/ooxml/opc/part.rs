use crate::ooxml::opc::packuri::PackURI;
/// A part produced by a rewrite: a named, typed byte blob.
///
/// Parts read from the package are never materialized as `Part` values; only
/// replaced or newly created parts are, and each is owned by the single request
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// The partname of this part
    partname: PackURI,

    /// The content type of this part
    content_type: String,

    /// The serialized content
    blob: Vec<u8>,
}

impl Part {
    /// Create a new part.
    ///
    /// # Arguments
    /// * `partname` - The part's URI within the package
    /// * `content_type` - The content type recorded for the part
    /// * `blob` - The part's bytes
    pub fn new(partname: PackURI, content_type: impl Into<String>, blob: Vec<u8>) -> Self {
        Self {
            partname,
            content_type: content_type.into(),
            blob,
        }
    }

    /// Get the partname of this part.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Get the content type of this part.
    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Get the binary content of this part.
    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Consume the part and return its content.
    #[inline]
    pub fn into_blob(self) -> Vec<u8> {
        self.blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_accessors() {
        let part = Part::new(
            PackURI::new("/docProps/core.xml").unwrap(),
            "application/xml",
            b"<x/>".to_vec(),
        );
        assert_eq!(part.partname().as_str(), "/docProps/core.xml");
        assert_eq!(part.content_type(), "application/xml");
        assert_eq!(part.blob(), b"<x/>");
        assert_eq!(part.into_blob(), b"<x/>".to_vec());
    }
}
