//! Part URI handling for OPC packages

use crate::error::{Error, Result};
use std::fmt;

/// Represents a URI to a part within an OPC package.
///
/// Part URIs are always absolute paths starting with '/'.
/// Example: `/word/document.xml`. The package itself is addressed by the
/// root URI `/`, which owns `/_rels/.rels`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartUri {
    path: String,
}

impl PartUri {
    /// Create a new PartUri from a string.
    ///
    /// The path will be normalized (leading '/' ensured, no trailing '/',
    /// backslashes turned into forward slashes).
    pub fn new(path: &str) -> Result<Self> {
        let path = path.trim().replace('\\', "/");

        if path.is_empty() || path == "/" {
            return Err(Error::InvalidPartUri(format!("'{}' does not name a part", path)));
        }

        let normalized = if path.starts_with('/') {
            path.clone()
        } else {
            format!("/{}", path)
        };
        let normalized = normalized.trim_end_matches('/').to_string();

        if normalized.contains("//") {
            return Err(Error::InvalidPartUri(format!(
                "invalid path '{}': contains double slashes",
                path
            )));
        }

        Ok(Self { path: normalized })
    }

    /// The package root, owner of the package-level relationships
    pub fn root() -> Self {
        Self { path: "/".into() }
    }

    /// Whether this is the package root
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Path inside the zip archive (no leading '/')
    pub fn zip_name(&self) -> &str {
        self.path.trim_start_matches('/')
    }

    /// Get the file name portion
    pub fn file_name(&self) -> Option<&str> {
        self.path.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the file extension
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        let (_, ext) = name.rsplit_once('.')?;
        Some(ext).filter(|ext| !ext.is_empty())
    }

    /// Directory holding this part, without trailing '/' (`""` at top level)
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(pos) => &self.path[..pos],
            None => "",
        }
    }

    /// Get the relationships URI for this part.
    ///
    /// For `/word/document.xml`, returns `/word/_rels/document.xml.rels`;
    /// for the root, `/_rels/.rels`.
    pub fn relationships_uri(&self) -> PartUri {
        let file_name = self.file_name().unwrap_or("");
        PartUri {
            path: format!("{}/_rels/{}.rels", self.directory(), file_name),
        }
    }

    /// Resolve a relationship target against this part's directory.
    ///
    /// For `/word/document.xml` and `../media/image1.png`, returns
    /// `/media/image1.png`; for `header2.xml`, `/word/header2.xml`.
    pub fn resolve(&self, target: &str) -> Result<PartUri> {
        let target = target.replace('\\', "/");
        if target.starts_with('/') {
            return PartUri::new(&target);
        }

        let mut segments: Vec<&str> = self
            .directory()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        for segment in target.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }

        PartUri::new(&format!("/{}", segments.join("/")))
    }

    /// Express `self` as a target relative to the directory of `owner`
    pub fn relative_to(&self, owner: &PartUri) -> String {
        let base: Vec<&str> = owner.directory().split('/').filter(|s| !s.is_empty()).collect();
        let own: Vec<&str> = self.path.split('/').filter(|s| !s.is_empty()).collect();

        let common = base
            .iter()
            .zip(own.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = std::iter::repeat("..").take(base.len() - common).collect();
        parts.extend(&own[common..]);
        parts.join("/")
    }

    /// Check if this URI points to a relationships file
    pub fn is_relationships(&self) -> bool {
        self.path.contains("/_rels/") && self.path.ends_with(".rels")
    }
}

impl fmt::Display for PartUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl std::str::FromStr for PartUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PartUri::new(s)
    }
}

/// Well-known part URIs
pub mod well_known {
    use super::PartUri;

    fn uri(path: &str) -> PartUri {
        PartUri { path: path.into() }
    }

    pub fn content_types() -> PartUri {
        uri("/[Content_Types].xml")
    }

    pub fn package_rels() -> PartUri {
        uri("/_rels/.rels")
    }

    pub fn document() -> PartUri {
        uri("/word/document.xml")
    }

    pub fn styles() -> PartUri {
        uri("/word/styles.xml")
    }

    pub fn numbering() -> PartUri {
        uri("/word/numbering.xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes() {
        assert_eq!(PartUri::new("word/document.xml").unwrap().as_str(), "/word/document.xml");
        assert_eq!(PartUri::new("word\\media\\a.png").unwrap().as_str(), "/word/media/a.png");
        assert!(PartUri::new("").is_err());
        assert!(PartUri::new("/a//b").is_err());
    }

    #[test]
    fn test_file_name_and_extension() {
        let uri = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(uri.file_name(), Some("document.xml"));
        assert_eq!(uri.extension(), Some("xml"));
        assert_eq!(PartUri::new("/word/README").unwrap().extension(), None);
    }

    #[test]
    fn test_relationships_uri() {
        let uri = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(uri.relationships_uri().as_str(), "/word/_rels/document.xml.rels");
        assert_eq!(PartUri::root().relationships_uri().as_str(), "/_rels/.rels");
    }

    #[test]
    fn test_resolve_against_referencing_directory() {
        let doc = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(doc.resolve("header2.xml").unwrap().as_str(), "/word/header2.xml");
        assert_eq!(doc.resolve("../media/image1.png").unwrap().as_str(), "/media/image1.png");
        assert_eq!(doc.resolve("/customXml/item1.xml").unwrap().as_str(), "/customXml/item1.xml");

        let root = PartUri::root();
        assert_eq!(root.resolve("word/document.xml").unwrap().as_str(), "/word/document.xml");
    }

    #[test]
    fn test_relative_to() {
        let doc = PartUri::new("/word/document.xml").unwrap();
        let media = PartUri::new("/word/media/image1.png").unwrap();
        assert_eq!(media.relative_to(&doc), "media/image1.png");

        let outside = PartUri::new("/customXml/item1.xml").unwrap();
        assert_eq!(outside.relative_to(&doc), "../customXml/item1.xml");
        assert_eq!(doc.relative_to(&PartUri::root()), "word/document.xml");
    }

    #[test]
    fn test_is_relationships() {
        assert!(PartUri::new("/word/_rels/document.xml.rels").unwrap().is_relationships());
        assert!(!PartUri::new("/word/document.xml").unwrap().is_relationships());
    }
}
