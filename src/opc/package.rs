//! OPC Package implementation
//!
//! Handles reading and writing DOCX files as ZIP packages

use crate::document::LoadStage;
use crate::error::{Error, Result};
use crate::opc::relationships::rel_types;
use crate::opc::{ContentTypes, Part, PartUri, Relationships, TargetMode};
use crate::options::LoadOptions;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::read::ZipArchive;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Where a relationship points
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// A part inside the package
    Internal(PartUri),
    /// An external resource such as a hyperlink URL
    External(String),
}

/// An OPC package (ZIP-based container)
#[derive(Debug)]
pub struct Package {
    /// All parts in the package, by URI
    parts: BTreeMap<PartUri, Part>,
    /// Package-level relationships (/_rels/.rels)
    relationships: Relationships,
    /// Content types ([Content_Types].xml)
    content_types: ContentTypes,
}

impl Package {
    /// Create a new empty package
    pub fn new() -> Self {
        Self {
            parts: BTreeMap::new(),
            relationships: Relationships::new(),
            content_types: ContentTypes::new(),
        }
    }

    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), &LoadOptions::default())
    }

    /// Open a package from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes), &LoadOptions::default())
    }

    /// Open a package from a reader
    pub fn from_reader<R: Read + Seek>(reader: R, options: &LoadOptions) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut package = Self::new();

        package.content_types = Self::read_content_types(&mut archive)?;
        package.relationships = Self::read_package_rels(&mut archive)?;
        // Content types must be known before any part is typed
        package.read_parts(&mut archive, options)?;
        package.read_part_relationships(&mut archive)?;

        log::debug!(
            "package opened: {} parts, {} root relationships",
            package.parts.len(),
            package.relationships.len()
        );
        Ok(package)
    }

    /// Save the package to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Save the package to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(Cursor::new(&mut buf))?;
        Ok(buf)
    }

    /// Write the package to a writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options: FileOptions<()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        self.content_types.write_to(&mut zip)?;

        if !self.relationships.is_empty() {
            zip.start_file("_rels/.rels", options)?;
            self.relationships.write_to(&mut zip)?;
        }

        for (uri, part) in &self.parts {
            zip.start_file(uri.zip_name(), options)?;
            zip.write_all(part.data())?;

            if let Some(rels) = part.relationships().filter(|r| !r.is_empty()) {
                zip.start_file(uri.relationships_uri().zip_name(), options)?;
                rels.write_to(&mut zip)?;
            }
        }

        zip.finish()?;
        Ok(())
    }

    /// Get a part by URI
    pub fn part(&self, uri: &PartUri) -> Option<&Part> {
        self.parts.get(uri)
    }

    /// Get a mutable part by URI
    pub fn part_mut(&mut self, uri: &PartUri) -> Option<&mut Part> {
        self.parts.get_mut(uri)
    }

    /// Add or replace a part.
    ///
    /// An override is recorded unless the extension default already gives
    /// the same content type. Relationships of a replaced part are kept.
    pub fn add_part(&mut self, mut part: Part) {
        let uri = part.uri().clone();
        if self.content_types.get(&uri) != Some(part.content_type()) {
            self.content_types.add_override(&uri, part.content_type());
        }
        if part.relationships().is_none() {
            if let Some(rels) = self.parts.get(&uri).and_then(|old| old.relationships()) {
                part.set_relationships(rels.clone());
            }
        }
        self.parts.insert(uri, part);
    }

    /// Remove a part from the package
    pub fn remove_part(&mut self, uri: &PartUri) -> Option<Part> {
        self.content_types.remove_override(uri);
        self.parts.remove(uri)
    }

    /// Get all parts
    pub fn parts(&self) -> impl Iterator<Item = (&PartUri, &Part)> {
        self.parts.iter()
    }

    /// Get package-level relationships
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// Get mutable package-level relationships
    pub fn relationships_mut(&mut self) -> &mut Relationships {
        &mut self.relationships
    }

    /// Get content types
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Get mutable content types
    pub fn content_types_mut(&mut self) -> &mut ContentTypes {
        &mut self.content_types
    }

    /// Relationship set owned by `owner` (the root URI for package level)
    pub fn relationships_of(&self, owner: &PartUri) -> Option<&Relationships> {
        if owner.is_root() {
            Some(&self.relationships)
        } else {
            self.parts.get(owner)?.relationships()
        }
    }

    /// Resolve `id` in the relationship set of `owner`.
    ///
    /// Internal targets are resolved against the owner's directory.
    pub fn resolve(&self, owner: &PartUri, id: &str) -> Result<Target> {
        let rel = self
            .relationships_of(owner)
            .and_then(|rels| rels.get(id))
            .ok_or_else(|| Error::UnresolvedRelationship {
                part: owner.to_string(),
                id: id.to_string(),
            })?;

        match rel.target_mode {
            TargetMode::External => Ok(Target::External(rel.target.clone())),
            TargetMode::Internal => Ok(Target::Internal(owner.resolve(&rel.target)?)),
        }
    }

    /// Register a relationship from `owner`, returning the fresh id.
    ///
    /// Internal targets are stored relative to the owner's directory.
    pub fn register(&mut self, owner: &PartUri, rel_type: &str, target: &Target) -> Result<String> {
        let rels = if owner.is_root() {
            &mut self.relationships
        } else {
            self.parts
                .get_mut(owner)
                .ok_or_else(|| Error::InvalidPartUri(format!("no part {} to own relationships", owner)))?
                .relationships_or_default()
        };

        Ok(match target {
            Target::Internal(uri) => rels.add(rel_type, &uri.relative_to(owner)),
            Target::External(url) => rels.add_external(rel_type, url),
        })
    }

    /// URI of the main document part, from the root `officeDocument` relationship
    pub fn main_document_uri(&self) -> Option<PartUri> {
        let rel = self.relationships.by_type(rel_types::OFFICE_DOCUMENT)?;
        PartUri::root().resolve(&rel.target).ok()
    }

    /// Number of parts under a `media/` directory
    pub fn media_count(&self) -> usize {
        self.parts
            .keys()
            .filter(|uri| uri.directory().ends_with("/media"))
            .count()
    }

    fn read_content_types<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<ContentTypes> {
        let mut file = archive
            .by_name("[Content_Types].xml")
            .map_err(|_| Error::MissingRequiredPart {
                stage: LoadStage::Unopened,
                part: "/[Content_Types].xml".into(),
            })?;

        let mut content = Vec::new();
        file.read_to_end(&mut content)?;

        ContentTypes::from_xml(&content)
    }

    fn read_package_rels<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Relationships> {
        match archive.by_name("_rels/.rels") {
            Ok(mut file) => {
                let mut content = Vec::new();
                file.read_to_end(&mut content)?;
                Relationships::from_xml("/_rels/.rels", &content)
            }
            Err(_) => Ok(Relationships::new()),
        }
    }

    fn read_parts<R: Read + Seek>(
        &mut self,
        archive: &mut ZipArchive<R>,
        options: &LoadOptions,
    ) -> Result<()> {
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            if name.ends_with('/') || name == "[Content_Types].xml" {
                continue;
            }

            let uri = PartUri::new(&name)?;

            // Relationship files are attached to their owners below
            if uri.is_relationships() {
                continue;
            }

            let content_type = self.content_types.resolve(&uri, options.strict)?;

            let mut data = Vec::new();
            file.read_to_end(&mut data)?;

            self.parts.insert(uri.clone(), Part::new(uri, content_type, data));
        }

        Ok(())
    }

    fn read_part_relationships<R: Read + Seek>(&mut self, archive: &mut ZipArchive<R>) -> Result<()> {
        for (uri, part) in self.parts.iter_mut() {
            let rels_uri = uri.relationships_uri();

            if let Ok(mut file) = archive.by_name(rels_uri.zip_name()) {
                let mut content = Vec::new();
                file.read_to_end(&mut content)?;
                part.set_relationships(Relationships::from_xml(rels_uri.as_str(), &content)?);
            }
        }

        Ok(())
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}
