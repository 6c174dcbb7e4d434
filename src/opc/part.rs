//! Package parts

use crate::opc::{PartUri, Relationships};

/// A named byte blob inside the package, with the relationships it owns
#[derive(Clone, Debug)]
pub struct Part {
    uri: PartUri,
    content_type: String,
    data: Vec<u8>,
    /// Read from, and written to, the sibling `_rels/<name>.rels`
    relationships: Option<Relationships>,
}

impl Part {
    pub fn new(uri: PartUri, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            uri,
            content_type: content_type.into(),
            data,
            relationships: None,
        }
    }

    pub fn uri(&self) -> &PartUri {
        &self.uri
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn relationships(&self) -> Option<&Relationships> {
        self.relationships.as_ref()
    }

    pub(crate) fn set_relationships(&mut self, rels: Relationships) {
        self.relationships = Some(rels);
    }

    /// Relationships of this part, created empty on first use
    pub(crate) fn relationships_or_default(&mut self) -> &mut Relationships {
        self.relationships.get_or_insert_with(Relationships::new)
    }
}
