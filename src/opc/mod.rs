//! Open Packaging Convention (OPC) implementation
//!
//! This module handles the ZIP-based package format used by DOCX files:
//! parts, per-part relationship sets and content types.

mod content_types;
mod package;
mod part;
mod part_uri;
mod relationships;

pub use content_types::{
    image_content_type, ContentTypes, FOOTER, HEADER, MAIN_DOCUMENT, NUMBERING, RELATIONSHIPS,
    STYLES, XML,
};
pub use package::{Package, Target};
pub use part::Part;
pub use part_uri::{well_known, PartUri};
pub use relationships::{rel_types, Relationship, Relationships, TargetMode};
