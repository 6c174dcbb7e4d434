//! # docx-agent-rs
//!
//! A WordprocessingML (.docx) document model with round-trip encoding and a
//! mergeable text projection.
//!
//! ## Features
//!
//! - Staged package loading with errors that name the failing part
//! - Round-trip preservation (unknown elements are kept intact)
//! - Typed drawings: inline and anchored pictures, shapes, groups and VML
//! - A JSON-friendly text projection whose spans can be merged back into
//!   the document
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docx_agent::{projection, Document, LoadOptions, Paragraph};
//!
//! let opts = LoadOptions::new().lenient_parts(true);
//! let mut doc = Document::open_with("example.docx", &opts)?;
//!
//! let mut texts = projection::project_document(&doc);
//! doc.merge_text(&mut texts);
//! for text in &texts {
//!     println!("{}", text.to_json()?);
//! }
//!
//! doc.add_paragraph(Paragraph::new("Hello World!"));
//! doc.save("output.docx")?;
//! ```

pub mod document;
pub mod drawing;
pub mod error;
pub mod opc;
pub mod options;
pub mod projection;
pub mod xml;

pub use document::{Document, LoadStage, Paragraph, Run, Table};
pub use error::{Error, Result};
pub use opc::{Package, Part, PartUri};
pub use options::LoadOptions;
pub use projection::{find_text, project_blocks, project_document, Text, TextBody};
