//! Error types for docx-agent-rs

use crate::document::LoadStage;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML encoding error: {0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The token stream of a part is not well-formed XML
    #[error("malformed XML in {part} at byte {offset}{}: {message}", element_suffix(.element))]
    MalformedXml {
        part: String,
        element: Option<String>,
        offset: u64,
        message: String,
    },

    /// An `r:id` that is absent from the referencing part's relationship set
    #[error("relationship '{id}' not found in relationships of {part}")]
    UnresolvedRelationship { part: String, id: String },

    /// A part the load cannot continue without
    #[error("missing required part {part} (stage: {stage})")]
    MissingRequiredPart { stage: LoadStage, part: String },

    /// Neither an override nor an extension default matches (strict mode)
    #[error("no content type declared for {part}")]
    UnknownContentType { part: String },

    /// Enumerated attribute outside its value set (strict mode)
    #[error("invalid value '{value}' for {element}@{attribute} in {part}, expected {expected}")]
    InvalidEnumValue {
        part: String,
        element: String,
        attribute: String,
        value: String,
        expected: &'static str,
    },

    /// Numeric or hex scalar that does not parse (strict mode)
    #[error("invalid {expected} '{value}' for {element}@{attribute} in {part}")]
    InvalidValue {
        part: String,
        element: String,
        attribute: String,
        value: String,
        expected: &'static str,
    },

    /// More than one member of a choice group was present; only logged
    #[error("inconsistent choice group in {element}: kept {kept}, dropped {dropped}")]
    InconsistentChoiceGroup {
        element: String,
        kept: String,
        dropped: String,
    },

    /// Failure inside the package load state machine
    #[error("load failed at stage {stage}: {source}")]
    Load {
        stage: LoadStage,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid part URI: {0}")]
    InvalidPartUri(String),

    #[error("Missing attribute '{attr}' on element '{element}'")]
    MissingAttribute { element: String, attr: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

fn element_suffix(element: &Option<String>) -> String {
    match element {
        Some(name) => format!(" (in <{}>)", name),
        None => String::new(),
    }
}

impl Error {
    /// Tag an error with the load stage it happened in.
    ///
    /// Errors that already carry a stage are returned unchanged.
    pub(crate) fn at_stage(self, stage: LoadStage) -> Self {
        match self {
            err @ (Error::Load { .. } | Error::MissingRequiredPart { .. }) => err,
            other => Error::Load {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The load stage this error is tagged with, if any
    pub fn stage(&self) -> Option<LoadStage> {
        match self {
            Error::Load { stage, .. } | Error::MissingRequiredPart { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Strip the stage wrapper, returning the underlying error
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Load { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
