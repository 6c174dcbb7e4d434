//! Load configuration

/// How strictly a package is decoded.
///
/// ```rust,ignore
/// let opts = LoadOptions::new().strict(true).lenient_parts(true);
/// let doc = Document::from_bytes_with(&bytes, &opts)?;
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject unknown enum tokens, unparsable scalars and parts without a
    /// content type instead of keeping or defaulting them
    pub strict: bool,
    /// Omit a header or footer that fails to decode instead of failing
    /// the whole load
    pub lenient_parts: bool,
}

impl LoadOptions {
    /// Defaults: lenient values, all parts required
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict value validation
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Allow dropping malformed headers and footers
    pub fn lenient_parts(mut self, lenient: bool) -> Self {
        self.lenient_parts = lenient;
        self
    }
}
