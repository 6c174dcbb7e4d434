//! XML namespaces used in OOXML

/// WordprocessingML main namespace
pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Word 2010 extensions
pub const W14: &str = "http://schemas.microsoft.com/office/word/2010/wordml";
/// Relationships namespace
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Drawing namespace
pub const WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
/// Word 2010 drawing extensions
pub const WP14: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing";
/// DrawingML main namespace
pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// DrawingML 2010 extensions
pub const A14: &str = "http://schemas.microsoft.com/office/drawing/2010/main";
/// Pictures namespace
pub const PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
/// Word processing group
pub const WPG: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingGroup";
/// Word processing shape
pub const WPS: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingShape";
/// Markup compatibility
pub const MC: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
/// VML
pub const V: &str = "urn:schemas-microsoft-com:vml";
/// VML office extensions
pub const O: &str = "urn:schemas-microsoft-com:office:office";
/// VML word extensions
pub const W10: &str = "urn:schemas-microsoft-com:office:word";
/// Reserved `xml:` prefix
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
/// Content Types namespace
pub const CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
/// Package Relationships namespace
pub const PR: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Resolved namespace of an element or attribute.
///
/// Decoders dispatch on `(Ns, local-name)` pairs so that producers are
/// free to pick their own prefixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ns {
    W,
    W14,
    R,
    Wp,
    Wp14,
    A,
    A14,
    Pic,
    Wpg,
    Wps,
    Mc,
    V,
    O,
    W10,
    Xml,
    Ct,
    Pr,
    /// Unprefixed (no default namespace in scope)
    None,
    /// Bound to a namespace this crate does not model
    Other,
}

impl Ns {
    /// Classify a namespace URI
    pub fn from_uri(uri: &[u8]) -> Self {
        match uri {
            u if u == W.as_bytes() => Ns::W,
            u if u == W14.as_bytes() => Ns::W14,
            u if u == R.as_bytes() => Ns::R,
            u if u == WP.as_bytes() => Ns::Wp,
            u if u == WP14.as_bytes() => Ns::Wp14,
            u if u == A.as_bytes() => Ns::A,
            u if u == A14.as_bytes() => Ns::A14,
            u if u == PIC.as_bytes() => Ns::Pic,
            u if u == WPG.as_bytes() => Ns::Wpg,
            u if u == WPS.as_bytes() => Ns::Wps,
            u if u == MC.as_bytes() => Ns::Mc,
            u if u == V.as_bytes() => Ns::V,
            u if u == O.as_bytes() => Ns::O,
            u if u == W10.as_bytes() => Ns::W10,
            u if u == XML.as_bytes() => Ns::Xml,
            u if u == CT.as_bytes() => Ns::Ct,
            u if u == PR.as_bytes() => Ns::Pr,
            _ => Ns::Other,
        }
    }
}

/// Standard namespace declarations for document, header and footer parts
pub fn document_namespaces() -> Vec<(&'static str, &'static str)> {
    vec![
        ("xmlns:w", W),
        ("xmlns:r", R),
        ("xmlns:wp", WP),
        ("xmlns:a", A),
        ("xmlns:pic", PIC),
        ("xmlns:wpg", WPG),
        ("xmlns:wps", WPS),
        ("xmlns:mc", MC),
        ("xmlns:v", V),
        ("xmlns:o", O),
        ("xmlns:w10", W10),
        ("xmlns:w14", W14),
        ("xmlns:wp14", WP14),
        ("xmlns:a14", A14),
    ]
}

/// Merge the standard declarations into a parsed root's attributes.
///
/// Declarations already present keep their value. `mc:Ignorable` is added
/// when missing so that w14/wp14 content stays readable by older consumers.
pub fn complete_root_attributes(attrs: &mut Vec<(String, String)>) {
    for (key, uri) in document_namespaces() {
        if !attrs.iter().any(|(k, _)| k == key) {
            attrs.push((key.to_string(), uri.to_string()));
        }
    }
    if !attrs.iter().any(|(k, _)| k == "mc:Ignorable") {
        attrs.push(("mc:Ignorable".to_string(), "w14 wp14".to_string()));
    }
}
