//! Namespace-aware element walker shared by every part decoder
//!
//! A composite node's decode is a loop over its children: each start tag
//! is resolved to `(Ns, local-name)` and handed to the node's dispatch
//! closure; children the closure does not claim are skipped to their
//! matching end tag. The loop ends on the node's own end tag.

use crate::error::{Error, Result};
use crate::xml::{LongHexNum, Ns, OptBool, XmlEnum};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::NsReader;
use std::io::BufRead;
use std::str::FromStr;

/// Attribute with its namespace resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr {
    pub ns: Ns,
    pub local: String,
    /// Qualified name as written by the producer
    pub qname: String,
    pub value: String,
}

/// Start or empty tag with namespaces resolved
#[derive(Debug)]
pub struct Element<'a> {
    pub ns: Ns,
    pub start: &'a BytesStart<'a>,
    /// `<x/>` rather than `<x>...</x>`
    pub empty: bool,
    attrs: Vec<Attr>,
}

impl<'a> Element<'a> {
    /// Local name bytes, used as the second half of the dispatch key
    pub fn local(&self) -> &'a [u8] {
        self.start.local_name().into_inner()
    }

    /// Qualified name for diagnostics
    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Attributes as written, namespace declarations included
    pub fn raw_attributes(&self) -> Vec<(String, String)> {
        self.attrs
            .iter()
            .map(|a| (a.qname.clone(), a.value.clone()))
            .collect()
    }

    /// Attribute value by namespace and local name.
    ///
    /// WordprocessingML attributes also match when written unprefixed.
    pub fn attr(&self, ns: Ns, local: &str) -> Option<&str> {
        let found = self
            .attrs
            .iter()
            .find(|a| a.ns == ns && a.local == local)
            .map(|a| a.value.as_str());
        match (found, ns) {
            (None, Ns::W) => self.attr(Ns::None, local),
            (found, _) => found,
        }
    }

    /// Owned attribute value
    pub fn string(&self, ns: Ns, local: &str) -> Option<String> {
        self.attr(ns, local).map(str::to_string)
    }

    /// `w:val`, the common single-value attribute
    pub fn val(&self) -> Option<&str> {
        self.attr(Ns::W, "val")
    }

    /// `xml:space`
    pub fn xml_space(&self) -> Option<&str> {
        self.attr(Ns::Xml, "space").or_else(|| {
            self.attrs
                .iter()
                .find(|a| a.qname == "xml:space")
                .map(|a| a.value.as_str())
        })
    }
}

/// Decoder state for one part: the token stream, the part path used in
/// diagnostics, and the validation mode.
pub struct PartReader<R> {
    inner: NsReader<R>,
    part: String,
    strict: bool,
}

impl<'i> PartReader<&'i [u8]> {
    /// Reader over an in-memory part
    pub fn from_bytes(part: impl Into<String>, bytes: &'i [u8], strict: bool) -> Self {
        Self::new(part, NsReader::from_reader(bytes), strict)
    }
}

impl<R: BufRead> PartReader<R> {
    pub fn new(part: impl Into<String>, inner: NsReader<R>, strict: bool) -> Self {
        Self {
            inner,
            part: part.into(),
            strict,
        }
    }

    /// Path of the part being decoded
    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Current byte offset in the part
    pub fn offset(&self) -> u64 {
        self.inner.buffer_position() as u64
    }

    /// Build a `MalformedXml` error at the current position
    pub fn malformed(&self, element: Option<String>, message: impl Into<String>) -> Error {
        Error::MalformedXml {
            part: self.part.clone(),
            element,
            offset: self.offset(),
            message: message.into(),
        }
    }

    /// Read the next token, mapping tokenizer failures to `MalformedXml`
    pub(crate) fn next_event<'b>(
        &mut self,
        buf: &'b mut Vec<u8>,
        context: &Element<'_>,
    ) -> Result<Event<'b>> {
        match self.inner.read_event_into(buf) {
            Ok(event) => Ok(event),
            Err(e) => Err(self.malformed(Some(context.name()), e.to_string())),
        }
    }

    /// Advance to the root element, check its name, and decode it with `f`
    pub fn read_root<T, F>(&mut self, expected: (Ns, &[u8]), f: F) -> Result<T>
    where
        F: FnOnce(&mut Self, &Element<'_>) -> Result<T>,
    {
        let mut buf = Vec::new();
        loop {
            let event = match self.inner.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => return Err(self.malformed(None, e.to_string())),
            };
            match event {
                Event::Start(e) => {
                    let el = self.element(&e, false)?;
                    self.check_root(&el, expected)?;
                    return f(self, &el);
                }
                Event::Empty(e) => {
                    let el = self.element(&e, true)?;
                    self.check_root(&el, expected)?;
                    return f(self, &el);
                }
                Event::Eof => return Err(self.malformed(None, "missing root element")),
                _ => {}
            }
            buf.clear();
        }
    }

    fn check_root(&self, el: &Element<'_>, expected: (Ns, &[u8])) -> Result<()> {
        if (el.ns, el.local()) == expected {
            Ok(())
        } else {
            Err(self.malformed(
                Some(el.name()),
                format!(
                    "unexpected root element, expected '{}'",
                    String::from_utf8_lossy(expected.1)
                ),
            ))
        }
    }

    /// Walk the children of `parent`.
    ///
    /// `f` returns `true` when it consumed the child; unclaimed children are
    /// skipped wholesale. Text between children is ignored.
    pub fn children<F>(&mut self, parent: &Element<'_>, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self, &Element<'_>) -> Result<bool>,
    {
        if parent.empty {
            return Ok(());
        }

        let mut buf = Vec::new();
        loop {
            match self.next_event(&mut buf, parent)? {
                Event::Start(e) => {
                    let child = self.element(&e, false)?;
                    if !f(self, &child)? {
                        log::trace!("{}: skipping <{}>", self.part, child.name());
                        self.skip(&child)?;
                    }
                }
                Event::Empty(e) => {
                    let child = self.element(&e, true)?;
                    if !f(self, &child)? {
                        log::trace!("{}: skipping <{}/>", self.part, child.name());
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(self.malformed(Some(parent.name()), "unexpected end of input"))
                }
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    /// Consume an element's content up to its end tag
    pub fn skip(&mut self, el: &Element<'_>) -> Result<()> {
        if el.empty {
            return Ok(());
        }
        let mut buf = Vec::new();
        let name = QName(el.start.name().into_inner());
        match self.inner.read_to_end_into(name, &mut buf) {
            Ok(_) => Ok(()),
            Err(e) => Err(self.malformed(Some(el.name()), e.to_string())),
        }
    }

    /// Character data of a leaf element such as `w:t` or `wp:posOffset`
    pub fn text(&mut self, el: &Element<'_>) -> Result<String> {
        let mut text = String::new();
        if el.empty {
            return Ok(text);
        }

        let mut buf = Vec::new();
        loop {
            match self.next_event(&mut buf, el)? {
                Event::Text(t) => match t.unescape() {
                    Ok(s) => text.push_str(&s),
                    Err(e) => return Err(self.malformed(Some(el.name()), e.to_string())),
                },
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::Start(e) => {
                    let nested = self.element(&e, false)?;
                    self.skip(&nested)?;
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(self.malformed(Some(el.name()), "unexpected end of input"))
                }
                _ => {}
            }
            buf.clear();
        }
        Ok(text)
    }

    /// Resolve the namespaces of a start tag and collect its attributes
    pub(crate) fn element<'b>(&self, start: &'b BytesStart<'b>, empty: bool) -> Result<Element<'b>> {
        let (resolved, _) = self.inner.resolve_element(start.name());
        let ns = classify(&resolved);

        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| {
                self.malformed(
                    Some(String::from_utf8_lossy(start.name().as_ref()).into_owned()),
                    e.to_string(),
                )
            })?;
            let (resolved, local) = self.inner.resolve_attribute(attr.key);
            let value = match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(e) => {
                    return Err(self.malformed(
                        Some(String::from_utf8_lossy(start.name().as_ref()).into_owned()),
                        e.to_string(),
                    ))
                }
            };
            attrs.push(Attr {
                ns: classify(&resolved),
                local: String::from_utf8_lossy(local.into_inner()).into_owned(),
                qname: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                value,
            });
        }

        Ok(Element {
            ns,
            start,
            empty,
            attrs,
        })
    }

    /// Decode an enumerated attribute.
    ///
    /// Unknown tokens are kept as the open variant, or rejected in strict mode.
    pub fn enum_attr<T: XmlEnum>(&self, el: &Element<'_>, ns: Ns, local: &str) -> Result<Option<T>> {
        match el.attr(ns, local) {
            Some(value) => self.check_enum(el, local, value).map(Some),
            None => Ok(None),
        }
    }

    /// Decode `w:val` as an enum
    pub fn enum_val<T: XmlEnum>(&self, el: &Element<'_>) -> Result<Option<T>> {
        self.enum_attr(el, Ns::W, "val")
    }

    fn check_enum<T: XmlEnum>(&self, el: &Element<'_>, attribute: &str, value: &str) -> Result<T> {
        let parsed = T::parse(value);
        if !parsed.is_known() {
            if self.strict {
                return Err(Error::InvalidEnumValue {
                    part: self.part.clone(),
                    element: el.name(),
                    attribute: attribute.to_string(),
                    value: value.to_string(),
                    expected: T::TYPE_NAME,
                });
            }
            log::debug!(
                "{}: keeping unknown {} '{}' on <{}>",
                self.part,
                T::TYPE_NAME,
                value,
                el.name()
            );
        }
        Ok(parsed)
    }

    /// Decode an `ST_OnOff` / `xsd:boolean` attribute
    pub fn bool_attr(&self, el: &Element<'_>, ns: Ns, local: &str) -> Result<OptBool> {
        match el.attr(ns, local) {
            None => Ok(OptBool::UNSET),
            Some(value) => match OptBool::parse(value) {
                Some(b) => Ok(b),
                None => self
                    .reject::<()>(el, local, value, "boolean")
                    .map(|_| OptBool::UNSET),
            },
        }
    }

    /// Toggle property such as `<w:b/>`: present without `w:val` means on
    pub fn toggle(&self, el: &Element<'_>) -> Result<bool> {
        match self.bool_attr(el, Ns::W, "val")?.get() {
            Some(value) => Ok(value),
            None => Ok(true),
        }
    }

    /// Decode a decimal attribute
    pub fn num_attr<T: FromStr>(&self, el: &Element<'_>, ns: Ns, local: &str) -> Result<Option<T>> {
        match el.attr(ns, local) {
            None => Ok(None),
            Some(value) => match value.trim().parse::<T>() {
                Ok(n) => Ok(Some(n)),
                Err(_) => self.reject(el, local, value, "number"),
            },
        }
    }

    /// Decode `w:val` as a number
    pub fn num_val<T: FromStr>(&self, el: &Element<'_>) -> Result<Option<T>> {
        self.num_attr(el, Ns::W, "val")
    }

    /// Decode a `ST_LongHexNumber` attribute
    pub fn hex_attr(&self, el: &Element<'_>, ns: Ns, local: &str) -> Result<Option<LongHexNum>> {
        match el.attr(ns, local) {
            None => Ok(None),
            Some(value) => match LongHexNum::parse(value) {
                Some(n) => Ok(Some(n)),
                None => self.reject(el, local, value, "hex number"),
            },
        }
    }

    /// Decode a number held as element text
    pub fn num_text<T: FromStr>(&mut self, el: &Element<'_>) -> Result<Option<T>> {
        let text = self.text(el)?;
        match text.trim().parse::<T>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => self.reject(el, "#text", &text, "number"),
        }
    }

    /// Report a choice group that carried more than one member.
    ///
    /// The first member by precedence is kept; this is never fatal.
    pub fn choice_conflict(&self, el: &Element<'_>, kept: &str, dropped: &str) {
        let conflict = Error::InconsistentChoiceGroup {
            element: el.name(),
            kept: kept.to_string(),
            dropped: dropped.to_string(),
        };
        log::warn!("{}: {}", self.part, conflict);
    }

    fn reject<T>(
        &self,
        el: &Element<'_>,
        attribute: &str,
        value: &str,
        expected: &'static str,
    ) -> Result<Option<T>> {
        if self.strict {
            return Err(Error::InvalidValue {
                part: self.part.clone(),
                element: el.name(),
                attribute: attribute.to_string(),
                value: value.to_string(),
                expected,
            });
        }
        log::warn!(
            "{}: ignoring invalid {} '{}' for <{}> {}",
            self.part,
            expected,
            value,
            el.name(),
            attribute
        );
        Ok(None)
    }
}

fn classify(resolved: &ResolveResult<'_>) -> Ns {
    match resolved {
        ResolveResult::Bound(ns) => Ns::from_uri(ns.as_ref()),
        ResolveResult::Unbound => Ns::None,
        ResolveResult::Unknown(_) => Ns::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::xml_enum;

    xml_enum! {
        enum Color {
            Red => "red",
            Blue => "blue",
        }
    }

    const SAMPLE: &str = r#"<root xmlns="urn:none" xmlns:x="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
        xmlns:y="urn:schemas-microsoft-com:vml" xmlns:z="urn:schemas-microsoft-com:office:office">
  <x:item x:val="red" z:spid="_x0000_s1" on="true"/>
  <y:shape id="s1"><ignored><deep/></ignored></y:shape>
  <x:t xml:space="preserve"> a &amp; b </x:t>
  <vendor:ext xmlns:vendor="urn:vendor"><x:item/></vendor:ext>
</root>"#;

    #[test]
    fn test_dispatch_by_namespace_not_prefix() {
        let mut r = PartReader::from_bytes("/sample.xml", SAMPLE.as_bytes(), false);
        let mut seen = Vec::new();
        let mut text = String::new();

        r.read_root((Ns::Other, b"root"), |r, root| {
            r.children(root, |r, child| {
                match (child.ns, child.local()) {
                    (Ns::W, b"item") => {
                        let color: Option<Color> = r.enum_val(child)?;
                        assert_eq!(color, Some(Color::Red));
                        assert_eq!(child.attr(Ns::O, "spid"), Some("_x0000_s1"));
                        assert!(r.bool_attr(child, Ns::None, "on")?.is_true());
                        seen.push("item");
                    }
                    (Ns::V, b"shape") => {
                        assert_eq!(child.attr(Ns::None, "id"), Some("s1"));
                        seen.push("shape");
                        return Ok(false);
                    }
                    (Ns::W, b"t") => {
                        assert_eq!(child.xml_space(), Some("preserve"));
                        text = r.text(child)?;
                    }
                    _ => return Ok(false),
                }
                Ok(true)
            })
        })
        .unwrap();

        assert_eq!(seen, vec!["item", "shape"]);
        assert_eq!(text, " a & b ");
    }

    #[test]
    fn test_strict_enum_rejected() {
        let xml = r#"<w:x xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" w:val="green"/>"#;

        let mut lenient = PartReader::from_bytes("/p.xml", xml.as_bytes(), false);
        let color = lenient
            .read_root((Ns::W, b"x"), |r, el| r.enum_val::<Color>(el))
            .unwrap();
        assert_eq!(color, Some(Color::Other("green".into())));

        let mut strict = PartReader::from_bytes("/p.xml", xml.as_bytes(), true);
        let err = strict
            .read_root((Ns::W, b"x"), |r, el| r.enum_val::<Color>(el))
            .unwrap_err();
        match err {
            Error::InvalidEnumValue { part, value, .. } => {
                assert_eq!(part, "/p.xml");
                assert_eq!(value, "green");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_reports_part_and_offset() {
        let xml = r#"<a><b></c></a>"#;
        let mut r = PartReader::from_bytes("/word/broken.xml", xml.as_bytes(), false);
        let err = r
            .read_root((Ns::None, b"a"), |r, root| r.children(root, |_, _| Ok(false)))
            .unwrap_err();

        match err {
            Error::MalformedXml { part, offset, .. } => {
                assert_eq!(part, "/word/broken.xml");
                assert!(offset > 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_number_lenient_and_strict() {
        let xml = r#"<a n="x1"/>"#;
        let mut r = PartReader::from_bytes("/n.xml", xml.as_bytes(), false);
        let n = r
            .read_root((Ns::None, b"a"), |r, el| r.num_attr::<i64>(el, Ns::None, "n"))
            .unwrap();
        assert_eq!(n, None);

        let mut r = PartReader::from_bytes("/n.xml", xml.as_bytes(), true);
        assert!(r
            .read_root((Ns::None, b"a"), |r, el| r.num_attr::<i64>(el, Ns::None, "n"))
            .is_err());
    }
}
