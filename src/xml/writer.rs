//! Small helpers for emitting OOXML with quick-xml

use crate::error::Result;
use crate::xml::{OptBool, RawXmlElement};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;
use std::io::Write;

/// Attribute helpers on start tags
pub trait StartExt {
    /// Push `key="value"`
    fn attr(&mut self, key: &str, value: impl Display) -> &mut Self;
    /// Push the attribute only when a value is present
    fn opt_attr<V: Display>(&mut self, key: &str, value: Option<V>) -> &mut Self;
    /// Push a boolean attribute unless unset
    fn bool_attr(&mut self, key: &str, value: OptBool) -> &mut Self;
}

impl StartExt for BytesStart<'_> {
    fn attr(&mut self, key: &str, value: impl Display) -> &mut Self {
        let value = value.to_string();
        self.push_attribute((key, value.as_str()));
        self
    }

    fn opt_attr<V: Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.attr(key, value);
        }
        self
    }

    fn bool_attr(&mut self, key: &str, value: OptBool) -> &mut Self {
        if let Some(v) = value.as_attr() {
            self.push_attribute((key, v));
        }
        self
    }
}

/// XML declaration used by every part
pub fn write_decl<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(())
}

/// `<name w:val="value"/>`
pub fn write_val<W: Write>(writer: &mut Writer<W>, name: &str, value: impl Display) -> Result<()> {
    let mut elem = BytesStart::new(name);
    elem.attr("w:val", value);
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// `<name w:val="value"/>` when a value is present
pub fn write_opt_val<W: Write, V: Display>(
    writer: &mut Writer<W>,
    name: &str,
    value: Option<V>,
) -> Result<()> {
    match value {
        Some(value) => write_val(writer, name, value),
        None => Ok(()),
    }
}

/// Toggle property: `<w:b/>` for on, `<w:b w:val="0"/>` for off
pub fn write_toggle<W: Write>(writer: &mut Writer<W>, name: &str, value: Option<bool>) -> Result<()> {
    if let Some(on) = value {
        let mut elem = BytesStart::new(name);
        if !on {
            elem.push_attribute(("w:val", "0"));
        }
        writer.write_event(Event::Empty(elem))?;
    }
    Ok(())
}

/// Element holding only character data
pub fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Open an element
pub fn start<W: Write>(writer: &mut Writer<W>, elem: BytesStart<'_>) -> Result<()> {
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

/// Close an element
pub fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write a self-closing element
pub fn empty<W: Write>(writer: &mut Writer<W>, elem: BytesStart<'_>) -> Result<()> {
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// Emit typed children interleaved with preserved raw ones.
///
/// `order` lists child local names in schema sequence and `typed` writes the
/// typed child for one name, if any. Raw children sit after the typed child
/// of the same name; names outside `order` go last.
pub fn write_in_order<W, F>(
    writer: &mut Writer<W>,
    order: &[&str],
    raw: &[RawXmlElement],
    mut typed: F,
) -> Result<()>
where
    W: Write,
    F: FnMut(&mut Writer<W>, &str) -> Result<()>,
{
    for name in order {
        typed(writer, name)?;
        for el in raw.iter().filter(|el| el.local_name() == *name) {
            el.write_to(writer)?;
        }
    }
    for el in raw.iter().filter(|el| !order.contains(&el.local_name())) {
        el.write_to(writer)?;
    }
    Ok(())
}
