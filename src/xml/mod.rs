//! XML plumbing: namespaces, the element walker, scalar codecs and raw
//! subtree preservation

mod namespace;
mod raw;
mod reader;
mod values;
pub(crate) mod writer;

pub use namespace::*;
pub use raw::{RawXmlElement, RawXmlNode};
pub use reader::{Attr, Element, PartReader};
pub(crate) use values::xml_enum;
pub use values::{
    twips_from_inches, twips_from_points, Emu, LongHexNum, OptBool, XmlEnum, EMU_PER_CM,
    EMU_PER_INCH, EMU_PER_PIXEL, EMU_PER_POINT, TWIPS_PER_INCH,
};

use crate::error::Result;
use quick_xml::Writer;

/// Encode a node into a standalone string, mainly for tests and debugging
pub(crate) fn to_xml_string<F>(f: F) -> Result<String>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> Result<()>,
{
    let mut writer = Writer::new(Vec::new());
    f(&mut writer)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| crate::error::Error::InvalidDocument(e.to_string()))
}
