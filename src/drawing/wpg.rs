//! Word processing groups (`wpg:wgp`)

use crate::drawing::picture::Picture;
use crate::drawing::shape_props::BlackWhiteMode;
use crate::drawing::types::{GroupLocks, NonVisualProps, Transform2D};
use crate::drawing::wps::WpsShape;
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, Ns, PartReader, XmlEnum};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// Member of a group
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupMember {
    /// `wps:wsp`
    Shape(WpsShape),
    /// `pic:pic`
    Picture(Picture),
    /// `wpg:grpSp`, a nested group
    Group(WpgGroup),
}

/// `wpg:wgp` or nested `wpg:grpSp`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WpgGroup {
    /// `wpg:cNvPr`, only on nested groups
    pub c_nv_pr: Option<NonVisualProps>,
    /// `wpg:cNvGrpSpPr/a:grpSpLocks`
    pub locks: Option<GroupLocks>,
    /// `wpg:grpSpPr@bwMode`
    pub bw_mode: Option<BlackWhiteMode>,
    /// `wpg:grpSpPr/a:xfrm`
    pub xfrm: Option<Transform2D>,
    pub members: Vec<GroupMember>,
}

impl WpgGroup {
    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut group = Self::default();

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::Wpg, b"cNvPr") => group.c_nv_pr = Some(NonVisualProps::decode(r, child)?),
                (Ns::Wpg, b"cNvGrpSpPr") => r.children(child, |r, c| {
                    if (c.ns, c.local()) == (Ns::A, b"grpSpLocks".as_slice()) {
                        group.locks = Some(GroupLocks::decode(r, c)?);
                    }
                    Ok(false)
                })?,
                (Ns::Wpg, b"grpSpPr") => {
                    group.bw_mode = r.enum_attr(child, Ns::None, "bwMode")?;
                    r.children(child, |r, c| {
                        if (c.ns, c.local()) == (Ns::A, b"xfrm".as_slice()) {
                            group.xfrm = Some(Transform2D::decode(r, c)?);
                            return Ok(true);
                        }
                        Ok(false)
                    })?;
                }
                (Ns::Wps, b"wsp") => group
                    .members
                    .push(GroupMember::Shape(WpsShape::decode(r, child)?)),
                (Ns::Pic, b"pic") => group
                    .members
                    .push(GroupMember::Picture(Picture::decode(r, child)?)),
                (Ns::Wpg, b"grpSp") => group
                    .members
                    .push(GroupMember::Group(WpgGroup::decode(r, child)?)),
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(group)
    }

    /// Encode as `name` (`wpg:wgp` at the top, `wpg:grpSp` when nested)
    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        writer::start(writer, BytesStart::new(name))?;

        if let Some(c_nv_pr) = &self.c_nv_pr {
            c_nv_pr.write_to(writer, "wpg:cNvPr")?;
        }
        match &self.locks {
            Some(locks) => {
                writer::start(writer, BytesStart::new("wpg:cNvGrpSpPr"))?;
                locks.write_to(writer, "a:grpSpLocks")?;
                writer::end(writer, "wpg:cNvGrpSpPr")?;
            }
            None => writer::empty(writer, BytesStart::new("wpg:cNvGrpSpPr"))?,
        }

        let mut grp_sp_pr = BytesStart::new("wpg:grpSpPr");
        grp_sp_pr.opt_attr("bwMode", self.bw_mode.as_ref().map(XmlEnum::as_str));
        match &self.xfrm {
            Some(xfrm) => {
                writer::start(writer, grp_sp_pr)?;
                xfrm.write_to(writer)?;
                writer::end(writer, "wpg:grpSpPr")?;
            }
            None => writer::empty(writer, grp_sp_pr)?,
        }

        for member in &self.members {
            match member {
                GroupMember::Shape(shape) => shape.write_to(writer)?,
                GroupMember::Picture(pic) => pic.write_to(writer)?,
                GroupMember::Group(group) => group.write_to(writer, "wpg:grpSp")?,
            }
        }

        writer::end(writer, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::types::PositiveSize2D;
    use crate::xml::to_xml_string;

    const GROUP: &str = r#"<wpg:wgp xmlns:wpg="http://schemas.microsoft.com/office/word/2010/wordprocessingGroup"
        xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape"
        xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"
        xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
      <wpg:cNvGrpSpPr><a:grpSpLocks noUngrp="1"/></wpg:cNvGrpSpPr>
      <wpg:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="10" cy="10"/><a:chOff x="0" y="0"/><a:chExt cx="10" cy="10"/></a:xfrm></wpg:grpSpPr>
      <wps:wsp><wps:cNvPr id="2" name="Rect"/><wps:cNvSpPr/><wps:spPr/><wps:bodyPr/></wps:wsp>
      <wpg:grpSp>
        <wpg:cNvPr id="3" name="Inner"/><wpg:cNvGrpSpPr/><wpg:grpSpPr/>
        <pic:pic><pic:nvPicPr><pic:cNvPr id="4" name="img"/><pic:cNvPicPr/></pic:nvPicPr></pic:pic>
      </wpg:grpSp>
    </wpg:wgp>"#;

    #[test]
    fn test_decode_nested_group() {
        let mut r = PartReader::from_bytes("/g.xml", GROUP.as_bytes(), false);
        let group = r
            .read_root((Ns::Wpg, b"wgp"), |r, el| WpgGroup::decode(r, el))
            .unwrap();

        assert!(group.locks.unwrap().no_ungrp.is_true());
        assert_eq!(
            group.xfrm.as_ref().and_then(|x| x.ch_ext),
            Some(PositiveSize2D::new(10, 10))
        );
        assert_eq!(group.members.len(), 2);
        match &group.members[1] {
            GroupMember::Group(inner) => {
                assert_eq!(inner.c_nv_pr.as_ref().unwrap().name, "Inner");
                assert!(matches!(&inner.members[0], GroupMember::Picture(p) if p.c_nv_pr.id == 4));
            }
            other => panic!("expected nested group, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_nested_group_name() {
        let group = WpgGroup {
            members: vec![GroupMember::Group(WpgGroup::default())],
            ..Default::default()
        };
        let xml = to_xml_string(|w| group.write_to(w, "wpg:wgp")).unwrap();
        assert!(xml.starts_with("<wpg:wgp><wpg:cNvGrpSpPr/><wpg:grpSpPr/><wpg:grpSp>"));
        assert!(xml.ends_with("</wpg:grpSp></wpg:wgp>"));
    }
}
