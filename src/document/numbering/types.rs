//! Numbering-related types and enums

use crate::xml::xml_enum;

xml_enum! {
    /// `ST_NumberFormat`, shared by list levels and page numbering
    pub enum NumberFormat {
        /// 1, 2, 3
        Decimal => "decimal",
        /// I, II, III
        UpperRoman => "upperRoman",
        /// i, ii, iii
        LowerRoman => "lowerRoman",
        /// A, B, C
        UpperLetter => "upperLetter",
        /// a, b, c
        LowerLetter => "lowerLetter",
        /// 1st, 2nd, 3rd
        Ordinal => "ordinal",
        CardinalText => "cardinalText",
        OrdinalText => "ordinalText",
        /// 01, 02, 03
        DecimalZero => "decimalZero",
        /// 1, 2, 3 inside a circle
        DecimalEnclosedCircle => "decimalEnclosedCircle",
        /// - 1 -
        NumberInDash => "numberInDash",
        ChineseCounting => "chineseCounting",
        ChineseCountingThousand => "chineseCountingThousand",
        IdeographTraditional => "ideographTraditional",
        /// Symbol given by the level text
        Bullet => "bullet",
        /// No number
        None => "none",
    }
}

impl NumberFormat {
    /// Check if this is a bullet format
    pub fn is_bullet(&self) -> bool {
        matches!(self, NumberFormat::Bullet)
    }

    /// Check if this is a numbered format (not bullet)
    pub fn is_numbered(&self) -> bool {
        !matches!(self, NumberFormat::Bullet | NumberFormat::None)
    }
}

xml_enum! {
    /// `w:multiLevelType`
    pub enum MultiLevelType {
        SingleLevel => "singleLevel",
        Multilevel => "multilevel",
        HybridMultilevel => "hybridMultilevel",
    }
}

xml_enum! {
    /// `w:suff`, what follows the number
    pub enum LevelSuffix {
        Tab => "tab",
        Space => "space",
        Nothing => "nothing",
    }
}
