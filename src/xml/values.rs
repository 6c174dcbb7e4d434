//! Typed scalar values shared by every part codec

use std::fmt;

/// Enumerated string type with an open fallback.
///
/// Implemented by every enum declared through [`xml_enum!`].
pub trait XmlEnum: Sized {
    /// Name used in error messages
    const TYPE_NAME: &'static str;

    /// Parse a token, falling back to the open variant for unknown input
    fn parse(value: &str) -> Self;

    /// The serialized token
    fn as_str(&self) -> &str;

    /// `false` for the open fallback variant
    fn is_known(&self) -> bool;
}

/// Declare a string-backed enum with an `Other(String)` fallback.
macro_rules! xml_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Value outside the known set, kept verbatim
            Other(String),
        }

        impl $crate::xml::XmlEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn parse(value: &str) -> Self {
                match value {
                    $( $token => $name::$variant, )+
                    other => $name::Other(other.to_string()),
                }
            }

            fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $token, )+
                    $name::Other(s) => s,
                }
            }

            fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Ok(<$name as $crate::xml::XmlEnum>::parse(s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::xml::XmlEnum::as_str(self))
            }
        }
    };
}

pub(crate) use xml_enum;

/// Optional boolean with a distinct "absent" state.
///
/// Decodes `true`/`1`/`on` and `false`/`0`/`off`. An unset value is
/// omitted on write; a set value is written as `1` or `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OptBool(Option<bool>);

impl OptBool {
    /// The absent state
    pub const UNSET: OptBool = OptBool(None);
    pub const TRUE: OptBool = OptBool(Some(true));
    pub const FALSE: OptBool = OptBool(Some(false));

    pub fn new(value: bool) -> Self {
        OptBool(Some(value))
    }

    /// Decode one of the OOXML boolean spellings.
    ///
    /// Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "true" | "1" | "on" => Some(Self::TRUE),
            "false" | "0" | "off" => Some(Self::FALSE),
            _ => None,
        }
    }

    pub fn get(self) -> Option<bool> {
        self.0
    }

    pub fn is_set(self) -> bool {
        self.0.is_some()
    }

    /// True only when explicitly set to true
    pub fn is_true(self) -> bool {
        self.0 == Some(true)
    }

    /// Attribute text, `None` when the attribute must be omitted
    pub fn as_attr(self) -> Option<&'static str> {
        self.0.map(|b| if b { "1" } else { "0" })
    }
}

impl From<bool> for OptBool {
    fn from(value: bool) -> Self {
        OptBool::new(value)
    }
}

impl From<Option<bool>> for OptBool {
    fn from(value: Option<bool>) -> Self {
        OptBool(value)
    }
}

/// `ST_LongHexNumber`: four bytes written as eight hex digits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LongHexNum(pub u32);

impl LongHexNum {
    /// Parse 1 to 8 hex digits
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.len() > 8 {
            return None;
        }
        u32::from_str_radix(value, 16).ok().map(LongHexNum)
    }
}

impl fmt::Display for LongHexNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// EMUs per inch
pub const EMU_PER_INCH: i64 = 914_400;
/// EMUs per point
pub const EMU_PER_POINT: i64 = 12_700;
/// EMUs per centimetre
pub const EMU_PER_CM: i64 = 360_000;
/// EMUs per pixel at 96 dpi
pub const EMU_PER_PIXEL: i64 = 9_525;

/// Length in English Metric Units
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Emu(pub i64);

impl Emu {
    pub fn from_inches(inches: f64) -> Self {
        Emu((inches * EMU_PER_INCH as f64).round() as i64)
    }

    pub fn from_points(points: f64) -> Self {
        Emu((points * EMU_PER_POINT as f64).round() as i64)
    }

    pub fn from_cm(cm: f64) -> Self {
        Emu((cm * EMU_PER_CM as f64).round() as i64)
    }

    pub fn from_pixels(pixels: u32) -> Self {
        Emu(pixels as i64 * EMU_PER_PIXEL)
    }

    pub fn to_inches(self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }

    pub fn to_points(self) -> f64 {
        self.0 as f64 / EMU_PER_POINT as f64
    }

    pub fn to_cm(self) -> f64 {
        self.0 as f64 / EMU_PER_CM as f64
    }
}

impl fmt::Display for Emu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Twentieths of a point, the unit of page geometry
pub const TWIPS_PER_INCH: i64 = 1_440;

/// Convert points to twips
pub fn twips_from_points(points: f64) -> i64 {
    (points * 20.0).round() as i64
}

/// Convert inches to twips
pub fn twips_from_inches(inches: f64) -> i64 {
    (inches * TWIPS_PER_INCH as f64).round() as i64
}
