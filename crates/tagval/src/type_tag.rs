//! # Type Tags
//!
//! Identifies the shape of every representable value.
//!
//! Codes follow the Thrift numbering. Several names share one code on
//! purpose: `I08` is `BYTE`, and `UTF7`/`UTF8`/`UTF16` are `STRING`. They
//! are semantic subtypes of the same wire shape and encode identically.

use std::fmt;

/// Identifies the shape of a tagged value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    // Framing markers, unused by the JSON codec
    Stop = 0,
    Void = 1,

    // Scalars
    Bool = 2,
    Byte = 3,
    Double = 4,
    I16 = 6,
    I32 = 8,
    I64 = 10,
    String = 11,

    // Containers
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
}

impl TypeTag {
    /// 8-bit signed integer; same code as `Byte`.
    pub const I08: TypeTag = TypeTag::Byte;
    /// Byte-string content; same code as `String`.
    pub const UTF7: TypeTag = TypeTag::String;
    /// Byte-string content; same code as `String`.
    pub const UTF8: TypeTag = TypeTag::String;
    /// Byte-string content; same code as `String`.
    pub const UTF16: TypeTag = TypeTag::String;

    /// The numeric code of this tag.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the tag for a numeric code, or `None` if unassigned.
    pub const fn from_code(b: u8) -> Option<Self> {
        match b {
            0 => Some(TypeTag::Stop),
            1 => Some(TypeTag::Void),
            2 => Some(TypeTag::Bool),
            3 => Some(TypeTag::Byte),
            4 => Some(TypeTag::Double),
            6 => Some(TypeTag::I16),
            8 => Some(TypeTag::I32),
            10 => Some(TypeTag::I64),
            11 => Some(TypeTag::String),
            12 => Some(TypeTag::Struct),
            13 => Some(TypeTag::Map),
            14 => Some(TypeTag::Set),
            15 => Some(TypeTag::List),
            _ => None,
        }
    }

    /// True for tags carried by a `Scalar`.
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            TypeTag::Bool
                | TypeTag::Byte
                | TypeTag::Double
                | TypeTag::I16
                | TypeTag::I32
                | TypeTag::I64
                | TypeTag::String
        )
    }

    /// True for the integer widths and `Double`.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeTag::Byte | TypeTag::Double | TypeTag::I16 | TypeTag::I32 | TypeTag::I64
        )
    }

    /// True for the integer widths only.
    pub const fn is_integer(self) -> bool {
        matches!(self, TypeTag::Byte | TypeTag::I16 | TypeTag::I32 | TypeTag::I64)
    }

    /// True for `List`, `Set`, `Map` and `Struct`.
    pub const fn is_container(self) -> bool {
        matches!(self, TypeTag::List | TypeTag::Set | TypeTag::Map | TypeTag::Struct)
    }

    /// Inclusive integer range representable under this tag, if it is an
    /// integer tag.
    pub const fn integer_range(self) -> Option<(i64, i64)> {
        match self {
            TypeTag::Byte => Some((i8::MIN as i64, i8::MAX as i64)),
            TypeTag::I16 => Some((i16::MIN as i64, i16::MAX as i64)),
            TypeTag::I32 => Some((i32::MIN as i64, i32::MAX as i64)),
            TypeTag::I64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Stop => "STOP",
            TypeTag::Void => "VOID",
            TypeTag::Bool => "BOOL",
            TypeTag::Byte => "BYTE",
            TypeTag::Double => "DOUBLE",
            TypeTag::I16 => "I16",
            TypeTag::I32 => "I32",
            TypeTag::I64 => "I64",
            TypeTag::String => "STRING",
            TypeTag::Struct => "STRUCT",
            TypeTag::Map => "MAP",
            TypeTag::Set => "SET",
            TypeTag::List => "LIST",
        };
        f.write_str(name)
    }
}
