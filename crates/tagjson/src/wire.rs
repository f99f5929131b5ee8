//! Wire tag strings.
//!
//! The two functions are exact inverses over the eleven data tags.
//! `Stop` and `Void` have no wire string.

use tagval::ProtocolError;
use tagval::Result;
use tagval::TypeTag;

/// The wire string for `ty`.
pub fn type_string(ty: TypeTag) -> Result<&'static str> {
    let s = match ty {
        TypeTag::Bool => "tf",
        TypeTag::Byte => "i8",
        TypeTag::I16 => "i16",
        TypeTag::I32 => "i32",
        TypeTag::I64 => "i64",
        TypeTag::Double => "dbl",
        TypeTag::String => "str",
        TypeTag::List => "lst",
        TypeTag::Map => "map",
        TypeTag::Set => "set",
        TypeTag::Struct => "rec",
        TypeTag::Stop | TypeTag::Void => {
            return Err(ProtocolError::invalid_data(format!("unrecognized type {}", ty)).into());
        }
    };
    Ok(s)
}

/// The tag denoted by a wire string.
pub fn type_of_string(s: &str) -> Result<TypeTag> {
    let ty = match s {
        "tf" => TypeTag::Bool,
        "i8" => TypeTag::Byte,
        "i16" => TypeTag::I16,
        "i32" => TypeTag::I32,
        "i64" => TypeTag::I64,
        "dbl" => TypeTag::Double,
        "str" => TypeTag::String,
        "lst" => TypeTag::List,
        "map" => TypeTag::Map,
        "set" => TypeTag::Set,
        "rec" => TypeTag::Struct,
        _ => return Err(ProtocolError::invalid_data(format!("unrecognized type {:?}", s)).into()),
    };
    Ok(ty)
}
