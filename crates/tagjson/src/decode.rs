//! # Deserialize
//!
//! Rebuilds a `Value` tree from a JSON structure and an expected tag.
//!
//! ## Invariants
//! - **No Coercion**: a JSON type that does not suit the expected tag fails,
//!   except that `BOOL` reads both its wire form (`1`/`0`) and JSON booleans.
//! - **Fail Fast**: the first malformed element aborts the whole decode.
//! - **Counts Checked**: list, set and map counts must match their contents.
//! - **Unique Keys**: map keys and struct field ids may not repeat once
//!   decoded, and field ids must be written in canonical decimal form.

use serde_json::Map as JsonMap;
use serde_json::Value as Json;

use tagval::Field;
use tagval::List;
use tagval::Map;
use tagval::Number;
use tagval::Primitive;
use tagval::ProtocolError;
use tagval::Result;
use tagval::Scalar;
use tagval::Set;
use tagval::Struct;
use tagval::TypeTag;
use tagval::Value;

use crate::options::CodecOptions;
use crate::wire::type_of_string;

/// Deserializes `json` as a value of tag `ty` with default options.
pub fn deserialize(json: &Json, ty: TypeTag) -> Result<Value> {
    deserialize_with(json, ty, &CodecOptions::default())
}

/// Deserializes `json` as a value of tag `ty` under `options`.
pub fn deserialize_with(json: &Json, ty: TypeTag, options: &CodecOptions) -> Result<Value> {
    deserialize_impl(json, ty, options, 0)
}

fn deserialize_impl(
    json: &Json,
    ty: TypeTag,
    options: &CodecOptions,
    depth: usize,
) -> Result<Value> {
    if ty.is_container() && options.exceeds(depth) {
        return Err(
            ProtocolError::size_limit(format!("nesting depth {} exceeds limit", depth)).into(),
        );
    }

    match ty {
        TypeTag::Bool => decode_bool(json),
        TypeTag::Byte | TypeTag::I16 | TypeTag::I32 | TypeTag::I64 => decode_integer(json, ty),
        TypeTag::Double => decode_double(json),
        TypeTag::String => decode_string(json),
        TypeTag::List => {
            let (item_type, items) = decode_items(json, options, depth)?;
            Ok(Value::List(List::new(item_type, items)))
        }
        TypeTag::Set => {
            let (item_type, items) = decode_items(json, options, depth)?;
            let set = Set::new(item_type, items);
            if options.strict_sets && set.has_duplicates() {
                return Err(ProtocolError::invalid_data("duplicate set element").into());
            }
            Ok(Value::Set(set))
        }
        TypeTag::Map => decode_map(json, options, depth),
        TypeTag::Struct => Ok(Value::Struct(decode_struct(json, options, depth)?)),
        TypeTag::Stop | TypeTag::Void => Err(ProtocolError::invalid_data(format!(
            "cannot decode a value of type {}",
            ty
        ))
        .into()),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn unexpected(ty: TypeTag, json: &Json) -> tagval::Error {
    ProtocolError::invalid_data(format!("expected {} value, found {}", ty, json_kind(json))).into()
}

fn scalar(ty: TypeTag, payload: Primitive) -> Result<Value> {
    Ok(Value::Scalar(Scalar::new(ty, Some(payload))?))
}

fn decode_bool(json: &Json) -> Result<Value> {
    let b = match json {
        Json::Null => return Value::unset(TypeTag::Bool),
        Json::Bool(b) => *b,
        Json::Number(n) => match n.as_i64() {
            Some(1) => true,
            Some(0) => false,
            _ => {
                return Err(ProtocolError::invalid_data(format!("{} is not a boolean", n)).into());
            }
        },
        other => return Err(unexpected(TypeTag::Bool, other)),
    };
    scalar(TypeTag::Bool, Primitive::Bool(b))
}

fn decode_integer(json: &Json, ty: TypeTag) -> Result<Value> {
    let n = match json {
        Json::Null => return Value::unset(ty),
        Json::Number(n) => n,
        other => return Err(unexpected(ty, other)),
    };

    let i = match n.as_i64() {
        Some(i) => i,
        None => n
            .as_f64()
            .and_then(|f| Number::Double(f).as_i64())
            .ok_or_else(|| {
                ProtocolError::invalid_data(format!("{} is not a valid {}", n, ty))
            })?,
    };

    if let Some((min, max)) = ty.integer_range() {
        if i < min || i > max {
            return Err(
                ProtocolError::invalid_data(format!("{} out of range for {}", i, ty)).into(),
            );
        }
    }
    scalar(ty, Primitive::Number(Number::Int(i)))
}

fn decode_double(json: &Json) -> Result<Value> {
    match json {
        Json::Null => Value::unset(TypeTag::Double),
        Json::Number(n) => {
            let d = n.as_f64().ok_or_else(|| {
                ProtocolError::invalid_data(format!("{} is not a valid DOUBLE", n))
            })?;
            scalar(TypeTag::Double, Primitive::Number(Number::Double(d)))
        }
        other => Err(unexpected(TypeTag::Double, other)),
    }
}

fn decode_string(json: &Json) -> Result<Value> {
    match json {
        Json::Null => Value::unset(TypeTag::String),
        Json::String(s) => scalar(TypeTag::String, Primitive::String(s.clone())),
        other => Err(unexpected(TypeTag::String, other)),
    }
}

fn decode_tag(json: &Json) -> Result<TypeTag> {
    match json {
        Json::String(s) => type_of_string(s),
        other => Err(ProtocolError::invalid_data(format!(
            "expected type string, found {}",
            json_kind(other)
        ))
        .into()),
    }
}

fn decode_count(json: &Json) -> Result<usize> {
    let count = match json {
        Json::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(|f| Number::Double(f).as_i64())),
        _ => None,
    };
    match count {
        Some(c) if c < 0 => {
            Err(ProtocolError::negative_size(format!("negative size {}", c)).into())
        }
        Some(c) => usize::try_from(c)
            .map_err(|_| ProtocolError::size_limit(format!("size {} too large", c)).into()),
        None => Err(ProtocolError::invalid_data(format!(
            "expected size, found {}",
            json_kind(json)
        ))
        .into()),
    }
}

fn size_mismatch(declared: usize, actual: usize) -> tagval::Error {
    ProtocolError::invalid_data(format!(
        "size mismatch: declared {}, found {}",
        declared, actual
    ))
    .into()
}

fn decode_items(
    json: &Json,
    options: &CodecOptions,
    depth: usize,
) -> Result<(TypeTag, Vec<Value>)> {
    let arr = match json {
        Json::Array(arr) if arr.len() >= 2 => arr,
        _ => return Err(ProtocolError::invalid_data("illegal data format").into()),
    };

    let item_type = decode_tag(&arr[0])?;
    let count = decode_count(&arr[1])?;
    let rest = &arr[2..];
    if rest.len() != count {
        return Err(size_mismatch(count, rest.len()));
    }

    let mut items = Vec::with_capacity(count);
    for item in rest {
        items.push(deserialize_impl(item, item_type, options, depth + 1)?);
    }
    Ok((item_type, items))
}

/// Reads a property name back as a key of tag `key_type`.
///
/// String keys are taken verbatim; every other key was written as JSON text.
fn decode_key(
    name: &str,
    key_type: TypeTag,
    options: &CodecOptions,
    depth: usize,
) -> Result<Value> {
    if key_type == TypeTag::String {
        return Ok(Value::string(name));
    }
    let parsed: Json = serde_json::from_str(name).map_err(|_| {
        ProtocolError::invalid_data(format!("map key {:?} is not a valid {}", name, key_type))
    })?;
    deserialize_impl(&parsed, key_type, options, depth)
}

fn decode_map(json: &Json, options: &CodecOptions, depth: usize) -> Result<Value> {
    let arr = match json {
        Json::Array(arr) if arr.len() == 4 => arr,
        _ => return Err(ProtocolError::invalid_data("illegal data format").into()),
    };

    let key_type = decode_tag(&arr[0])?;
    let value_type = decode_tag(&arr[1])?;
    let count = decode_count(&arr[2])?;
    let Json::Object(obj) = &arr[3] else {
        return Err(ProtocolError::invalid_data(format!(
            "expected map entries, found {}",
            json_kind(&arr[3])
        ))
        .into());
    };
    if obj.len() != count {
        return Err(size_mismatch(count, obj.len()));
    }

    let mut entries: Vec<(Value, Value)> = Vec::with_capacity(count);
    for (name, v) in obj {
        let key = decode_key(name, key_type, options, depth + 1)?;
        if entries.iter().any(|(k, _)| *k == key) {
            return Err(ProtocolError::invalid_data(format!("duplicate map key {:?}", name)).into());
        }
        let value = deserialize_impl(v, value_type, options, depth + 1)?;
        entries.push((key, value));
    }
    Ok(Value::Map(Map::new(key_type, value_type, entries)))
}

fn decode_field(
    wrapper: &JsonMap<String, Json>,
    options: &CodecOptions,
    depth: usize,
) -> Result<Field> {
    let mut iter = wrapper.iter();
    let (Some((tag, inner)), None) = (iter.next(), iter.next()) else {
        return Err(ProtocolError::invalid_data(format!(
            "field must hold exactly one typed value, found {}",
            wrapper.len()
        ))
        .into());
    };
    let ty = type_of_string(tag)?;
    let value = deserialize_impl(inner, ty, options, depth + 1)?;
    Ok(Field::new(ty, value))
}

/// Field ids must be written as `i16::to_string` writes them, so `"+1"` and
/// `"01"` never alias `"1"`.
fn decode_field_id(name: &str) -> Result<i16> {
    match name.parse::<i16>() {
        Ok(id) if id.to_string() == name => Ok(id),
        _ => Err(ProtocolError::invalid_data(format!("invalid field id {:?}", name)).into()),
    }
}

pub(crate) fn decode_struct(json: &Json, options: &CodecOptions, depth: usize) -> Result<Struct> {
    let Json::Object(obj) = json else {
        return Err(unexpected(TypeTag::Struct, json));
    };

    let mut out = Struct::new();
    for (name, wrapper) in obj {
        let id = decode_field_id(name)?;
        let Json::Object(wrapper) = wrapper else {
            return Err(
                ProtocolError::invalid_data(format!("field {} is not an object", id)).into(),
            );
        };
        if out.insert(id, decode_field(wrapper, options, depth)?).is_some() {
            return Err(ProtocolError::invalid_data(format!("duplicate field id {}", id)).into());
        }
    }
    Ok(out)
}
