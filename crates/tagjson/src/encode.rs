//! # Serialize
//!
//! Renders a `Value` tree as a JSON structure.
//!
//! ## Shapes
//! - **Scalars**: `1`/`0` for booleans, the number or string as-is, `null` when unset.
//! - **List / Set**: `[itemTag, count, item0, item1, ...]`
//! - **Map**: `[keyTag, valueTag, count, {key: value, ...}]`
//! - **Struct**: `{"<id>": {"<tag>": value}, ...}`

use serde_json::Map as JsonMap;
use serde_json::Number as JsonNumber;
use serde_json::Value as Json;

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
use crate::wire::type_string;

/// Serializes `value` with default options.
pub fn serialize(value: &Value) -> Result<Json> {
    serialize_with(value, &CodecOptions::default())
}

/// Serializes `value` under `options`.
pub fn serialize_with(value: &Value, options: &CodecOptions) -> Result<Json> {
    serialize_impl(value, options, 0)
}

/// Serializes a struct directly, without wrapping it in a `Value`.
pub fn serialize_struct_with(s: &Struct, options: &CodecOptions) -> Result<Json> {
    serialize_struct(s, options, 0)
}

fn serialize_impl(value: &Value, options: &CodecOptions, depth: usize) -> Result<Json> {
    match value {
        Value::Scalar(s) => serialize_scalar(s),
        Value::List(l) => {
            check_depth(options, depth)?;
            serialize_list(l, options, depth)
        }
        Value::Set(s) => {
            check_depth(options, depth)?;
            serialize_set(s, options, depth)
        }
        Value::Map(m) => {
            check_depth(options, depth)?;
            serialize_map(m, options, depth)
        }
        Value::Struct(s) => {
            check_depth(options, depth)?;
            serialize_struct(s, options, depth)
        }
    }
}

fn check_depth(options: &CodecOptions, depth: usize) -> Result<()> {
    if options.exceeds(depth) {
        return Err(
            ProtocolError::size_limit(format!("nesting depth {} exceeds limit", depth)).into(),
        );
    }
    Ok(())
}

fn serialize_scalar(s: &Scalar) -> Result<Json> {
    let ty = s.ty();
    let Some(payload) = s.payload() else {
        return Ok(Json::Null);
    };

    match (ty, payload) {
        (TypeTag::Bool, Primitive::Bool(b)) => Ok(Json::from(if *b { 1 } else { 0 })),
        (TypeTag::Bool, _) => Err(bad_payload(ty, "boolean")),
        (TypeTag::Double, Primitive::Number(n)) => serialize_double(*n),
        (t, Primitive::Number(n)) if t.is_integer() => serialize_integer(t, *n),
        (t, _) if t.is_numeric() => Err(bad_payload(ty, "number")),
        (TypeTag::String, Primitive::String(v)) => Ok(Json::String(v.clone())),
        (TypeTag::String, _) => Err(bad_payload(ty, "string")),
        _ => Err(ProtocolError::invalid_data(format!("{} is not a scalar type", ty)).into()),
    }
}

fn bad_payload(ty: TypeTag, expected: &str) -> tagval::Error {
    ProtocolError::invalid_data(format!("{} value must hold a {}", ty, expected)).into()
}

fn serialize_double(n: Number) -> Result<Json> {
    if n.is_nan() {
        return Err(ProtocolError::invalid_data("NaN cannot be serialized").into());
    }
    match n {
        Number::Int(i) => Ok(Json::from(i)),
        Number::Double(d) => JsonNumber::from_f64(d)
            .map(Json::Number)
            .ok_or_else(|| {
                ProtocolError::invalid_data(format!("{} cannot be serialized", d)).into()
            }),
    }
}

fn serialize_integer(ty: TypeTag, n: Number) -> Result<Json> {
    if n.is_nan() {
        return Err(ProtocolError::invalid_data("NaN cannot be serialized").into());
    }
    let Some(i) = n.as_i64() else {
        return Err(ProtocolError::invalid_data(format!("{} value must be integral", ty)).into());
    };
    if let Some((min, max)) = ty.integer_range() {
        if i < min || i > max {
            return Err(
                ProtocolError::invalid_data(format!("{} out of range for {}", i, ty)).into(),
            );
        }
    }
    Ok(Json::from(i))
}

fn serialize_items(
    item_type: TypeTag,
    items: &[Value],
    options: &CodecOptions,
    depth: usize,
) -> Result<Json> {
    let mut out = Vec::with_capacity(items.len() + 2);
    out.push(Json::from(type_string(item_type)?));
    out.push(Json::from(items.len()));
    for item in items {
        out.push(serialize_impl(item, options, depth + 1)?);
    }
    Ok(Json::Array(out))
}

fn serialize_list(l: &List, options: &CodecOptions, depth: usize) -> Result<Json> {
    serialize_items(l.item_type, &l.items, options, depth)
}

fn serialize_set(s: &Set, options: &CodecOptions, depth: usize) -> Result<Json> {
    if options.strict_sets && s.has_duplicates() {
        return Err(ProtocolError::invalid_data("duplicate set element").into());
    }
    serialize_items(s.item_type, &s.items, options, depth)
}

/// Renders a serialized key as an object property name.
///
/// JSON strings are used verbatim; anything else becomes compact JSON text.
fn key_name(key: Json) -> String {
    match key {
        Json::String(s) => s,
        other => other.to_string(),
    }
}

fn serialize_map(m: &Map, options: &CodecOptions, depth: usize) -> Result<Json> {
    let mut entries = JsonMap::with_capacity(m.entries.len());
    for (k, v) in &m.entries {
        let name = key_name(serialize_impl(k, options, depth + 1)?);
        let value = serialize_impl(v, options, depth + 1)?;
        if entries.insert(name.clone(), value).is_some() {
            return Err(ProtocolError::invalid_data(format!("duplicate map key {:?}", name)).into());
        }
    }

    Ok(Json::Array(vec![
        Json::from(type_string(m.key_type)?),
        Json::from(type_string(m.value_type)?),
        Json::from(m.entries.len()),
        Json::Object(entries),
    ]))
}

fn serialize_struct(s: &Struct, options: &CodecOptions, depth: usize) -> Result<Json> {
    let mut out = JsonMap::with_capacity(s.len());
    for (id, field) in s.fields() {
        let mut wrapper = JsonMap::with_capacity(1);
        wrapper.insert(
            type_string(field.ty)?.to_string(),
            serialize_impl(&field.value, options, depth + 1)?,
        );
        out.insert(id.to_string(), Json::Object(wrapper));
    }
    Ok(Json::Object(out))
}
