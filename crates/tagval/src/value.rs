//! # Tagged Values
//!
//! A closed sum over the five value shapes. Every shape answers the same
//! seven typed accessors; exactly one succeeds for a given value and the
//! rest fail with `ProtocolErrorKind::InvalidData`. Values never coerce.

use crate::container::Field;
use crate::container::List;
use crate::container::Map;
use crate::container::Set;
use crate::container::Struct;
use crate::error::ProtocolError;
use crate::error::Result;
use crate::type_tag::TypeTag;

/// A numeric payload.
///
/// Equality is numeric: `Int(1) == Double(1.0)`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Double(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Double(d) => d,
        }
    }

    /// The integer value, if this number is integral.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(i),
            Number::Double(d)
                if d.fract() == 0.0 && d >= i64::MIN as f64 && d < i64::MAX as f64 =>
            {
                Some(d as i64)
            }
            Number::Double(_) => None,
        }
    }

    pub fn is_nan(self) -> bool {
        matches!(self, Number::Double(d) if d.is_nan())
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Double(a), Number::Double(b)) => a == b,
            (Number::Int(i), Number::Double(d)) | (Number::Double(d), Number::Int(i)) => {
                (*i as f64) == *d
            }
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Double(v)
    }
}

/// The primitive payload of a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Number(Number),
    String(String),
}

impl Primitive {
    fn kind(&self) -> &'static str {
        match self {
            Primitive::Bool(_) => "boolean",
            Primitive::Number(_) => "number",
            Primitive::String(_) => "string",
        }
    }
}

/// A scalar value: a tag and an optional payload.
///
/// `payload == None` is the explicit "unset" state, distinct from a payload
/// that fails to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    ty: TypeTag,
    payload: Option<Primitive>,
}

impl Scalar {
    /// Builds a scalar of a scalar tag.
    ///
    /// Container tags, `STOP` and `VOID` are `InvalidData`. The payload is not
    /// checked against the tag; the codec catches mismatches on serialize.
    pub fn new(ty: TypeTag, payload: Option<Primitive>) -> Result<Self> {
        if !ty.is_scalar() {
            return Err(ProtocolError::invalid_data(format!("{} is not a scalar type", ty)).into());
        }
        Ok(Self { ty, payload })
    }

    /// Only for tags known to be scalar.
    fn known(ty: TypeTag, payload: Primitive) -> Self {
        Self {
            ty,
            payload: Some(payload),
        }
    }

    pub fn ty(&self) -> TypeTag {
        self.ty
    }

    pub fn payload(&self) -> Option<&Primitive> {
        self.payload.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.payload.is_some()
    }

    fn unset_error(&self) -> ProtocolError {
        ProtocolError::invalid_data(format!("{} value is unset", self.ty))
    }
}

/// A tagged value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    List(List),
    Set(Set),
    Map(Map),
    Struct(Struct),
}

fn mismatch(expected: &str, found: TypeTag) -> ProtocolError {
    ProtocolError::invalid_data(format!("expected {}, found {}", expected, found))
}

impl Value {
    pub fn bool(v: bool) -> Self {
        Value::Scalar(Scalar::known(TypeTag::Bool, Primitive::Bool(v)))
    }

    pub fn byte(v: i8) -> Self {
        Self::integer(TypeTag::Byte, v as i64)
    }

    pub fn i16(v: i16) -> Self {
        Self::integer(TypeTag::I16, v as i64)
    }

    pub fn i32(v: i32) -> Self {
        Self::integer(TypeTag::I32, v as i64)
    }

    pub fn i64(v: i64) -> Self {
        Self::integer(TypeTag::I64, v)
    }

    pub fn double(v: f64) -> Self {
        Value::Scalar(Scalar::known(TypeTag::Double, Primitive::Number(Number::Double(v))))
    }

    pub fn string(v: impl Into<String>) -> Self {
        Value::Scalar(Scalar::known(TypeTag::String, Primitive::String(v.into())))
    }

    /// A scalar of tag `ty` with no payload. `ty` must be a scalar tag.
    pub fn unset(ty: TypeTag) -> Result<Self> {
        Ok(Value::Scalar(Scalar::new(ty, None)?))
    }

    fn integer(ty: TypeTag, v: i64) -> Self {
        Value::Scalar(Scalar::known(ty, Primitive::Number(Number::Int(v))))
    }

    /// The tag of the variant that produced this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Scalar(s) => s.ty(),
            Value::List(_) => TypeTag::List,
            Value::Set(_) => TypeTag::Set,
            Value::Map(_) => TypeTag::Map,
            Value::Struct(_) => TypeTag::Struct,
        }
    }

    /// Wraps this value with its own tag.
    pub fn as_field(&self) -> Field {
        Field::new(self.type_tag(), self.clone())
    }

    pub fn into_field(self) -> Field {
        Field::new(self.type_tag(), self)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Scalar(s) if s.ty == TypeTag::Bool => match &s.payload {
                Some(Primitive::Bool(b)) => Ok(*b),
                Some(p) => Err(mismatch("boolean", s.ty).with_found(p.kind()).into()),
                None => Err(s.unset_error().into()),
            },
            _ => Err(mismatch("boolean", self.type_tag()).into()),
        }
    }

    pub fn as_number(&self) -> Result<Number> {
        match self {
            Value::Scalar(s) if s.ty.is_numeric() => match &s.payload {
                Some(Primitive::Number(n)) => Ok(*n),
                Some(p) => Err(mismatch("number", s.ty).with_found(p.kind()).into()),
                None => Err(s.unset_error().into()),
            },
            _ => Err(mismatch("number", self.type_tag()).into()),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Scalar(s) if s.ty == TypeTag::String => match &s.payload {
                Some(Primitive::String(v)) => Ok(v),
                Some(p) => Err(mismatch("string", s.ty).with_found(p.kind()).into()),
                None => Err(s.unset_error().into()),
            },
            _ => Err(mismatch("string", self.type_tag()).into()),
        }
    }

    pub fn as_list(&self) -> Result<&List> {
        match self {
            Value::List(l) => Ok(l),
            _ => Err(mismatch("list", self.type_tag()).into()),
        }
    }

    pub fn as_map(&self) -> Result<&Map> {
        match self {
            Value::Map(m) => Ok(m),
            _ => Err(mismatch("map", self.type_tag()).into()),
        }
    }

    pub fn as_set(&self) -> Result<&Set> {
        match self {
            Value::Set(s) => Ok(s),
            _ => Err(mismatch("set", self.type_tag()).into()),
        }
    }

    pub fn as_struct(&self) -> Result<&Struct> {
        match self {
            Value::Struct(s) => Ok(s),
            _ => Err(mismatch("struct", self.type_tag()).into()),
        }
    }
}

impl ProtocolError {
    fn with_found(mut self, payload: &str) -> Self {
        if let Some(m) = self.message.as_mut() {
            m.push_str(&format!(" with {} payload", payload));
        }
        self
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Value::Scalar(v)
    }
}

impl From<List> for Value {
    fn from(v: List) -> Self {
        Value::List(v)
    }
}

impl From<Set> for Value {
    fn from(v: Set) -> Self {
        Value::Set(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl From<Struct> for Value {
    fn from(v: Struct) -> Self {
        Value::Struct(v)
    }
}
