//! # Containers
//!
//! Lists, sets, maps, structs and the message envelope.
//!
//! ## Invariants
//! - **Declared Tags**: item, key and value tags are metadata carried beside
//!   the contents. Nothing here checks that the contents conform; the codec
//!   trusts the declared tag.
//! - **Unique Field Ids**: a `Struct` is keyed by field id, so ids cannot repeat.

use std::collections::BTreeMap;

use crate::error::ProtocolError;
use crate::error::Result;
use crate::type_tag::TypeTag;
use crate::value::Value;

/// An ordered sequence of values sharing a declared item tag.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub item_type: TypeTag,
    pub items: Vec<Value>,
}

impl List {
    pub fn new(item_type: TypeTag, items: Vec<Value>) -> Self {
        Self { item_type, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A semantically unordered collection of values sharing a declared item tag.
///
/// Uniqueness is the producer's responsibility. The codec only checks it
/// when strict set handling is switched on.
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub item_type: TypeTag,
    pub items: Vec<Value>,
}

impl Set {
    pub fn new(item_type: TypeTag, items: Vec<Value>) -> Self {
        Self { item_type, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether two items compare equal.
    pub fn has_duplicates(&self) -> bool {
        self.items
            .iter()
            .enumerate()
            .any(|(i, a)| self.items[i + 1..].iter().any(|b| a == b))
    }
}

/// Key/value pairs with declared key and value tags. Entry order is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub key_type: TypeTag,
    pub value_type: TypeTag,
    pub entries: Vec<(Value, Value)>,
}

impl Map {
    pub fn new(key_type: TypeTag, value_type: TypeTag, entries: Vec<(Value, Value)>) -> Self {
        Self {
            key_type,
            value_type,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the first entry whose key equals `key`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// A typed slot: a struct member, or the result of a struct lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: TypeTag,
    pub value: Value,
}

impl Field {
    pub fn new(ty: TypeTag, value: Value) -> Self {
        Self { ty, value }
    }
}

/// A record of fields indexed by id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Struct {
    fields: BTreeMap<i16, Field>,
}

impl Struct {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with_field(mut self, id: i16, field: Field) -> Self {
        self.insert(id, field);
        self
    }

    /// Stores `field` at `id`, returning any field it replaced.
    pub fn insert(&mut self, id: i16, field: Field) -> Option<Field> {
        self.fields.insert(id, field)
    }

    /// Returns the field at `id` only if its tag is `expected`.
    ///
    /// A missing id or a tag mismatch is "not set", not an error.
    pub fn get_field(&self, id: i16, expected: TypeTag) -> Option<&Field> {
        self.fields.get(&id).filter(|f| f.ty == expected)
    }

    /// Like `get_field`, but treats a missing or mismatched field as malformed data.
    pub fn require_field(&self, id: i16, expected: TypeTag) -> Result<&Field> {
        self.get_field(id, expected).ok_or_else(|| {
            ProtocolError::invalid_data(format!("required field {} ({}) is not set", id, expected))
                .into()
        })
    }

    pub fn contains(&self, id: i16) -> bool {
        self.fields.contains_key(&id)
    }

    /// Fields in ascending id order.
    pub fn fields(&self) -> impl Iterator<Item = (i16, &Field)> {
        self.fields.iter().map(|(id, f)| (*id, f))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(i16, Field)> for Struct {
    fn from_iter<T: IntoIterator<Item = (i16, Field)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// The kind of call envelope.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Call = 1,
    Reply = 2,
    Exception = 3,
    Oneway = 4,
}

impl MessageKind {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Call),
            2 => Some(Self::Reply),
            3 => Some(Self::Exception),
            4 => Some(Self::Oneway),
            _ => None,
        }
    }
}

/// A call envelope: method name, kind, correlation id and struct payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: String,
    pub kind: MessageKind,
    /// Caller-assigned token correlating a request with its response.
    pub seqid: i32,
    pub payload: Struct,
}

impl Message {
    pub fn new(name: impl Into<String>, kind: MessageKind, seqid: i32, payload: Struct) -> Self {
        Self {
            name: name.into(),
            kind,
            seqid,
            payload,
        }
    }

    pub fn call(name: impl Into<String>, seqid: i32, args: Struct) -> Self {
        Self::new(name, MessageKind::Call, seqid, args)
    }

    pub fn reply(name: impl Into<String>, seqid: i32, result: Struct) -> Self {
        Self::new(name, MessageKind::Reply, seqid, result)
    }

    pub fn oneway(name: impl Into<String>, seqid: i32, args: Struct) -> Self {
        Self::new(name, MessageKind::Oneway, seqid, args)
    }
}
