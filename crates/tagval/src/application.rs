//! Struct mapping for `ApplicationError`.
//!
//! Field 1 is the kind code (I32), field 2 the message (STRING). Both are
//! optional in either direction.

use crate::container::Field;
use crate::container::Message;
use crate::container::MessageKind;
use crate::container::Struct;
use crate::error::ApplicationError;
use crate::error::ApplicationErrorKind;
use crate::type_tag::TypeTag;
use crate::value::Primitive;
use crate::value::Value;

const CODE_FIELD: i16 = 1;
const MESSAGE_FIELD: i16 = 2;

impl ApplicationError {
    /// Encodes this error as a struct, omitting unset properties.
    pub fn to_struct(&self) -> Struct {
        let mut s = Struct::new();
        if let Some(kind) = self.kind {
            s.insert(CODE_FIELD, Field::new(TypeTag::I32, Value::i32(kind.code())));
        }
        if let Some(message) = &self.message {
            s.insert(MESSAGE_FIELD, Field::new(TypeTag::String, Value::string(message.clone())));
        }
        s
    }

    /// Reads an error back from a struct.
    ///
    /// Missing or wrong-typed fields leave the property unset. Codes outside
    /// the known range read as `Unknown`.
    pub fn from_struct(s: &Struct) -> Self {
        let kind = s
            .get_field(CODE_FIELD, TypeTag::I32)
            .and_then(|f| f.value.as_number().ok())
            .and_then(|n| n.as_i64())
            .map(|code| {
                i32::try_from(code)
                    .ok()
                    .and_then(ApplicationErrorKind::from_code)
                    .unwrap_or(ApplicationErrorKind::Unknown)
            });

        let message = s.get_field(MESSAGE_FIELD, TypeTag::String).and_then(|f| match &f.value {
            Value::Scalar(scalar) => match scalar.payload() {
                Some(Primitive::String(m)) => Some(m.clone()),
                _ => None,
            },
            _ => None,
        });

        Self { kind, message }
    }
}

impl Message {
    /// An EXCEPTION envelope carrying `error` as its payload.
    pub fn exception(name: impl Into<String>, seqid: i32, error: &ApplicationError) -> Self {
        Self::new(name, MessageKind::Exception, seqid, error.to_struct())
    }
}
