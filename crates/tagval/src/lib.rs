//! # Tagval
//!
//! A small, strict model of self-describing values.
//!
//! ## Philosophy
//!
//! - **Closed Shapes**: a `Value` is a scalar, list, set, map or struct. Nothing else.
//! - **No Coercion**: asking a value for the wrong shape is an `InvalidData`
//!   protocol failure, never a silent default.
//! - **Immutable Trees**: values are built once, by hand or by a decoder, and
//!   then only read. They can be shared freely across tasks.
//!
//! Wire formats live elsewhere; this crate knows nothing about JSON.

pub mod application;
pub mod container;
pub mod error;
pub mod type_tag;
pub mod value;

pub use container::Field;
pub use container::List;
pub use container::Map;
pub use container::Message;
pub use container::MessageKind;
pub use container::Set;
pub use container::Struct;

pub use error::ApplicationError;
pub use error::ApplicationErrorKind;
pub use error::Error;
pub use error::ProtocolError;
pub use error::ProtocolErrorKind;
pub use error::Result;
pub use error::TransportError;
pub use error::TransportErrorKind;

pub use type_tag::TypeTag;

pub use value::Number;
pub use value::Primitive;
pub use value::Scalar;
pub use value::Value;
