//! # Error Definitions
//!
//! The three kind-coded failure families and the base `Error` over them.
//!
//! - **Transport**: I/O-layer failures. Only transport implementations raise these.
//! - **Protocol**: malformed or unsupported wire data. The codec's own vocabulary.
//! - **Application**: RPC-level failures. Carried over the wire as an ordinary
//!   struct (see `application`), and only raised by callers that choose to.

use std::fmt;

use thiserror::Error;

/// Kinds of transport failure.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    Unknown = 0,
}

/// Kinds of protocol failure.
///
/// The JSON codec raises `InvalidData`, `BadVersion`, `NegativeSize` and
/// `SizeLimit`. `NotImplemented` is reserved for other protocols.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolErrorKind {
    Unknown = 0,
    InvalidData = 1,
    NegativeSize = 2,
    SizeLimit = 3,
    BadVersion = 4,
    NotImplemented = 5,
}

/// Kinds of application failure.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationErrorKind {
    Unknown = 0,
    UnknownMethod = 1,
    InvalidMessageType = 2,
    WrongMethodName = 3,
    BadSequenceId = 4,
    MissingResult = 5,
    InternalError = 6,
    ProtocolError = 7,
    InvalidTransform = 8,
    InvalidProtocol = 9,
    UnsupportedClientType = 10,
}

impl TransportErrorKind {
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl ProtocolErrorKind {
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::InvalidData),
            2 => Some(Self::NegativeSize),
            3 => Some(Self::SizeLimit),
            4 => Some(Self::BadVersion),
            5 => Some(Self::NotImplemented),
            _ => None,
        }
    }
}

impl ApplicationErrorKind {
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::UnknownMethod),
            2 => Some(Self::InvalidMessageType),
            3 => Some(Self::WrongMethodName),
            4 => Some(Self::BadSequenceId),
            5 => Some(Self::MissingResult),
            6 => Some(Self::InternalError),
            7 => Some(Self::ProtocolError),
            8 => Some(Self::InvalidTransform),
            9 => Some(Self::InvalidProtocol),
            10 => Some(Self::UnsupportedClientType),
            _ => None,
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown")
    }
}

impl fmt::Display for ProtocolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::InvalidData => "invalid data",
            Self::NegativeSize => "negative size",
            Self::SizeLimit => "size limit",
            Self::BadVersion => "bad version",
            Self::NotImplemented => "not implemented",
        };
        f.write_str(s)
    }
}

impl fmt::Display for ApplicationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::UnknownMethod => "unknown method",
            Self::InvalidMessageType => "invalid message type",
            Self::WrongMethodName => "wrong method name",
            Self::BadSequenceId => "bad sequence id",
            Self::MissingResult => "missing result",
            Self::InternalError => "internal error",
            Self::ProtocolError => "protocol error",
            Self::InvalidTransform => "invalid transform",
            Self::InvalidProtocol => "invalid protocol",
            Self::UnsupportedClientType => "unsupported client type",
        };
        f.write_str(s)
    }
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}

/// An I/O-layer failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error ({kind}){}", detail(.message))]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: Option<String>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Unknown, message)
    }
}

/// A wire-format or validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("protocol error ({kind}){}", detail(.message))]
pub struct ProtocolError {
    pub kind: ProtocolErrorKind,
    pub message: Option<String>,
}

impl ProtocolError {
    pub fn new(kind: ProtocolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::InvalidData, message)
    }

    pub fn bad_version(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::BadVersion, message)
    }

    pub fn negative_size(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::NegativeSize, message)
    }

    pub fn size_limit(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::SizeLimit, message)
    }
}

/// An RPC-level failure. Serializable as a two-field struct.
///
/// Both properties are optional so that a decoded struct with missing
/// fields still yields a value rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("application error ({}){}", kind_name(.kind), detail(.message))]
pub struct ApplicationError {
    pub kind: Option<ApplicationErrorKind>,
    pub message: Option<String>,
}

fn kind_name(kind: &Option<ApplicationErrorKind>) -> String {
    match kind {
        Some(k) => k.to_string(),
        None => "unset".to_string(),
    }
}

impl ApplicationError {
    pub fn new(kind: ApplicationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            message: Some(message.into()),
        }
    }
}

/// The base failure type over all three families.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl Error {
    /// The human-readable message carried by the underlying failure, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Transport(e) => e.message.as_deref(),
            Self::Protocol(e) => e.message.as_deref(),
            Self::Application(e) => e.message.as_deref(),
        }
    }

    /// The protocol kind, if this is a protocol failure.
    pub fn protocol_kind(&self) -> Option<ProtocolErrorKind> {
        match self {
            Self::Protocol(e) => Some(e.kind),
            _ => None,
        }
    }
}

/// Specialized `Result` for value and codec operations.
pub type Result<T> = std::result::Result<T, Error>;
