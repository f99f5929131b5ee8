//! # Tagwire
//!
//! Message-level JSON protocol over an abstract async transport.
//!
//! The transport moves whole messages as text; `JsonProtocol` turns them into
//! `tagval` messages and structs with `tagjson`. Routing, dispatch and retry
//! live above this crate.

pub mod memory;
pub mod protocol;
pub mod transport;

pub use protocol::JsonProtocol;
pub use transport::Transport;
