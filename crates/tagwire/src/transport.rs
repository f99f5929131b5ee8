//! # Transport Abstraction
//!
//! A minimal, async interface for moving whole encoded messages.
//!
//! ## Philosophy
//!
//! - **Message-Oriented**: one `read` yields one complete message; one `write`
//!   sends one. Framing is entirely the transport's business.
//! - **Opaque**: the transport never looks inside the text it carries.

use tagval::TransportError;

pub type Result<T> = std::result::Result<T, TransportError>;

/// Reads and writes complete encoded messages.
///
/// This trait is designed to be object-safe (`Arc<dyn Transport>`).
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Waits for the next complete inbound message.
    async fn read(&self) -> Result<String>;

    /// Sends one complete message, resolving once it has been handed off.
    async fn write(&self, message: &str) -> Result<()>;
}
