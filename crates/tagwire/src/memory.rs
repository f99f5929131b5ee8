//! In-process transports.
//!
//! Used by the test suite and handy for embedding two endpoints in one process.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::mpsc;

use tagval::TransportError;

use crate::transport;
use crate::transport::Transport;

/// A duplex channel transport using tokio mpsc channels.
///
/// Messages written on one end are read on its peer, and vice versa.
pub struct DuplexTransport {
    tx: mpsc::UnboundedSender<String>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
}

impl DuplexTransport {
    /// Creates a transport from separate tx and rx channels.
    pub fn new(tx: mpsc::UnboundedSender<String>, rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Creates a pair of transports connected to each other.
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        (Self::new(tx_a, rx_b), Self::new(tx_b, rx_a))
    }
}

#[async_trait::async_trait]
impl Transport for DuplexTransport {
    async fn read(&self) -> transport::Result<String> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or_else(|| TransportError::unknown("channel closed"))
    }

    async fn write(&self, message: &str) -> transport::Result<()> {
        self.tx
            .send(message.to_string())
            .map_err(|_| TransportError::unknown("channel closed"))
    }
}

/// A transport that replays queued inbound messages and records outbound ones.
#[derive(Default)]
pub struct QueueTransport {
    inbound: Mutex<VecDeque<String>>,
    outbound: Mutex<Vec<String>>,
}

impl QueueTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport whose reads yield `messages` in order.
    pub fn with_inbound<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inbound: Mutex::new(messages.into_iter().map(Into::into).collect()),
            outbound: Mutex::new(Vec::new()),
        }
    }

    /// Queues one more inbound message.
    pub async fn push_inbound(&self, message: impl Into<String>) {
        self.inbound.lock().await.push_back(message.into());
    }

    /// Everything written so far, oldest first.
    pub async fn written(&self) -> Vec<String> {
        self.outbound.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Transport for QueueTransport {
    async fn read(&self) -> transport::Result<String> {
        self.inbound
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| TransportError::unknown("no inbound message"))
    }

    async fn write(&self, message: &str) -> transport::Result<()> {
        self.outbound.lock().await.push(message.to_string());
        Ok(())
    }
}
