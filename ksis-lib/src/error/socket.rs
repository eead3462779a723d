//! WebSocket error types

use tokio_tungstenite::tungstenite;

/// Errors from the resilient socket.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    /// Connecting or reading failed.
    #[error("WebSocket error: {0}")]
    WebSocket(#[source] Box<tungstenite::Error>),

    /// Reconnection gave up.
    #[error("Gave up after {attempts} consecutive failed connection attempts")]
    RetriesExhausted { attempts: u32 },
}

impl From<tungstenite::Error> for SocketError {
    fn from(error: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(error))
    }
}
