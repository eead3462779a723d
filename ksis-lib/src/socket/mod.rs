//! Resilient WebSocket connection.
//!
//! Dashboard pages keep a socket open to learn about session changes. The
//! connection is re-established with exponential backoff when it drops,
//! and given up after too many consecutive failures.
//!
//! - [`ResilientSocket`] - connect, read, reconnect
//! - [`ReconnectPolicy`] - retry count and backoff
//! - [`SessionMessage`] - session notifications pushed by the backend

mod policy;
mod session;

use std::ops::ControlFlow;
use std::time::Duration;

use futures::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

pub use policy::ReconnectPolicy;
pub use session::SessionMessage;
pub use session::session_url;
pub use session::watch_session;

use crate::error::SocketError;

/// Something that happened on the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// A connection is open.
    Connected,
    /// A text frame arrived.
    Message(String),
    /// The open connection ended.
    Disconnected,
    /// About to wait `delay` before retry number `attempt`.
    Reconnecting { attempt: u32, delay: Duration },
}

/// A WebSocket client that reconnects on its own.
#[derive(Debug, Clone)]
pub struct ResilientSocket {
    url: String,
    policy: ReconnectPolicy,
}

impl ResilientSocket {
    /// Creates a socket for `url` with the default policy.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            policy: ReconnectPolicy::default(),
        }
    }

    /// Sets the reconnection policy.
    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    /// Connects and feeds every event to `handler` until it breaks.
    ///
    /// Returns the handler's break value, or
    /// [`SocketError::RetriesExhausted`] once `max_retries` consecutive
    /// reconnects have failed. The retry count resets on every successful
    /// connection.
    pub async fn run<B, F>(&self, mut handler: F) -> Result<B, SocketError>
    where
        F: FnMut(SocketEvent) -> ControlFlow<B>,
    {
        let mut retry: u32 = 0;

        loop {
            log::debug!("connecting to {}", self.url);

            match connect_async(self.url.as_str()).await {
                Ok((mut stream, _response)) => {
                    retry = 0;
                    log::info!("socket connected to {}", self.url);
                    if let ControlFlow::Break(value) = handler(SocketEvent::Connected) {
                        close(&mut stream).await;
                        return Ok(value);
                    }

                    while let Some(frame) = stream.next().await {
                        match frame {
                            Ok(Message::Text(text)) => {
                                if let ControlFlow::Break(value) = handler(SocketEvent::Message(text)) {
                                    close(&mut stream).await;
                                    return Ok(value);
                                }
                            }
                            Ok(Message::Close(frame)) => {
                                log::debug!("socket closed by peer: {:?}", frame);
                                break;
                            }
                            Ok(_) => {}
                            Err(e) => {
                                log::warn!("socket receive error: {}", e);
                                break;
                            }
                        }
                    }

                    if let ControlFlow::Break(value) = handler(SocketEvent::Disconnected) {
                        return Ok(value);
                    }
                }
                Err(e) => {
                    log::warn!("socket connect to {} failed: {}", self.url, e);
                    if retry >= self.policy.max_retries {
                        return Err(SocketError::RetriesExhausted { attempts: retry + 1 });
                    }
                }
            }

            retry += 1;
            let delay = self.policy.delay_for(retry);
            log::warn!("reconnecting in {:?} (retry {}/{})", delay, retry, self.policy.max_retries);
            if let ControlFlow::Break(value) = handler(SocketEvent::Reconnecting {
                attempt: retry,
                delay,
            }) {
                return Ok(value);
            }
            tokio::time::sleep(delay).await;
        }
    }
}

async fn close<S>(stream: &mut tokio_tungstenite::WebSocketStream<S>)
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    if let Err(e) = stream.close(None).await {
        log::debug!("socket close failed: {}", e);
    }
}
