//! Session notifications.

use std::ops::ControlFlow;

use serde::Deserialize;

use super::ResilientSocket;
use super::SocketEvent;
use crate::error::SocketError;

/// A notification the backend pushes about the signed-in session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionMessage {
    /// The session was ended elsewhere.
    Logout,
    /// The same account signed in from another browser.
    DuplicateLogin,
    #[serde(other)]
    Other,
}

impl SessionMessage {
    /// Parses a text frame. Bare `logout` frames are accepted too.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "logout" => Some(Self::Logout),
            "duplicateLogin" => Some(Self::DuplicateLogin),
            json => serde_json::from_str(json).ok(),
        }
    }

    /// Returns `true` if the local session must end.
    pub fn ends_session(&self) -> bool {
        matches!(self, Self::Logout | Self::DuplicateLogin)
    }
}

/// Session socket URL for an account.
pub fn session_url(ws_base: &str, account_id: &str) -> String {
    format!("{}/{}", ws_base.trim_end_matches('/'), account_id)
}

/// Waits until the backend ends the session.
///
/// Frames that are not session notifications are logged and skipped.
pub async fn watch_session(socket: &ResilientSocket) -> Result<SessionMessage, SocketError> {
    socket
        .run(|event| match event {
            SocketEvent::Message(text) => match SessionMessage::parse(&text) {
                Some(message) if message.ends_session() => ControlFlow::Break(message),
                _ => {
                    log::debug!("ignoring socket frame: {}", text);
                    ControlFlow::Continue(())
                }
            },
            _ => ControlFlow::Continue(()),
        })
        .await
}

#[cfg(test)]
mod tests {
    use futures::SinkExt;
    use futures::StreamExt;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;
    use tokio_tungstenite::tungstenite::Message;

    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            SessionMessage::parse(r#"{"type":"logout"}"#),
            Some(SessionMessage::Logout)
        );
        assert_eq!(
            SessionMessage::parse(r#"{"type":"duplicateLogin","at":"2024-01-01"}"#),
            Some(SessionMessage::DuplicateLogin)
        );
        assert_eq!(
            SessionMessage::parse(r#"{"type":"ping"}"#),
            Some(SessionMessage::Other)
        );
        assert_eq!(SessionMessage::parse(" logout\n"), Some(SessionMessage::Logout));
        assert_eq!(SessionMessage::parse("status ok"), None);
        assert!(!SessionMessage::Other.ends_session());
    }

    #[test]
    fn test_session_url() {
        assert_eq!(session_url("ws://host/ws/", "kim"), "ws://host/ws/kim");
    }

    #[tokio::test]
    async fn test_watch_until_logout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(tcp).await.unwrap();
            for frame in ["status ok", r#"{"type":"ping"}"#, r#"{"type":"logout"}"#] {
                ws.send(Message::Text(frame.to_string())).await.unwrap();
            }
            while let Some(Ok(_)) = ws.next().await {}
        });

        let socket = ResilientSocket::new(session_url(&format!("ws://{addr}"), "kim"));
        let message = watch_session(&socket).await.unwrap();

        assert_eq!(message, SessionMessage::Logout);
        server.await.unwrap();
    }
}
