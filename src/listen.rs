//! A single-connection client for the invoice status feed.
//!
//! One [`Listener`] owns one websocket connection for its whole lifetime.
//! There is no reconnection and no timeout: when the feed ends, for whatever
//! reason, the listener is done.

use async_tungstenite::{
    WebSocketStream,
    async_std::{ConnectStream, connect_async},
    tungstenite::{self, Message},
};
use futures::StreamExt;

use crate::endpoint::WatchEndpoint;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ListenError {
    /// The connection attempt itself failed; no messages were received.
    #[error("Could not connect to the invoice feed")]
    Connect(#[source] tungstenite::Error),
    /// The connection broke mid-stream without a close handshake.
    #[error("Connection failed while waiting for updates")]
    Transport(#[source] tungstenite::Error),
}

pub struct Listener {
    stream: WebSocketStream<ConnectStream>,
}

impl Listener {
    /// Makes a single connection attempt to the invoice feed.
    pub async fn connect(endpoint: &WatchEndpoint) -> Result<Self, ListenError> {
        let url = endpoint.url();
        let (stream, _response) = connect_async(url.as_str())
            .await
            .map_err(ListenError::Connect)?;
        tracing::debug!("Connected to {}", url);
        Ok(Self { stream })
    }

    /// Waits for the next text frame from the feed.
    ///
    /// Returns `Ok(None)` once the peer has closed the connection. Control
    /// frames are handled by the transport and never surface here; binary
    /// frames are not part of the protocol and are skipped.
    pub async fn next_message(&mut self) -> Result<Option<String>, ListenError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text.as_str().to_owned())),
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!("Feed closed by the peer");
                    return Ok(None);
                },
                Some(Ok(Message::Binary(payload))) => {
                    tracing::warn!(
                        "Ignoring a {} byte binary frame, the feed is text only",
                        payload.len()
                    );
                },
                Some(Ok(_)) => {}, // ping/pong
                Some(Err(err)) => return Err(ListenError::Transport(err)),
            }
        }
    }
}
