use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::{MoveForwardError, Result};

type EventWebSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One item read from the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// An event body to forward.
    Event(Vec<u8>),
    /// Protocol traffic with nothing to forward.
    Control,
}

/// A blocking source of inbound events.
///
/// Any error is terminal: the stream is gone and is not reopened.
#[async_trait]
pub trait EventSource: Send {
    async fn recv(&mut self) -> Result<Inbound>;
}

/// Event source backed by a WebSocket connection.
///
/// The socket is closed when the source is dropped.
pub struct WebSocketSource {
    socket: EventWebSocket,
}

impl WebSocketSource {
    /// Connect to `stream_url`, authenticating with `token` as a query parameter.
    pub async fn connect(stream_url: &str, token: &str) -> Result<Self> {
        let url = stream_url_with_token(stream_url, token)?;
        let (socket, response) = connect_async(url.as_str())
            .await
            .map_err(|err| MoveForwardError::RelayConnection(err.to_string()))?;
        debug!(status = %response.status(), "event stream connected");
        Ok(Self { socket })
    }
}

#[async_trait]
impl EventSource for WebSocketSource {
    async fn recv(&mut self) -> Result<Inbound> {
        match self.socket.next().await {
            Some(Ok(Message::Text(text))) => Ok(Inbound::Event(text.into_bytes())),
            Some(Ok(Message::Binary(bytes))) => Ok(Inbound::Event(bytes.to_vec())),
            Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {
                Ok(Inbound::Control)
            }
            Some(Ok(Message::Close(frame))) => {
                let reason = frame
                    .map(|f| format!(" ({} {})", f.code, f.reason))
                    .unwrap_or_default();
                Err(MoveForwardError::RelayRead(format!(
                    "stream closed by server{reason}"
                )))
            }
            Some(Err(err)) => Err(MoveForwardError::RelayRead(err.to_string())),
            None => Err(MoveForwardError::RelayRead("stream ended".to_string())),
        }
    }
}

/// Append `token` to the stream URL, keeping any existing query.
pub fn stream_url_with_token(stream_url: &str, token: &str) -> Result<Url> {
    let mut url = Url::parse(stream_url).map_err(|err| {
        MoveForwardError::RelayConnection(format!("invalid stream URL {stream_url}: {err}"))
    })?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url)
}
