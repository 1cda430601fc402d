//! Control-channel transport.
//!
//! A connected channel is split into a write half ([`Transport`]) and a read
//! half ([`TransportReceiver`]) so the session can pump both sides from one
//! `select!` loop. [`Connector`] is the seam the session is tested through:
//! production code uses [`WebSocketConnector`], tests substitute scripted
//! in-memory channels.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::{Error, Result};

/// One inbound occurrence on the control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame arrived.
    Text(String),
    /// The peer closed the channel.
    Closed {
        /// Close code from the peer's close frame, if any
        code: Option<u16>,
        /// Close reason from the peer's close frame, if any
        reason: Option<String>,
    },
}

/// Write half of a connected control channel.
#[async_trait]
pub trait Transport: Send {
    /// Sends one text frame.
    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Closes the channel with the given close code and reason.
    async fn close(&mut self, code: u16, reason: &str) -> Result<()>;
}

/// Read half of a connected control channel.
#[async_trait]
pub trait TransportReceiver: Send {
    /// Next inbound event; `None` once the stream is exhausted.
    async fn next_event(&mut self) -> Option<Result<TransportEvent>>;
}

/// A connected channel, split into its two halves.
pub struct TransportParts {
    /// Write half
    pub sender: Box<dyn Transport>,
    /// Read half
    pub receiver: Box<dyn TransportReceiver>,
}

/// Opens control channels to a controller URL.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establishes one channel to `url`.
    async fn connect(&self, url: &str) -> Result<TransportParts>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Production connector over tokio-tungstenite (`ws://` and `wss://`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, url: &str) -> Result<TransportParts> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| Error::ConnectionFailed(e.to_string()))?;
        let (sink, stream) = stream.split();
        Ok(TransportParts {
            sender: Box::new(WebSocketSender { sink }),
            receiver: Box::new(WebSocketReceiver { stream }),
        })
    }
}

/// Write half of a WebSocket channel.
pub struct WebSocketSender {
    sink: SplitSink<WsStream, Message>,
}

#[async_trait]
impl Transport for WebSocketSender {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.sink
            .send(Message::Text(text))
            .await
            .map_err(|e| Error::TransportError(e.to_string()))
    }

    async fn close(&mut self, code: u16, reason: &str) -> Result<()> {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: reason.to_string().into(),
        };
        self.sink
            .send(Message::Close(Some(frame)))
            .await
            .map_err(|e| Error::TransportError(e.to_string()))
    }
}

/// Read half of a WebSocket channel.
pub struct WebSocketReceiver {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl TransportReceiver for WebSocketReceiver {
    async fn next_event(&mut self) -> Option<Result<TransportEvent>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(TransportEvent::Text(text))),
                Ok(Message::Close(frame)) => {
                    let (code, reason) = match frame {
                        Some(frame) => (
                            Some(u16::from(frame.code)),
                            Some(frame.reason.to_string()),
                        ),
                        None => (None, None),
                    };
                    return Some(Ok(TransportEvent::Closed { code, reason }));
                }
                // Binary, ping, and pong frames are not part of the control
                // protocol.
                Ok(_) => continue,
                Err(e) => return Some(Err(Error::TransportError(e.to_string()))),
            }
        }
    }
}
