//! JSON-accepting [`Stream`]s and [`Sink`]s layered over a WebSocket split.

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::{ready, stream::SplitSink, stream::SplitStream, FutureExt, Sink, SinkExt, Stream, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// JSON values received from the gateway socket, one per text frame.
#[derive(Debug)]
pub struct JsonStream {
    inner: SplitStream<WsStream>,
}

impl JsonStream {
    pub fn new(read: SplitStream<WsStream>) -> Self {
        Self { inner: read }
    }
}

impl Stream for JsonStream {
    type Item = Result<Value, JsonStreamError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            let message = match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(message)) => message,
                Some(Err(err)) => return Poll::Ready(Some(Err(JsonStreamError::Ws(err)))),
                None => return Poll::Ready(None),
            };

            return Poll::Ready(Some(match message {
                Message::Text(text) => serde_json::from_str(&text).map_err(JsonStreamError::Json),
                Message::Binary(bin) => serde_json::from_slice(&bin).map_err(JsonStreamError::Json),
                // Ping/Pong/Close frames carry no payload of interest to the event
                // dispatcher; tungstenite answers pings automatically. Skip and
                // poll again rather than surfacing an item for them.
                Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => {
                    continue;
                }
            }));
        }
    }
}

/// JSON values sent to the gateway socket, one per text frame.
#[derive(Debug)]
pub struct JsonSink {
    inner: SplitSink<WsStream, Message>,
}

impl JsonSink {
    pub fn new(write: SplitSink<WsStream, Message>) -> Self {
        Self { inner: write }
    }
}

impl Sink<Value> for JsonSink {
    type Error = JsonStreamError;

    fn start_send(mut self: Pin<&mut Self>, item: Value) -> Result<(), Self::Error> {
        let json = serde_json::to_string(&item).map_err(JsonStreamError::Json)?;
        self.inner
            .start_send_unpin(Message::Text(json))
            .map_err(JsonStreamError::Ws)
    }

    fn poll_ready(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready_unpin(cx).map_err(JsonStreamError::Ws)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_flush_unpin(cx).map_err(JsonStreamError::Ws)
    }

    fn poll_close(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_close_unpin(cx).map_err(JsonStreamError::Ws)
    }
}

/// Errors occurring when pulling or pushing JSON frames over the socket.
#[derive(Debug)]
pub enum JsonStreamError {
    Ws(tokio_tungstenite::tungstenite::Error),
    Json(serde_json::Error),
}

impl From<JsonStreamError> for crate::Error {
    fn from(err: JsonStreamError) -> Self {
        match err {
            JsonStreamError::Ws(err) => crate::Error::WebSocket(err),
            JsonStreamError::Json(err) => crate::Error::Json(err),
        }
    }
}

/// Share a [`Sink`] between many concurrent senders by offloading the actual
/// send to a spawned task and communicating over channels.
///
/// This is what lets the heartbeat task and the command-flushing task both
/// hold a handle to the one outbound half of the socket.
///
/// # Memory exhaustion
///
/// The internal channel is unbounded: a peer that never drains frames (or a
/// transport that never flushes) can grow this queue without limit. The
/// Command Router's own outbound FIFO (§4.1) is bounded instead; this
/// channel only ever carries already-admitted frames.
#[derive(Debug)]
pub struct SharedSink<Si, T>
where
    Si: Sink<T>,
{
    channel: Option<mpsc::UnboundedSender<(T, oneshot::Sender<Result<(), Si::Error>>)>>,
}

impl<Si, T> SharedSink<Si, T>
where
    T: Send + 'static,
    Si: Sink<T> + Send + Unpin + 'static,
    Si::Error: Send,
{
    pub fn new(sink: Si) -> Self {
        let (send, mut receive) =
            mpsc::unbounded_channel::<(T, oneshot::Sender<Result<(), Si::Error>>)>();

        tokio::spawn(async move {
            let mut sink = sink;
            while let Some((item, reply)) = receive.recv().await {
                let _ = reply.send(sink.send(item).await);
            }
        });

        Self { channel: Some(send) }
    }
}

impl<Si, T> SharedSink<Si, T>
where
    Si: Sink<T>,
{
    /// Send one item through the shared sink, awaiting its completion.
    pub async fn send(&self, item: T) -> Result<(), SharedSinkError<Si, T>> {
        let (send, receive) = oneshot::channel();
        match self.channel.as_ref() {
            Some(sender) => {
                sender
                    .send((item, send))
                    .map_err(|_| SharedSinkError::SinkClosed)?;
            }
            None => return Err(SharedSinkError::SinkClosed),
        }
        match receive.await {
            Ok(result) => result.map_err(SharedSinkError::SinkError),
            Err(_) => Err(SharedSinkError::SinkClosed),
        }
    }
}

impl<Si: Sink<T>, T> Clone for SharedSink<Si, T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Errors that can occur when sending through a [`SharedSink`].
#[derive(Debug)]
pub enum SharedSinkError<Si: Sink<T>, T> {
    SinkClosed,
    SinkError(Si::Error),
}
