//! The one reconnecting duplex socket the CSE owns (§4.1).
//!
//! Adapted from the teacher crate's `connection.rs`: a `recv_event` loop
//! that folds reconnection into itself rather than surfacing a distinct
//! "disconnected" error to the caller, plus a separately spawned heartbeat
//! task sharing the outbound sink via [`crate::io::SharedSink`] exactly as
//! the teacher's `heartbeat` function does.

use std::collections::VecDeque;
use std::time::Duration;

use futures::StreamExt;
use serde_json::Value;
use tokio::sync::{oneshot, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info_span, warn, Instrument};

use crate::io::{JsonSink, JsonStream, SharedSink};
use crate::model::command::Command;
use crate::model::event::Event;
use crate::{Error, Result};

const OUTBOUND_CAPACITY: usize = 256;
const BACKOFF_INITIAL: Duration = Duration::from_secs(1);
const BACKOFF_CAP: Duration = Duration::from_secs(30);
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);

/// Owns the socket halves, the outbound FIFO used while disconnected, and
/// the reconnect backoff state.
pub struct Transport {
    base_url: String,
    nickname: String,
    write: Option<SharedSink<JsonSink, Value>>,
    read: Option<JsonStream>,
    outbound: VecDeque<Value>,
    heartbeat_shutdown: Option<oneshot::Sender<()>>,
    backoff: Duration,
    shutdown: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    connected: bool,
    /// Set once `connect()` has been called and cleared by `disconnect()`.
    /// Lets the engine avoid polling `recv_event` (which would otherwise
    /// busily try to dial a connection with an empty nickname) before the
    /// first `connect()`.
    activated: bool,
    /// Set by an automatic reconnect inside [`Transport::recv_event`] (never
    /// by the initial [`Transport::connect`]); cleared by
    /// [`Transport::take_reconnected`]. This is how the engine learns "the
    /// socket just reopened on its own" so it can re-run
    /// [`crate::session::on_connect_commands`] for that open too (§4.1: "on
    /// each open", not just the first).
    reconnected: bool,
}

impl Transport {
    /// `base_url` is the server's HTTP(S) origin; the `ws`/`wss` scheme and
    /// `/ws` path are derived from it per §4.1.
    pub fn new(base_url: impl Into<String>) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        Transport {
            base_url: base_url.into(),
            nickname: String::new(),
            write: None,
            read: None,
            outbound: VecDeque::new(),
            heartbeat_shutdown: None,
            backoff: BACKOFF_INITIAL,
            shutdown,
            shutdown_rx,
            connected: false,
            activated: false,
            reconnected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Returns whether an automatic reconnect has completed since the last
    /// call, clearing the flag. The engine checks this after every event
    /// [`Transport::recv_event`] hands back so it can re-send
    /// [`crate::session::on_connect_commands`] for that reopened socket,
    /// exactly as it does for the first `connect()` (§4.1).
    pub fn take_reconnected(&mut self) -> bool {
        std::mem::take(&mut self.reconnected)
    }

    /// Whether the engine should be polling [`Transport::recv_event`] at
    /// all: `false` before the first `connect()` and after an explicit
    /// `disconnect()`.
    pub fn should_poll(&self) -> bool {
        self.activated
    }

    /// Idempotent: a second `connect()` while already connected is a no-op
    /// (§4.1).
    pub async fn connect(&mut self, nickname: &str) -> Result<()> {
        if self.connected {
            return Ok(());
        }
        self.nickname = nickname.to_owned();
        self.activated = true;
        let _ = self.shutdown.send(false);
        self.establish()
            .instrument(info_span!("concord.transport", event = "connect"))
            .await
    }

    async fn establish(&mut self) -> Result<()> {
        let url = build_ws_url(&self.base_url, &self.nickname);
        let (stream, _response) = tokio_tungstenite::connect_async(url).await?;
        let (write, read) = stream.split();
        let shared = SharedSink::new(JsonSink::new(write));

        let (heartbeat_tx, heartbeat_rx) = oneshot::channel();
        tokio::spawn(heartbeat(HEARTBEAT_INTERVAL, shared.clone(), heartbeat_rx));

        self.write = Some(shared);
        self.read = Some(JsonStream::new(read));
        self.heartbeat_shutdown = Some(heartbeat_tx);
        self.connected = true;
        self.backoff = BACKOFF_INITIAL;

        self.flush_outbound().await;
        Ok(())
    }

    async fn flush_outbound(&mut self) {
        while let Some(value) = self.outbound.pop_front() {
            let Some(sink) = self.write.clone() else {
                self.outbound.push_front(value);
                break;
            };
            if let Err(err) = sink.send(value.clone()).await {
                warn!("failed to flush queued command, will retry later: {err:?}");
                self.outbound.push_front(value);
                break;
            }
        }
    }

    /// Serialize and transmit `command`. Buffers in a bounded FIFO while
    /// disconnected rather than dropping it, so commands issued between
    /// `connect()` and the socket actually opening are not lost (§4.1).
    pub async fn send(&mut self, command: &Command) -> Result<()> {
        let value = serde_json::to_value(command)?;

        if self.connected {
            if let Some(sink) = self.write.clone() {
                if sink.send(value.clone()).await.is_ok() {
                    return Ok(());
                }
            }
        }

        if self.outbound.len() >= OUTBOUND_CAPACITY {
            self.outbound.pop_front();
            warn!("outbound command queue full, dropping oldest entry");
        }
        self.outbound.push_back(value);
        Ok(())
    }

    /// Await the next decoded event, transparently reconnecting with
    /// exponential backoff on unexpected closure. Only returns `Err` if
    /// `disconnect()` was called.
    pub async fn recv_event(&mut self) -> Result<Event> {
        loop {
            if !self.connected {
                self.wait_and_reconnect().await?;
                continue;
            }

            let stream = self
                .read
                .as_mut()
                .expect("connected transport always has a read half");

            match stream.next().await {
                Some(Ok(value)) => match serde_json::from_value::<Event>(value.clone()) {
                    Ok(event) => return Ok(event),
                    Err(err) => {
                        warn!("dropping malformed frame ({err}): {value}");
                        continue;
                    }
                },
                Some(Err(err)) => {
                    warn!("transport error, reconnecting: {err:?}");
                    self.mark_disconnected();
                }
                None => {
                    debug!("socket closed by peer, reconnecting");
                    self.mark_disconnected();
                }
            }
        }
    }

    fn mark_disconnected(&mut self) {
        self.connected = false;
        self.read = None;
        self.write = None;
        if let Some(tx) = self.heartbeat_shutdown.take() {
            let _ = tx.send(());
        }
    }

    /// Sleep for the current backoff, then attempt one reconnect. The sleep
    /// is interruptible by `disconnect()` so `disconnect()` never blocks on
    /// a pending backoff (§4.1 addendum).
    async fn wait_and_reconnect(&mut self) -> Result<()> {
        let mut shutdown_rx = self.shutdown_rx.clone();
        if *shutdown_rx.borrow() {
            return Err(Error::Closed(None, "disconnect() requested".into()));
        }

        tokio::select! {
            _ = tokio::time::sleep(self.backoff) => {}
            _ = shutdown_rx.changed() => {
                return Err(Error::Closed(None, "disconnect() requested".into()));
            }
        }

        self.backoff = (self.backoff * 2).min(BACKOFF_CAP);

        match self
            .establish()
            .instrument(info_span!("concord.transport", event = "reconnect"))
            .await
        {
            Ok(()) => self.reconnected = true,
            Err(err) => warn!("reconnect attempt failed, will retry: {err}"),
        }
        Ok(())
    }

    /// Close the socket, suppress further reconnect attempts, and reset
    /// transport-owned state (§4.1). Store/UI state are the engine's
    /// concern, not this one's.
    pub async fn disconnect(&mut self) {
        let _ = self.shutdown.send(true);
        self.mark_disconnected();
        self.outbound.clear();
        self.backoff = BACKOFF_INITIAL;
        self.activated = false;
    }
}

async fn heartbeat(
    interval: Duration,
    sink: SharedSink<JsonSink, Value>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        if let Err(err) = sink.send(serde_json::json!({ "type": "heartbeat" })).await {
            warn!("heartbeat send failed, socket is presumably dead: {err:?}");
            break;
        }
    }
}

fn build_ws_url(base: &str, nickname: &str) -> String {
    let (scheme, rest) = if let Some(rest) = base.strip_prefix("https://") {
        ("wss", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        ("ws", rest)
    } else {
        ("wss", base)
    };
    format!(
        "{scheme}://{}/ws?nickname={}",
        rest.trim_end_matches('/'),
        urlencoding::encode(nickname)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_origin_becomes_wss() {
        let url = build_ws_url("https://chat.example.com", "alice");
        assert_eq!(url, "wss://chat.example.com/ws?nickname=alice");
    }

    #[test]
    fn http_origin_becomes_ws() {
        let url = build_ws_url("http://localhost:8080", "al ice");
        assert_eq!(url, "ws://localhost:8080/ws?nickname=al%20ice");
    }
}
