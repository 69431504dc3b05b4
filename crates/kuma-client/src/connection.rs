//! WebSocket connection to the Uptime Kuma Socket.IO endpoint
//!
//! ## Architecture
//!
//! ```text
//!  call() ──frame──► outgoing (mpsc) ──► writer task ──► WebSocket
//!    ▲                                                      │
//!    └── oneshot ◄── pending acks ◄── reader task ◄─────────┘
//!                                         │
//!                    snapshots (watch) ◄──┘ pushed lists
//! ```
//!
//! The reader answers server pings, resolves acknowledgements by ID and
//! keeps the latest payload of every pushed event. When the server stays
//! silent longer than `pingInterval + pingTimeout`, or the socket closes,
//! the reader exits: pending calls fail and new calls are refused.

use crate::engineio::{EnginePacket, Handshake};
use crate::socketio::{SocketPacket, connect_error_message};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use kuma_core::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type PendingCalls = Arc<Mutex<HashMap<u64, oneshot::Sender<Vec<Value>>>>>;
type Snapshots = HashMap<String, Value>;

/// Socket.IO URL for an `http(s)://` endpoint
pub fn socket_url(endpoint: &str) -> Result<String> {
    let base = endpoint.trim_end_matches('/');
    let ws = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return Err(Error::config(format!(
            "endpoint must use the http or https scheme. Got: {endpoint}"
        )));
    };
    Ok(format!("{ws}/socket.io/?EIO=4&transport=websocket"))
}

/// A live Socket.IO session
pub struct Connection {
    outgoing: mpsc::UnboundedSender<String>,
    pending: PendingCalls,
    next_id: AtomicU64,
    snapshots: watch::Receiver<Snapshots>,
    closed: Arc<AtomicBool>,
    call_timeout: Duration,
    reader: JoinHandle<()>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("closed", &self.is_closed())
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

impl Connection {
    /// Connect and complete the Engine.IO and Socket.IO handshakes
    pub async fn open(url: &str, connect_timeout: Duration, call_timeout: Duration) -> Result<Self> {
        debug!("Opening WebSocket to {}", url);
        let (ws, _response) = timeout(connect_timeout, connect_async(url))
            .await
            .map_err(|_| Error::timeout(format!("connecting to {url} after {connect_timeout:?}")))?
            .map_err(|e| Error::transport(format!("WebSocket connect to {url} failed: {e}")))?;

        let (mut sink, mut source) = ws.split();
        let handshake = timeout(connect_timeout, handshake(&mut sink, &mut source))
            .await
            .map_err(|_| Error::timeout(format!("Socket.IO handshake after {connect_timeout:?}")))??;
        debug!(
            "Socket.IO session {} established (ping every {}ms)",
            handshake.sid, handshake.ping_interval
        );

        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let pending: PendingCalls = Arc::new(Mutex::new(HashMap::new()));
        let (snapshot_tx, snapshots) = watch::channel(Snapshots::new());
        let closed = Arc::new(AtomicBool::new(false));

        tokio::spawn(write_loop(sink, outgoing_rx));
        let reader = tokio::spawn(read_loop(
            source,
            handshake.liveness_timeout(),
            outgoing.clone(),
            Arc::clone(&pending),
            snapshot_tx,
            Arc::clone(&closed),
        ));

        Ok(Self {
            outgoing,
            pending,
            next_id: AtomicU64::new(0),
            snapshots,
            closed,
            call_timeout,
            reader,
        })
    }

    /// Whether the session has ended
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Emit `event` and wait for its acknowledgement
    ///
    /// Arguments are never logged; `login` carries the password.
    pub async fn call(&self, event: &str, args: Vec<Value>) -> Result<Vec<Value>> {
        if self.is_closed() {
            return Err(Error::transport("connection to Uptime Kuma is closed"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        {
            // The reader sets `closed` before draining `pending` under this lock
            let mut pending = self.pending.lock().await;
            if self.is_closed() {
                return Err(Error::transport("connection to Uptime Kuma is closed"));
            }
            pending.insert(id, tx);
        }

        let frame = EnginePacket::Message(SocketPacket::call(id, event, args).encode()).encode();
        trace!("-> {} (ack {})", event, id);
        if self.outgoing.send(frame).is_err() {
            self.pending.lock().await.remove(&id);
            return Err(Error::transport("connection to Uptime Kuma is closed"));
        }

        match timeout(self.call_timeout, rx).await {
            Ok(Ok(reply)) => {
                trace!("<- {} (ack {})", event, id);
                Ok(reply)
            }
            Ok(Err(_)) => Err(Error::transport(format!(
                "connection closed while waiting for {event}"
            ))),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(Error::timeout(format!(
                    "{event} was not acknowledged within {:?}",
                    self.call_timeout
                )))
            }
        }
    }

    /// Latest payload of a pushed event, waiting for the first one
    pub async fn snapshot(&self, event: &str) -> Result<Value> {
        let mut rx = self.snapshots.clone();
        let wait = async {
            loop {
                let current = rx.borrow_and_update().get(event).cloned();
                if let Some(value) = current {
                    return Ok(value);
                }
                if rx.changed().await.is_err() {
                    return Err(Error::transport(format!(
                        "connection closed before {event} arrived"
                    )));
                }
            }
        };

        timeout(self.call_timeout, wait)
            .await
            .map_err(|_| Error::timeout(format!("no {event} received within {:?}", self.call_timeout)))?
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let _ = self
            .outgoing
            .send(EnginePacket::Message(SocketPacket::Disconnect.encode()).encode());
        // The writer drains the disconnect and exits once the reader's
        // sender is gone too.
        self.reader.abort();
    }
}

/// Wait for OPEN, send CONNECT, wait for the CONNECT reply
async fn handshake(sink: &mut WsSink, source: &mut WsSource) -> Result<Handshake> {
    let handshake = loop {
        match EnginePacket::decode(&next_text(source).await?)? {
            EnginePacket::Open(handshake) => break handshake,
            other => debug!("Ignoring {:?} before open", other),
        }
    };

    send(sink, EnginePacket::Message(SocketPacket::Connect(None).encode())).await?;

    loop {
        match EnginePacket::decode(&next_text(source).await?)? {
            EnginePacket::Ping(data) => send(sink, EnginePacket::Pong(data)).await?,
            EnginePacket::Message(packet) => match SocketPacket::decode(&packet)? {
                SocketPacket::Connect(_) => return Ok(handshake),
                SocketPacket::ConnectError(data) => {
                    return Err(Error::transport(format!(
                        "Socket.IO connection refused: {}",
                        connect_error_message(&data)
                    )));
                }
                other => debug!("Ignoring {:?} before connect", other),
            },
            EnginePacket::Close => {
                return Err(Error::transport("server closed the session during handshake"));
            }
            other => debug!("Ignoring {:?} before connect", other),
        }
    }
}

async fn send(sink: &mut WsSink, packet: EnginePacket) -> Result<()> {
    sink.send(Message::Text(packet.encode()))
        .await
        .map_err(|e| Error::transport(format!("WebSocket send failed: {e}")))
}

/// Next text frame, skipping control frames
async fn next_text(source: &mut WsSource) -> Result<String> {
    loop {
        match source.next().await {
            Some(Ok(Message::Text(text))) => return Ok(text),
            Some(Ok(Message::Close(_))) | None => {
                return Err(Error::transport("WebSocket closed by server"));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(Error::transport(format!("WebSocket read failed: {e}"))),
        }
    }
}

async fn write_loop(mut sink: WsSink, mut outgoing: mpsc::UnboundedReceiver<String>) {
    while let Some(frame) = outgoing.recv().await {
        if let Err(e) = sink.send(Message::Text(frame)).await {
            warn!("WebSocket send failed: {}", e);
            break;
        }
    }
    let _ = sink.close().await;
    debug!("Writer stopped");
}

async fn read_loop(
    mut source: WsSource,
    liveness: Duration,
    outgoing: mpsc::UnboundedSender<String>,
    pending: PendingCalls,
    snapshots: watch::Sender<Snapshots>,
    closed: Arc<AtomicBool>,
) {
    loop {
        let frame = match timeout(liveness, next_text(&mut source)).await {
            Ok(Ok(frame)) => frame,
            Ok(Err(e)) => {
                warn!("Connection to Uptime Kuma lost: {}", e);
                break;
            }
            Err(_) => {
                warn!("No traffic from Uptime Kuma for {:?}, closing", liveness);
                break;
            }
        };

        match dispatch(&frame, &outgoing, &pending, &snapshots).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => warn!("Ignoring malformed frame: {}", e),
        }
    }

    closed.store(true, Ordering::SeqCst);
    // Dropping the senders wakes every waiting call
    pending.lock().await.clear();
    debug!("Reader stopped");
}

/// Handle one inbound frame; `Ok(false)` ends the session
async fn dispatch(
    frame: &str,
    outgoing: &mpsc::UnboundedSender<String>,
    pending: &PendingCalls,
    snapshots: &watch::Sender<Snapshots>,
) -> Result<bool> {
    match EnginePacket::decode(frame)? {
        EnginePacket::Ping(data) => {
            trace!("ping");
            Ok(outgoing.send(EnginePacket::Pong(data).encode()).is_ok())
        }
        EnginePacket::Close => {
            debug!("Server closed the Engine.IO session");
            Ok(false)
        }
        EnginePacket::Message(packet) => match SocketPacket::decode(&packet)? {
            SocketPacket::Ack { id, args } => {
                match pending.lock().await.remove(&id) {
                    Some(tx) => {
                        let _ = tx.send(args);
                    }
                    None => debug!("Late acknowledgement {} dropped", id),
                }
                Ok(true)
            }
            SocketPacket::Event { name, args, .. } => {
                trace!("pushed {}", name);
                let payload = args.into_iter().next().unwrap_or(Value::Null);
                snapshots.send_modify(|cache| {
                    cache.insert(name, payload);
                });
                Ok(true)
            }
            SocketPacket::Disconnect => {
                debug!("Server disconnected the Socket.IO session");
                Ok(false)
            }
            other => {
                debug!("Ignoring {:?}", other);
                Ok(true)
            }
        },
        _ => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_endpoints_to_socket_urls() {
        assert_eq!(
            socket_url("http://localhost:3001").unwrap(),
            "ws://localhost:3001/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            socket_url("https://kuma.example.com/status/").unwrap(),
            "wss://kuma.example.com/status/socket.io/?EIO=4&transport=websocket"
        );
        assert!(matches!(socket_url("ftp://x"), Err(Error::Config(_))));
    }
}
