//! A scripted Uptime Kuma Socket.IO server
//!
//! Accepts one WebSocket connection, completes the Engine.IO/Socket.IO
//! handshake, sends any scripted frames, then answers each event through
//! the test's handler.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use kuma_client::socketio::SocketPacket;
use kuma_core::ProviderConfig;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};

const OPEN: &str =
    r#"0{"sid":"fake","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

/// Engine.IO ping
pub const PING: &str = "2";

/// How the server answers one event
pub enum Reply {
    /// Acknowledge with a payload
    Ack(Value),
    /// Push events first, then acknowledge
    PushThenAck(Vec<(&'static str, Value)>, Value),
    /// Drop the connection without answering
    Close,
}

/// A pushed event frame
pub fn push(name: &str, payload: Value) -> String {
    let packet = SocketPacket::Event {
        id: None,
        name: name.to_string(),
        args: vec![payload],
    };
    format!("4{}", packet.encode())
}

type Calls = Arc<Mutex<Vec<(String, Vec<Value>)>>>;
type Frames = Arc<Mutex<Vec<String>>>;

pub struct FakeKuma {
    pub endpoint: String,
    calls: Calls,
    frames: Frames,
    task: JoinHandle<()>,
}

impl FakeKuma {
    /// Accept the Socket.IO connection, send `after_connect`, then serve events
    pub async fn start<H>(after_connect: Vec<String>, handler: H) -> Self
    where
        H: Fn(&str, &[Value]) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let calls: Calls = Arc::default();
        let frames: Frames = Arc::default();

        let task = tokio::spawn(serve(
            listener,
            Some(after_connect),
            handler,
            Arc::clone(&calls),
            Arc::clone(&frames),
        ));

        Self {
            endpoint,
            calls,
            frames,
            task,
        }
    }

    /// Refuse the Socket.IO connection
    pub async fn refusing() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let calls: Calls = Arc::default();
        let frames: Frames = Arc::default();

        let task = tokio::spawn(serve(
            listener,
            None,
            |_: &str, _: &[Value]| Reply::Close,
            Arc::clone(&calls),
            Arc::clone(&frames),
        ));

        Self {
            endpoint,
            calls,
            frames,
            task,
        }
    }

    pub fn config(&self) -> ProviderConfig {
        let mut config = ProviderConfig::new(self.endpoint.clone());
        config.connect_timeout = Duration::from_secs(5);
        config.call_timeout = Duration::from_secs(5);
        config
    }

    /// Event names received so far, in order
    pub fn events(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Arguments of the `n`th received event
    pub fn args(&self, n: usize) -> Vec<Value> {
        self.calls.lock().unwrap()[n].1.clone()
    }

    /// Raw frames received after the handshake
    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().unwrap().clone()
    }
}

impl Drop for FakeKuma {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn next_text(ws: &mut WebSocketStream<TcpStream>) -> Option<String> {
    while let Some(Ok(message)) = ws.next().await {
        if let Message::Text(text) = message {
            return Some(text);
        }
    }
    None
}

async fn serve<H>(
    listener: TcpListener,
    after_connect: Option<Vec<String>>,
    handler: H,
    calls: Calls,
    frames: Frames,
) where
    H: Fn(&str, &[Value]) -> Reply + Send + Sync + 'static,
{
    let (tcp, _) = listener.accept().await.unwrap();
    let mut ws = accept_async(tcp).await.unwrap();

    ws.send(Message::Text(OPEN.to_string())).await.unwrap();
    assert_eq!(next_text(&mut ws).await.as_deref(), Some("40"));

    let Some(after_connect) = after_connect else {
        let _ = ws
            .send(Message::Text(r#"44{"message":"Not authorized"}"#.to_string()))
            .await;
        return;
    };

    ws.send(Message::Text(r#"40{"sid":"fake-socket"}"#.to_string()))
        .await
        .unwrap();
    for frame in after_connect {
        ws.send(Message::Text(frame)).await.unwrap();
    }

    while let Some(frame) = next_text(&mut ws).await {
        frames.lock().unwrap().push(frame.clone());

        let Some(packet) = frame.strip_prefix('4') else {
            continue;
        };
        let Ok(SocketPacket::Event {
            id: Some(id),
            name,
            args,
        }) = SocketPacket::decode(packet)
        else {
            continue;
        };

        calls.lock().unwrap().push((name.clone(), args.clone()));
        let (pushes, reply) = match handler(&name, &args) {
            Reply::Ack(reply) => (Vec::new(), reply),
            Reply::PushThenAck(pushes, reply) => (pushes, reply),
            Reply::Close => {
                let _ = ws.close(None).await;
                return;
            }
        };

        for (event, payload) in pushes {
            ws.send(Message::Text(push(event, payload))).await.unwrap();
        }
        let ack = SocketPacket::Ack {
            id,
            args: vec![reply],
        };
        ws.send(Message::Text(format!("4{}", ack.encode())))
            .await
            .unwrap();
    }
}
