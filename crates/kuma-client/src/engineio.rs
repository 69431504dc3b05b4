//! Engine.IO v4 packets
//!
//! Over a WebSocket every text frame is one packet: a single type digit
//! followed by the payload.
//!
//! ```text
//! 0{"sid":"…","pingInterval":25000,"pingTimeout":20000,…}   open
//! 2                                                        ping
//! 3                                                        pong
//! 4<socket.io packet>                                      message
//! ```

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Malformed Engine.IO or Socket.IO frames
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("empty frame")]
    Empty,

    #[error("unknown {layer} packet type {kind:?}")]
    UnknownType { layer: &'static str, kind: char },

    #[error("binary packets are not supported")]
    Binary,

    #[error("invalid acknowledgement id in {0:?}")]
    AckId(String),

    #[error("event packet without a name")]
    MissingEventName,

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CodecError> for kuma_core::Error {
    fn from(err: CodecError) -> Self {
        kuma_core::Error::protocol(err.to_string())
    }
}

/// Handshake data sent by the server in the OPEN packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    /// Milliseconds between server pings
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

impl Handshake {
    /// How long the connection may stay silent before it is considered dead
    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_interval + self.ping_timeout)
    }
}

/// One Engine.IO packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(frame: &str) -> Result<Self, CodecError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(CodecError::Empty)?;
        let payload = chars.as_str();

        Ok(match kind {
            '0' => Self::Open(serde_json::from_str(payload)?),
            '1' => Self::Close,
            '2' => Self::Ping(payload.to_string()),
            '3' => Self::Pong(payload.to_string()),
            '4' => Self::Message(payload.to_string()),
            '5' => Self::Upgrade,
            '6' => Self::Noop,
            'b' => return Err(CodecError::Binary),
            other => {
                return Err(CodecError::UnknownType {
                    layer: "engine.io",
                    kind: other,
                });
            }
        })
    }

    /// Encode a client-sent packet
    ///
    /// `Open` is server-only and encodes as its type digit.
    pub fn encode(&self) -> String {
        match self {
            Self::Open(_) => "0".to_string(),
            Self::Close => "1".to_string(),
            Self::Ping(data) => format!("2{data}"),
            Self::Pong(data) => format!("3{data}"),
            Self::Message(data) => format!("4{data}"),
            Self::Upgrade => "5".to_string(),
            Self::Noop => "6".to_string(),
        }
    }
}
