//! Socket.IO v5 packets on the default namespace
//!
//! ```text
//! <type>[<namespace>,][<ack id>][<json>]
//!
//! 40                          connect
//! 40{"sid":"…"}               connect accepted
//! 44{"message":"…"}           connect refused
//! 4212["getTags"]             event expecting ack 12
//! 4312[{"ok":true,…}]         ack 12
//! 42["monitorList",{…}]       pushed event
//! ```
//!
//! The leading `4` is the Engine.IO message type and is not part of the
//! Socket.IO packet.

use crate::engineio::CodecError;
use serde_json::Value;

/// One Socket.IO packet
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect(Option<Value>),
    Disconnect,
    Event {
        id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        id: u64,
        args: Vec<Value>,
    },
    ConnectError(Value),
}

impl SocketPacket {
    /// An event expecting acknowledgement `id`
    pub fn call(id: u64, name: &str, args: Vec<Value>) -> Self {
        Self::Event {
            id: Some(id),
            name: name.to_string(),
            args,
        }
    }

    pub fn decode(packet: &str) -> Result<Self, CodecError> {
        let mut chars = packet.chars();
        let kind = chars.next().ok_or(CodecError::Empty)?;
        let mut rest = chars.as_str();

        if matches!(kind, '5' | '6') {
            return Err(CodecError::Binary);
        }

        // Namespace, only present when not "/"
        if rest.starts_with('/') {
            rest = rest.split_once(',').map(|(_, tail)| tail).unwrap_or("");
        }

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (id, body) = rest.split_at(digits);
        let id = if id.is_empty() {
            None
        } else {
            Some(id.parse::<u64>().map_err(|_| CodecError::AckId(id.to_string()))?)
        };

        match kind {
            '0' => {
                let data = if body.is_empty() {
                    None
                } else {
                    Some(serde_json::from_str(body)?)
                };
                Ok(Self::Connect(data))
            }
            '1' => Ok(Self::Disconnect),
            '2' => {
                let mut args: Vec<Value> = serde_json::from_str(body)?;
                if args.is_empty() {
                    return Err(CodecError::MissingEventName);
                }
                let name = match args.remove(0) {
                    Value::String(name) => name,
                    _ => return Err(CodecError::MissingEventName),
                };
                Ok(Self::Event { id, name, args })
            }
            '3' => {
                let id = id.ok_or_else(|| CodecError::AckId(rest.to_string()))?;
                let args: Vec<Value> = serde_json::from_str(body)?;
                Ok(Self::Ack { id, args })
            }
            '4' => Ok(Self::ConnectError(if body.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(body)?
            })),
            other => Err(CodecError::UnknownType {
                layer: "socket.io",
                kind: other,
            }),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Connect(None) => "0".to_string(),
            Self::Connect(Some(data)) => format!("0{data}"),
            Self::Disconnect => "1".to_string(),
            Self::Event { id, name, args } => {
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                let body = Value::Array(items);
                match id {
                    Some(id) => format!("2{id}{body}"),
                    None => format!("2{body}"),
                }
            }
            Self::Ack { id, args } => format!("3{id}{}", Value::Array(args.clone())),
            Self::ConnectError(data) => format!("4{data}"),
        }
    }
}

/// Human-readable reason carried by a CONNECT_ERROR payload
pub fn connect_error_message(data: &Value) -> String {
    data.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| data.to_string())
}
