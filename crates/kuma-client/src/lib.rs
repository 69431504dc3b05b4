// # kuma-client
//
// Uptime Kuma client for the provider.
//
// Uptime Kuma has no REST API for configuration; the web UI talks to the
// server over Socket.IO. This crate speaks that protocol directly:
//
// - **engineio / socketio**: packet codecs (Engine.IO v4, Socket.IO v5)
// - **connection**: WebSocket session with acknowledgement correlation,
//   ping handling and a cache of pushed lists
// - **client**: `KumaApi` implementation mapping each operation onto
//   Kuma's socket events
//
// ## Security Requirements
//
// - The password is sent once in the `login` event and never logged
// - Call arguments are never logged

pub mod client;
pub mod connection;
pub mod engineio;
pub mod socketio;

pub use client::{KumaClient, KumaClientFactory};
pub use connection::Connection;
pub use engineio::CodecError;
