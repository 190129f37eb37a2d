//! # rcon-server
//!
//! Embeddable Source-style RCON server core.
//!
//! A host application supplies the bind address, the shared-secret password,
//! an optional ban list, and a command callback; the crate handles the wire
//! framing, the per-connection authentication state machine, and the accept
//! loop. One lightweight task per connection, no shared per-connection state.
//!
//! ## Layers
//! - [`core`]: packet type and length-prefixed framing codec
//! - [`protocol`]: per-connection state machine and the [`Client`] handle
//! - [`service`]: the [`RconServer`] listener and its [`ShutdownHandle`]
//!
//! ## Quick Start
//! ```no_run
//! use rcon_server::RconServer;
//!
//! #[tokio::main]
//! async fn main() -> rcon_server::Result<()> {
//!     let mut server = RconServer::new("127.0.0.1", 27015, "secret");
//!     server.on_command(|command, client| {
//!         let _ = client.respond(format!("ran {command}"));
//!     });
//!     server.listen_and_serve().await
//! }
//! ```
//!
//! ## Guarantees
//! - No command reaches the callback before a successful authentication on
//!   the same connection.
//! - An empty configured password never authenticates.
//! - A malformed frame is discarded; the session stays alive.
//! - Banned addresses are closed before any protocol byte is exchanged.

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod service;

pub use crate::config::{ServerConfig, DEFAULT_PORT};
pub use crate::core::codec::RconCodec;
pub use crate::core::packet::Packet;
pub use crate::error::{RconError, Result};
pub use crate::protocol::client::Client;
pub use crate::service::{RconServer, ShutdownHandle};
