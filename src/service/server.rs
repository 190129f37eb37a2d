//! # RCON Server
//!
//! The embeddable listener: binds a TCP endpoint, gates accepts through the
//! ban list, and spawns one connection task per accepted stream.
//!
//! ## Usage
//! ```no_run
//! use rcon_server::{RconServer, DEFAULT_PORT};
//!
//! #[tokio::main]
//! async fn main() -> rcon_server::Result<()> {
//!     let mut server = RconServer::new("0.0.0.0", DEFAULT_PORT, "secret");
//!     server.set_ban_list(vec!["10.0.0.5".to_string()]);
//!     server.on_command(|command, client| {
//!         println!("{} ran: {command}", client.remote_addr());
//!     });
//!
//!     // Signal wiring stays with the embedder; the core registers no
//!     // OS-level handlers.
//!     let shutdown = server.shutdown_handle();
//!     tokio::spawn(async move {
//!         if tokio::signal::ctrl_c().await.is_ok() {
//!             shutdown.shutdown();
//!         }
//!     });
//!
//!     server.listen_and_serve().await
//! }
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{debug, info, instrument, warn};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::protocol::client::Client;
use crate::protocol::connection::{CommandHandler, Connection};

/// An embeddable RCON server.
///
/// Configure it (password, ban list, command handler) before calling
/// [`listen_and_serve`](Self::listen_and_serve); the shared state is
/// read-only while serving.
pub struct RconServer {
    host: String,
    port: u16,
    password: Arc<str>,
    ban_list: Vec<String>,
    handler: Option<Arc<CommandHandler>>,
    max_frame_size: usize,
    shutdown: Arc<Notify>,
}

impl RconServer {
    pub fn new(host: impl Into<String>, port: u16, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            password: Arc::from(password.into()),
            ban_list: Vec::new(),
            handler: None,
            max_frame_size: crate::core::codec::DEFAULT_MAX_FRAME_SIZE,
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn from_config(config: ServerConfig) -> Self {
        let mut server = Self::new(config.host, config.port, config.password);
        server.ban_list = config.ban_list;
        server.max_frame_size = config.max_frame_size;
        server
    }

    /// Replace the ban list wholesale. Entries are host strings (no port),
    /// matched exactly against the peer address at accept time.
    pub fn set_ban_list(&mut self, ban_list: Vec<String>) {
        self.ban_list = ban_list;
    }

    /// Register the callback invoked for every authenticated exec-command
    /// packet, across all connections. Last registration wins. With no
    /// handler registered, exec-command packets are silently ignored.
    ///
    /// The handler runs synchronously inside the originating connection's
    /// task and may be called concurrently from different connections.
    pub fn on_command<F>(&mut self, handler: F)
    where
        F: Fn(&str, Client) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
    }

    /// Handle for requesting an orderly shutdown of the accept loop.
    /// Triggering it before serving starts is remembered.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            notify: Arc::clone(&self.shutdown),
        }
    }

    /// Bind `host:port` and serve until shutdown.
    ///
    /// Returns immediately with the underlying error on bind failure;
    /// otherwise blocks and returns `Ok(())` once the listener closes.
    /// Connections accepted before shutdown drain independently.
    pub async fn listen_and_serve(&self) -> Result<()> {
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener. Useful when the embedder binds
    /// itself, e.g. to port 0 in tests.
    #[instrument(name = "rcon_server", skip_all)]
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;
        info!(address = %local_addr, "rcon server listening");

        loop {
            tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("shutdown requested, no longer accepting connections");
                    return Ok(());
                }

                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        if self.is_banned(&peer) {
                            debug!(peer = %peer, "rejecting banned address");
                            drop(stream);
                            continue;
                        }

                        debug!(peer = %peer, "accepted connection");
                        let connection = Connection::new(
                            stream,
                            peer,
                            Arc::clone(&self.password),
                            self.handler.clone(),
                            self.max_frame_size,
                        );
                        tokio::spawn(connection.run());
                    }
                    // Closure of the listener is the orderly exit signal,
                    // not a failure to report.
                    Err(e) => {
                        warn!(error = %e, "accept failed, stopping");
                        return Ok(());
                    }
                }
            }
        }
    }

    fn is_banned(&self, peer: &SocketAddr) -> bool {
        let host = peer.ip().to_string();
        self.ban_list.iter().any(|banned| *banned == host)
    }
}

/// Cloneable trigger that stops the server's accept loop.
///
/// Already-accepted connections are not closed; each runs to its own natural
/// termination.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.notify.notify_one();
    }
}
