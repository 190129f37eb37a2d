//! # Connection State Machine
//!
//! Drives one accepted connection through
//! `UNAUTHENTICATED → AUTHENTICATED → CLOSED`.
//!
//! The task owns its stream exclusively for the connection's whole lifetime
//! and processes packets strictly in arrival order. Authentication is
//! monotonic: the flag is set once on a correct password and only ever
//! cleared by the connection terminating.

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, instrument};

use crate::core::codec::RconCodec;
use crate::core::packet::{Packet, AUTH_FAILURE_ID, SERVERDATA_AUTH, SERVERDATA_EXECCOMMAND};
use crate::protocol::client::Client;

/// Callback invoked for every authenticated exec-command packet. Shared by
/// all connections, so it must be safe to call concurrently.
pub type CommandHandler = dyn Fn(&str, Client) + Send + Sync + 'static;

/// One accepted stream plus its authentication flag. Generic over the stream
/// type; the server spawns it over `TcpStream`.
pub(crate) struct Connection<T> {
    framed: Framed<T, RconCodec>,
    peer: SocketAddr,
    password: Arc<str>,
    handler: Option<Arc<CommandHandler>>,
    authenticated: bool,
    outbound_tx: mpsc::UnboundedSender<Packet>,
    outbound_rx: mpsc::UnboundedReceiver<Packet>,
}

impl<T> Connection<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(
        stream: T,
        peer: SocketAddr,
        password: Arc<str>,
        handler: Option<Arc<CommandHandler>>,
        max_frame_size: usize,
    ) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        Self {
            framed: Framed::new(stream, RconCodec::new(max_frame_size)),
            peer,
            password,
            handler,
            authenticated: false,
            outbound_tx,
            outbound_rx,
        }
    }

    /// Run the connection to its natural termination. All failures are local
    /// to this task; nothing is reported upward.
    #[instrument(name = "connection", skip(self), fields(peer = %self.peer))]
    pub(crate) async fn run(mut self) {
        debug!("connection opened");
        loop {
            tokio::select! {
                inbound = self.framed.next() => match inbound {
                    // End-of-stream: the peer disconnected.
                    None => break,
                    // Transport-level failure; framing errors never reach
                    // here, the codec discards malformed frames itself.
                    Some(Err(e)) => {
                        debug!(error = %e, "transport error");
                        break;
                    }
                    Some(Ok(packet)) => {
                        if !self.handle_packet(packet).await {
                            break;
                        }
                    }
                },
                Some(packet) = self.outbound_rx.recv() => {
                    if let Err(e) = self.framed.send(packet).await {
                        debug!(error = %e, "failed to write queued packet");
                    }
                }
            }
        }
        debug!(authenticated = self.authenticated, "connection closed");
    }

    /// Apply one packet to the state machine. Returns `false` when the
    /// connection must close.
    async fn handle_packet(&mut self, packet: Packet) -> bool {
        if self.authenticated && packet.packet_type == SERVERDATA_EXECCOMMAND {
            if let Some(handler) = &self.handler {
                let client = Client::new(self.peer, packet.id, self.outbound_tx.clone());
                handler(&packet.body, client);
            }
            return true;
        }

        // Anything else must be an auth request, whether this is the first
        // packet of the session or a re-authentication.
        if packet.packet_type != SERVERDATA_AUTH {
            debug!(packet_type = packet.packet_type, "unexpected packet type");
            return false;
        }

        // An unset password must never authenticate; refuse without a
        // response.
        if self.password.is_empty() {
            debug!("auth refused: no password configured");
            return false;
        }

        let correct = packet.body.as_bytes() == self.password.as_bytes();
        let response_id = if correct { packet.id } else { AUTH_FAILURE_ID };

        // Best effort: a failed write never prevents the close below.
        if let Err(e) = self.framed.send(Packet::auth_response(response_id)).await {
            debug!(error = %e, "failed to write auth response");
        }

        if correct {
            self.authenticated = true;
            debug!("client authenticated");
        } else {
            debug!("auth failed: wrong password");
        }
        correct
    }
}
