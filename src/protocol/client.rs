//! Per-command client handle passed to the registered command callback.

use std::net::SocketAddr;

use tokio::sync::mpsc;

use crate::core::packet::Packet;
use crate::error::{RconError, Result};

/// Identifies the connection and packet that triggered a command.
///
/// The handle is cheap to clone and never owns the connection's lifecycle.
/// Packets queued through it are written by the connection's own task, after
/// any packet it is currently processing, so the socket stays single-owner.
#[derive(Debug, Clone)]
pub struct Client {
    peer: SocketAddr,
    packet_id: i32,
    outbound: mpsc::UnboundedSender<Packet>,
}

impl Client {
    pub(crate) fn new(
        peer: SocketAddr,
        packet_id: i32,
        outbound: mpsc::UnboundedSender<Packet>,
    ) -> Self {
        Self {
            peer,
            packet_id,
            outbound,
        }
    }

    /// Id of the exec-command packet that produced this handle.
    pub fn packet_id(&self) -> i32 {
        self.packet_id
    }

    /// Remote address of the originating connection.
    pub fn remote_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Queue a `SERVERDATA_RESPONSE_VALUE` packet echoing this command's id.
    ///
    /// The protocol guarantees nothing beyond the auth response; this is an
    /// out-of-band convenience for embedders that want to answer commands.
    pub fn respond(&self, body: impl Into<String>) -> Result<()> {
        self.send(Packet::response_value(self.packet_id, body))
    }

    /// Queue an arbitrary packet on the originating connection.
    pub fn send(&self, packet: Packet) -> Result<()> {
        self.outbound
            .send(packet)
            .map_err(|_| RconError::ConnectionClosed)
    }
}
