//! # Packet
//!
//! The unit of wire exchange: a client-chosen correlation id, a type
//! discriminant, and a text body.
//!
//! ## Wire Format
//! ```text
//! [Length(4)] [Id(4)] [Type(4)] [Body(N)] [0x00] [0x00]
//! ```
//! All integers are little-endian. `Length` counts every byte after itself,
//! so a well-formed frame declares `4 + 4 + N + 2`.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{RconError, Result};

/// Client → server authentication request; the body carries the password.
pub const SERVERDATA_AUTH: i32 = 3;

/// Server → client reply to an auth request. Empty body; the id echoes the
/// request on success and is [`AUTH_FAILURE_ID`] on a wrong password.
pub const SERVERDATA_AUTH_RESPONSE: i32 = 2;

/// Client → server command request; the body carries the command text.
/// Numerically identical to [`SERVERDATA_AUTH_RESPONSE`]; the two are
/// distinguished by direction, a server never receives an auth response.
pub const SERVERDATA_EXECCOMMAND: i32 = 2;

/// Server → client command output.
pub const SERVERDATA_RESPONSE_VALUE: i32 = 0;

/// Sentinel id substituted into the auth response on a failed attempt.
pub const AUTH_FAILURE_ID: i32 = -1;

/// Smallest legal frame: id (4) + type (4) + two null terminators.
pub const MIN_FRAME_LEN: usize = 10;

/// Protocol convention for the largest body a client should send. Advisory
/// only; the codec enforces its own frame cap instead.
pub const MAX_BODY_SIZE: usize = 4096;

/// One RCON packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Client-chosen correlation token, echoed back on responses.
    pub id: i32,
    /// One of the `SERVERDATA_*` discriminants. Kept as a raw `i32` because
    /// the canonical values overlap and unknown values must survive decoding.
    pub packet_type: i32,
    /// Text payload. Terminated on the wire by a null byte, followed by the
    /// frame's second, empty-string terminator.
    pub body: String,
}

impl Packet {
    pub fn new(id: i32, packet_type: i32, body: impl Into<String>) -> Self {
        Self {
            id,
            packet_type,
            body: body.into(),
        }
    }

    /// An authentication request carrying `password`.
    pub fn auth(id: i32, password: impl Into<String>) -> Self {
        Self::new(id, SERVERDATA_AUTH, password)
    }

    /// An empty-bodied auth response for `id`.
    pub fn auth_response(id: i32) -> Self {
        Self::new(id, SERVERDATA_AUTH_RESPONSE, String::new())
    }

    /// A command request carrying `command`.
    pub fn exec(id: i32, command: impl Into<String>) -> Self {
        Self::new(id, SERVERDATA_EXECCOMMAND, command)
    }

    /// A command-output packet for `id`.
    pub fn response_value(id: i32, body: impl Into<String>) -> Self {
        Self::new(id, SERVERDATA_RESPONSE_VALUE, body)
    }

    /// Byte count of this packet's frame, excluding the length word itself.
    /// This is exactly the value written into the length field.
    pub fn frame_len(&self) -> usize {
        MIN_FRAME_LEN + self.body.len()
    }

    /// Append the full wire frame (length word included) to `dst`.
    ///
    /// Never fails for in-memory input; the fallible surface lives on the
    /// codec for symmetry with decoding.
    pub fn write_frame(&self, dst: &mut BytesMut) {
        let frame_len = self.frame_len();
        dst.reserve(4 + frame_len);
        dst.put_i32_le(frame_len as i32);
        dst.put_i32_le(self.id);
        dst.put_i32_le(self.packet_type);
        dst.put_slice(self.body.as_bytes());
        dst.put_u8(0);
        dst.put_u8(0);
    }

    /// Encode into a standalone byte vector. Convenience for one-shot writes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(4 + self.frame_len());
        self.write_frame(&mut buf);
        buf.to_vec()
    }

    /// Parse one frame whose length word has already been stripped, i.e.
    /// `frame` holds exactly the declared number of bytes.
    ///
    /// Fails on a short frame, a missing double-null terminator, or a body
    /// that is not valid UTF-8. The caller has already consumed the bytes,
    /// so a failure here never misaligns the stream.
    pub fn from_frame(frame: &[u8]) -> Result<Self> {
        if frame.len() < MIN_FRAME_LEN {
            return Err(RconError::InvalidLength(frame.len() as i32));
        }

        let mut header = frame;
        let id = header.get_i32_le();
        let packet_type = header.get_i32_le();

        let (body, terminator) = header.split_at(header.len() - 2);
        if terminator != [0, 0] {
            return Err(RconError::MissingTerminator);
        }

        let body = std::str::from_utf8(body)
            .map_err(|_| RconError::InvalidBody)?
            .to_owned();

        Ok(Self {
            id,
            packet_type,
            body,
        })
    }
}
