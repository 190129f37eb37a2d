//! # Codec
//!
//! Tokio codec for RCON framing over a byte stream.
//!
//! Decoding consumes exactly `length + 4` bytes per well-formed frame so
//! back-to-back frames stay aligned. Malformed frames are recoverable: they
//! are discarded with a warning and decoding continues with the next frame.
//! `tokio_util`'s `Framed` treats a decoder error as unrecoverable and ends
//! the stream, so the discard-and-continue contract is implemented inside
//! [`RconCodec::decode`] rather than surfaced to the read loop.
//!
//! ## Security
//! - Frames larger than the configured cap are discarded before allocation,
//!   preventing memory exhaustion from a hostile length word.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, warn};

use crate::core::packet::{Packet, MIN_FRAME_LEN};
use crate::error::RconError;

/// Default cap on a frame's declared length. Generous next to the 4096-byte
/// body convention, tight enough to bound per-connection buffering.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

/// Length-prefixed RCON frame codec.
#[derive(Debug, Clone)]
pub struct RconCodec {
    max_frame_size: usize,
}

impl RconCodec {
    pub fn new(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }
}

impl Default for RconCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_SIZE)
    }
}

impl Decoder for RconCodec {
    type Item = Packet;
    type Error = RconError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>, RconError> {
        loop {
            if src.len() < 4 {
                return Ok(None);
            }

            let declared = i32::from_le_bytes([src[0], src[1], src[2], src[3]]);
            if declared < MIN_FRAME_LEN as i32 || declared as usize > self.max_frame_size {
                // Skip the length word and rescan; the peer has already broken
                // framing, this keeps the connection alive on a lucky resync.
                warn!(length = declared, "discarding frame with invalid length");
                src.advance(4);
                continue;
            }

            let frame_len = declared as usize;
            if src.len() < 4 + frame_len {
                src.reserve(4 + frame_len - src.len());
                return Ok(None);
            }

            src.advance(4);
            let frame = src.split_to(frame_len);
            match Packet::from_frame(&frame) {
                Ok(packet) => return Ok(Some(packet)),
                Err(e) => {
                    warn!(error = %e, "discarding malformed frame");
                    continue;
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Packet>, RconError> {
        match self.decode(buf)? {
            Some(packet) => Ok(Some(packet)),
            None => {
                // A partial frame cut off by stream closure is end-of-stream,
                // not an error.
                if !buf.is_empty() {
                    debug!(remaining = buf.len(), "discarding partial frame at end of stream");
                    buf.clear();
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<Packet> for RconCodec {
    type Error = RconError;

    fn encode(&mut self, packet: Packet, dst: &mut BytesMut) -> Result<(), RconError> {
        packet.write_frame(dst);
        Ok(())
    }
}
