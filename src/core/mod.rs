//! # Core Protocol Components
//!
//! Low-level packet handling and framing for the RCON wire protocol.
//!
//! ## Components
//! - **Packet**: the id/type/body unit of exchange with its wire constants
//! - **Codec**: Tokio codec for length-prefixed framing over byte streams
//!
//! ## Wire Format
//! ```text
//! [Length(4)] [Id(4)] [Type(4)] [Body(N)] [0x00] [0x00]
//! ```
//! Integers are little-endian; `Length` counts everything after itself.

pub mod codec;
pub mod packet;
