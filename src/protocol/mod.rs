//! # Session Layer
//!
//! The per-connection authentication state machine and the handle it passes
//! to the embedder's command callback.
//!
//! ## Components
//! - **Connection**: unauthenticated → authenticated → closed, one task each
//! - **Client**: per-command handle exposing the peer address, packet id, and
//!   an out-of-band write path back to the connection

pub mod client;
pub mod connection;
