//! # Service Layer
//!
//! The embeddable server surface: construction, ban-list gating, command
//! dispatch, and lifecycle control.

pub mod server;

pub use server::{RconServer, ShutdownHandle};
