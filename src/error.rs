//! # Error Types
//!
//! Error handling for the RCON server core.
//!
//! This module defines all error variants that can occur during protocol
//! operations, from low-level I/O errors to malformed wire frames.
//!
//! ## Error Categories
//! - **I/O Errors**: socket and listener failures
//! - **Frame Errors**: invalid declared lengths, missing terminators,
//!   non-UTF-8 bodies
//! - **Connection Errors**: writes against a connection that has terminated
//! - **Configuration Errors**: unreadable or unparseable config input
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use thiserror::Error;

/// Primary error type for all RCON server operations.
#[derive(Error, Debug)]
pub enum RconError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The declared frame length is below the 10-byte minimum or above the
    /// configured cap. The offending length word is skipped so the stream
    /// can resynchronize.
    #[error("invalid frame length: {0}")]
    InvalidLength(i32),

    /// A frame did not end with the two required null bytes.
    #[error("frame missing null terminators")]
    MissingTerminator,

    /// A frame body was not valid UTF-8.
    #[error("frame body is not valid UTF-8")]
    InvalidBody,

    /// A write was requested on a connection whose task has terminated.
    #[error("connection closed")]
    ConnectionClosed,

    #[error("configuration error: {0}")]
    Config(String),
}

/// Type alias for Results using RconError
pub type Result<T> = std::result::Result<T, RconError>;
