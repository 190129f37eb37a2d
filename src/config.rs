//! # Configuration Management
//!
//! Structured configuration for the RCON server.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()` / `from_toml()`
//! - Direct instantiation with defaults
//!
//! Explicit construction through [`RconServer::new`](crate::RconServer::new)
//! stays primary; this module is a convenience for embedders that already
//! carry a config file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::codec::DEFAULT_MAX_FRAME_SIZE;
use crate::core::packet::MIN_FRAME_LEN;
use crate::error::{RconError, Result};

/// Conventional Source RCON port.
pub const DEFAULT_PORT: u16 = 27015;

/// RCON server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared-secret password. An empty password refuses every auth attempt.
    #[serde(default)]
    pub password: String,

    /// Host strings (no port) rejected at accept time.
    #[serde(default)]
    pub ban_list: Vec<String>,

    /// Cap on a frame's declared length, in bytes.
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_frame_size() -> usize {
    DEFAULT_MAX_FRAME_SIZE
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            password: String::new(),
            ban_list: Vec::new(),
            max_frame_size: default_max_frame_size(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RconError::Config(format!("failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| RconError::Config(format!("failed to parse TOML: {e}")))
    }

    /// Validate the configuration for common misconfigurations.
    ///
    /// Returns a list of findings; an empty list means no issues.
    pub fn validate(&self) -> Vec<String> {
        let mut findings = Vec::new();

        if self.password.is_empty() {
            findings.push("password is empty: every auth attempt will be refused".to_string());
        }

        if self.max_frame_size < MIN_FRAME_LEN {
            findings.push(format!(
                "max_frame_size {} is below the {}-byte frame minimum",
                self.max_frame_size, MIN_FRAME_LEN
            ));
        }

        for entry in &self.ban_list {
            // Entries are matched against the host alone; ports never match.
            // IPv6 hosts legitimately contain colons, so only flag the
            // host:port shape.
            if entry.rfind(':') == entry.find(':') && entry.contains(':') {
                findings.push(format!(
                    "ban list entry {entry:?} looks like host:port; only the host is matched"
                ));
            }
        }

        findings
    }
}
