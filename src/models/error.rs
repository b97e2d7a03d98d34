// Netcfg - Error Types
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Shared error types for netcfg operations.

use thiserror::Error;

/// Result type alias for netcfg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for netcfg operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed caller input (IPv4 triple, nameserver list). Reported
    /// before any mutation is attempted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The named interface matches neither a ConnMan service nor a host
    /// interface.
    #[error("Invalid interface name: {0}")]
    UnresolvedInterface(String),

    /// A ConnMan D-Bus call failed. Carries the underlying cause; the
    /// caller sees it as a terminal failure, no retry is attempted.
    #[error("Connman daemon error: {0}")]
    Daemon(String),

    /// Unsupported interface type or protocol.
    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid-input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a daemon error.
    pub fn daemon(msg: impl Into<String>) -> Self {
        Self::Daemon(msg.into())
    }
}

// Convert from zbus errors
impl From<zbus::Error> for Error {
    fn from(err: zbus::Error) -> Self {
        Error::Daemon(err.to_string())
    }
}
