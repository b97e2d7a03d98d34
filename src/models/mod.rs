// Netcfg - Shared Models
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Shared types and constants used across the crate:
//!
//! - **InterfaceInfo**: the canonical per-interface read model
//! - **NetConfig**: immutable runtime configuration
//! - **Validation**: IPv4 and nameserver input checks
//! - **Error**: shared error types

pub mod config;
pub mod error;
pub mod interface;
pub mod validation;

pub use config::NetConfig;
pub use error::{Error, Result};
pub use interface::{
    InterfaceInfo, InterfaceRef, Ipv4Config, Ipv6Config, RequestMode, StaticRecord,
};

/// Crate version.
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// D-Bus object path prefix under which ConnMan publishes its services.
pub const SERVICE_PATH: &str = "/net/connman/service/";

/// Fallback configuration file for interfaces without a live service.
pub const INTERFACES_CONFIG: &str = "/var/lib/connman/interfaces.config";

/// Host service unit controlling the ConnMan daemon.
pub const CONNMAN_UNIT: &str = "connman";

/// Strings accepted as "true" in caller-provided settings maps.
pub const CONFIG_TRUE: [&str; 4] = ["yes", "on", "true", "1"];

/// Delay between stopping and restarting the daemon unit.
pub const RESTART_SETTLE: std::time::Duration = std::time::Duration::from_secs(2);

/// Kernel interface flag: loopback device.
pub const IFF_LOOPBACK: u32 = 0x8;

/// Kernel interface flag: driver signals operational state.
pub const IFF_RUNNING: u32 = 0x40;
