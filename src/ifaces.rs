// Netcfg - Interface Enumeration
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Host network interface enumeration.
//!
//! Reads the Linux sysfs tree (`/sys/class/net`) to list interfaces with
//! their hardware address and kernel flags. Enumeration order follows the
//! directory listing and is not guaranteed stable across calls.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::models::{InterfaceRef, Result};

/// Abstract interface-enumeration capability.
pub trait InterfaceProbe {
    /// All host interfaces, loopback included.
    fn interfaces(&self) -> Result<Vec<InterfaceRef>>;

    /// Whether an interface with this name exists on the host.
    fn exists(&self, name: &str) -> bool {
        self.interfaces()
            .map(|list| list.iter().any(|iface| iface.name == name))
            .unwrap_or(false)
    }
}

/// sysfs-backed probe.
#[derive(Debug, Clone)]
pub struct SysfsProbe {
    root: PathBuf,
}

impl Default for SysfsProbe {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/sys/class/net"),
        }
    }
}

impl SysfsProbe {
    /// Probe rooted at an alternate directory (tests).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl InterfaceProbe for SysfsProbe {
    fn interfaces(&self) -> Result<Vec<InterfaceRef>> {
        let mut interfaces = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();

            let hwaddr = match fs::read_to_string(path.join("address")) {
                // some drivers report a trailing separator; strip it
                Ok(raw) => raw.trim().trim_end_matches(':').to_string(),
                Err(e) => {
                    warn!("No hardware address for {name}: {e}");
                    String::new()
                }
            };

            let flags = fs::read_to_string(path.join("flags"))
                .ok()
                .and_then(|raw| parse_flags(&raw))
                .unwrap_or(0);

            interfaces.push(InterfaceRef::new(name, hwaddr, flags));
        }
        Ok(interfaces)
    }

    fn exists(&self, name: &str) -> bool {
        // flat namespace, no path separators expected in interface names
        !name.contains('/') && self.root.join(name).exists()
    }
}

/// Parse the sysfs flags file content, a hex value like `0x1043`.
fn parse_flags(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    u32::from_str_radix(hex, 16).ok()
}
