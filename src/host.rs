// Netcfg - Host Service Control
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Host service lifecycle and hostname control.
//!
//! Only the global network-settings operations use this capability; the
//! per-interface reconciliation never touches it.

use std::fs;
use std::process::Command;

use tracing::{debug, warn};

use crate::models::Result;

/// Abstract host control capability: named service units and hostname.
pub trait HostControl {
    fn enable_service(&self, unit: &str) -> Result<bool>;
    fn disable_service(&self, unit: &str) -> Result<bool>;
    fn start_service(&self, unit: &str) -> Result<bool>;
    fn stop_service(&self, unit: &str) -> Result<bool>;
    fn hostname(&self) -> Result<String>;
    fn set_hostname(&self, name: &str) -> Result<bool>;
}

/// systemd-backed implementation.
#[derive(Debug, Clone, Default)]
pub struct Systemctl;

impl Systemctl {
    fn run(&self, verb: &str, unit: &str) -> Result<bool> {
        debug!("systemctl {verb} {unit}");
        let status = Command::new("systemctl").arg(verb).arg(unit).status()?;
        Ok(status.success())
    }
}

impl HostControl for Systemctl {
    fn enable_service(&self, unit: &str) -> Result<bool> {
        self.run("enable", unit)
    }

    fn disable_service(&self, unit: &str) -> Result<bool> {
        self.run("disable", unit)
    }

    fn start_service(&self, unit: &str) -> Result<bool> {
        self.run("start", unit)
    }

    fn stop_service(&self, unit: &str) -> Result<bool> {
        self.run("stop", unit)
    }

    fn hostname(&self) -> Result<String> {
        let raw = fs::read_to_string("/proc/sys/kernel/hostname")?;
        Ok(raw.trim().to_string())
    }

    fn set_hostname(&self, name: &str) -> Result<bool> {
        debug!("Setting hostname to {name}");
        let status = Command::new("hostname").arg(name).status()?;
        if !status.success() {
            return Ok(false);
        }
        // persist across reboots; the live name is already set
        if let Err(e) = fs::write("/etc/hostname", format!("{name}\n")) {
            warn!("Failed to persist hostname to /etc/hostname: {e}");
        }
        Ok(true)
    }
}
