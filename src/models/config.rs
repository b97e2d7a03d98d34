// Netcfg - Runtime Configuration
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Immutable runtime configuration shared by all components.
//!
//! The defaults mirror a stock ConnMan installation; tests and unusual
//! deployments override the fallback-file path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{CONFIG_TRUE, CONNMAN_UNIT, INTERFACES_CONFIG, RESTART_SETTLE, SERVICE_PATH};

/// Process-wide configuration constants, passed into each component at
/// construction rather than read as ambient state.
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// D-Bus object path prefix for ConnMan services.
    pub service_prefix: String,
    /// Fallback configuration file for interfaces without a live service.
    pub interfaces_config: PathBuf,
    /// Host service unit controlling the ConnMan daemon.
    pub connman_unit: String,
    /// Strings accepted as "true" in caller-provided settings maps.
    pub truthy: Vec<String>,
    /// Delay between stopping and restarting the daemon unit.
    pub settle_delay: Duration,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            service_prefix: SERVICE_PATH.to_string(),
            interfaces_config: PathBuf::from(INTERFACES_CONFIG),
            connman_unit: CONNMAN_UNIT.to_string(),
            truthy: CONFIG_TRUE.iter().map(|s| s.to_string()).collect(),
            settle_delay: RESTART_SETTLE,
        }
    }
}

impl NetConfig {
    /// Default configuration with an alternate fallback-file path.
    pub fn with_interfaces_config(path: impl Into<PathBuf>) -> Self {
        Self {
            interfaces_config: path.into(),
            ..Self::default()
        }
    }

    /// Full D-Bus object path for a short service identifier.
    pub fn service_path(&self, service: &str) -> String {
        format!("{}{}", self.service_prefix, service)
    }

    /// Short service identifier for a full D-Bus object path.
    pub fn strip_service_path<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.service_prefix.as_str()).unwrap_or(path)
    }

    /// Whether a settings value counts as true.
    pub fn is_truthy(&self, value: &str) -> bool {
        let value = value.trim();
        self.truthy.iter().any(|t| t.eq_ignore_ascii_case(value))
    }

    /// Parent directory of the fallback file (used for atomic rewrites).
    pub fn interfaces_config_dir(&self) -> &Path {
        match self.interfaces_config.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_path_round_trip() {
        let cfg = NetConfig::default();
        let path = cfg.service_path("ethernet_00804f1234_cable");
        assert_eq!(path, "/net/connman/service/ethernet_00804f1234_cable");
        assert_eq!(cfg.strip_service_path(&path), "ethernet_00804f1234_cable");
        // unknown prefixes pass through untouched
        assert_eq!(cfg.strip_service_path("wifi_abc"), "wifi_abc");
    }

    #[test]
    fn test_default_settle_delay() {
        assert_eq!(NetConfig::default().settle_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_truthy_values() {
        let cfg = NetConfig::default();
        for v in ["yes", "on", "true", "1", "YES", " True "] {
            assert!(cfg.is_truthy(v), "{v} should be truthy");
        }
        for v in ["no", "off", "false", "0", ""] {
            assert!(!cfg.is_truthy(v), "{v} should not be truthy");
        }
    }
}
