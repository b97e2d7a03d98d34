// Netcfg - Service Directory
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! ConnMan service lookup.
//!
//! Resolution maps a physical interface name to the service currently
//! bound to it. Service lifetimes are daemon-controlled, so the mapping
//! is looked up fresh on every call and never cached: two sequential
//! calls may legitimately observe different backends for one interface.

use std::fmt::Write as _;

use crate::connman::{ConnmanBus, PropValue};
use crate::models::{NetConfig, Result};

/// Outcome of resolving an interface to a service. `Absent` is a
/// legitimate branch, not an error: the interface may simply have no
/// live service (cable unplugged, not yet enumerated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Short identifier of the service bound to the interface.
    Live(String),
    /// No service is bound to the interface right now.
    Absent,
}

/// Short identifiers of all known services, path prefix stripped.
pub fn list_services<B: ConnmanBus>(cfg: &NetConfig, bus: &B) -> Result<Vec<String>> {
    Ok(bus
        .services()?
        .into_iter()
        .map(|(path, _)| cfg.strip_service_path(&path).to_string())
        .collect())
}

/// First service whose `Ethernet.Interface` property equals `interface`.
pub fn resolve<B: ConnmanBus>(cfg: &NetConfig, bus: &B, interface: &str) -> Result<Resolution> {
    for (path, props) in bus.services()? {
        let bound = props.get("Ethernet").and_then(|e| e.str_of("Interface"));
        if bound == Some(interface) {
            return Ok(Resolution::Live(cfg.strip_service_path(&path).to_string()));
        }
    }
    Ok(Resolution::Absent)
}

/// One property of a service, by short identifier.
pub fn service_property<B: ConnmanBus>(
    cfg: &NetConfig,
    bus: &B,
    service: &str,
    name: &str,
) -> Result<Option<PropValue>> {
    let mut props = bus.service_properties(&cfg.service_path(service))?;
    Ok(props.remove(name))
}

/// Whether a service's connectivity state is online or ready.
pub fn is_connected<B: ConnmanBus>(cfg: &NetConfig, bus: &B, service: &str) -> Result<bool> {
    let state = service_property(cfg, bus, service, "State")?;
    Ok(matches!(
        state.as_ref().and_then(PropValue::as_str),
        Some("online") | Some("ready")
    ))
}

/// ConnMan manager connectivity state ("offline", "idle", "ready", ...).
pub fn manager_state<B: ConnmanBus>(bus: &B) -> Result<String> {
    let props = bus.manager_properties()?;
    Ok(props
        .get("State")
        .and_then(PropValue::as_str)
        .unwrap_or_default()
        .to_string())
}

/// Human-readable multi-line summary of all technologies. Informational
/// only.
pub fn technologies<B: ConnmanBus>(bus: &B) -> Result<String> {
    let mut out = String::new();
    for (path, props) in bus.technologies()? {
        let name = props.get("Name").and_then(PropValue::as_str).unwrap_or("");
        let ty = props.get("Type").and_then(PropValue::as_str).unwrap_or("");
        let powered = props
            .get("Powered")
            .and_then(PropValue::as_bool)
            .unwrap_or(false);
        let connected = props
            .get("Connected")
            .and_then(PropValue::as_bool)
            .unwrap_or(false);
        let _ = writeln!(
            out,
            "{path}\n\tName = {name}\n\tType = {ty}\n\tPowered = {powered}\n\tConnected = {connected}"
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{eth_service, FakeBus};

    #[test]
    fn test_list_services_strips_prefix() {
        let cfg = NetConfig::default();
        let bus = FakeBus::new(vec![
            eth_service("ethernet_cable_1", "eth0", "online", "dhcp"),
            eth_service("ethernet_cable_2", "eth1", "idle", "dhcp"),
        ]);
        let services = list_services(&cfg, &bus).unwrap();
        assert_eq!(services, vec!["ethernet_cable_1", "ethernet_cable_2"]);
    }

    #[test]
    fn test_resolve_live() {
        let cfg = NetConfig::default();
        let bus = FakeBus::new(vec![
            eth_service("ethernet_cable_1", "eth0", "online", "dhcp"),
            eth_service("ethernet_cable_2", "eth1", "idle", "dhcp"),
        ]);
        assert_eq!(
            resolve(&cfg, &bus, "eth1").unwrap(),
            Resolution::Live("ethernet_cable_2".to_string())
        );
    }

    #[test]
    fn test_resolve_absent_is_not_an_error() {
        let cfg = NetConfig::default();
        let bus = FakeBus::new(vec![eth_service("ethernet_cable_1", "eth0", "online", "dhcp")]);
        assert_eq!(resolve(&cfg, &bus, "eth5").unwrap(), Resolution::Absent);
    }

    #[test]
    fn test_is_connected_states() {
        let cfg = NetConfig::default();
        let bus = FakeBus::new(vec![
            eth_service("ethernet_cable_1", "eth0", "online", "dhcp"),
            eth_service("ethernet_cable_2", "eth1", "ready", "dhcp"),
            eth_service("ethernet_cable_3", "eth2", "idle", "dhcp"),
        ]);
        assert!(is_connected(&cfg, &bus, "ethernet_cable_1").unwrap());
        assert!(is_connected(&cfg, &bus, "ethernet_cable_2").unwrap());
        assert!(!is_connected(&cfg, &bus, "ethernet_cable_3").unwrap());
    }

    #[test]
    fn test_technologies_summary() {
        let bus = FakeBus::new(vec![]).with_technology("ethernet", "Wired", true, false);
        let summary = technologies(&bus).unwrap();
        assert!(summary.contains("Name = Wired"));
        assert!(summary.contains("Powered = true"));
        assert!(summary.contains("Connected = false"));
    }
}
