// Netcfg - Reconciler
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Apply layer: decides per call whether an interface is backed by a
//! live ConnMan service or by the Static Store, and lands the mutation
//! on whichever backend is authoritative right now.
//!
//! There is no persisted mode flag: resolution is re-performed on every
//! operation, immediately before acting. If the daemon's state changes
//! between two calls they may land on different backends; that race is
//! accepted, the daemon owns authoritative state.
//!
//! Failure policy: inputs are validated before any mutation; daemon
//! failures surface to the caller with no retry; a multi-property set
//! that fails partway leaves the applied portion in place (matching the
//! daemon's own property-level atomicity) and reports the failure for
//! the remainder.

use std::collections::HashMap;
use std::thread;

use serde::Serialize;
use tracing::{info, warn};

use crate::connman::{ConnmanBus, PropMap, PropValue};
use crate::host::HostControl;
use crate::ifaces::InterfaceProbe;
use crate::models::{validation, Error, InterfaceInfo, InterfaceRef, NetConfig, Result};
use crate::normalize;
use crate::services::{self, Resolution};
use crate::store::StaticStore;

/// Global network settings read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSettings {
    /// False iff the ConnMan manager reports the "offline" state.
    pub networking: bool,
    pub hostname: String,
}

/// Key/value settings map for the build/apply operations.
pub type Settings = HashMap<String, String>;

/// The apply layer. Owns its collaborators; stateless between calls.
pub struct Reconciler<B, P, H> {
    cfg: NetConfig,
    bus: B,
    probe: P,
    host: H,
}

impl<B: ConnmanBus, P: InterfaceProbe, H: HostControl> Reconciler<B, P, H> {
    pub fn new(cfg: NetConfig, bus: B, probe: P, host: H) -> Self {
        Self {
            cfg,
            bus,
            probe,
            host,
        }
    }

    fn store(&self) -> StaticStore {
        StaticStore::new(&self.cfg.interfaces_config)
    }

    fn require_service(&self, interface: &str) -> Result<String> {
        match services::resolve(&self.cfg, &self.bus, interface)? {
            Resolution::Live(service) => Ok(service),
            Resolution::Absent => Err(Error::UnresolvedInterface(interface.to_string())),
        }
    }

    // ========================================================================
    // Read operations
    // ========================================================================

    /// Details for all host interfaces, loopback excluded.
    pub fn interfaces_details(&self) -> Result<Vec<InterfaceInfo>> {
        normalize::get_all_details(&self.cfg, &self.bus, &self.store(), &self.probe)
    }

    /// Details for one interface.
    pub fn interface_details(&self, interface: &str) -> Result<InterfaceInfo> {
        self.interfaces_details()?
            .into_iter()
            .find(|info| info.connectionid == interface)
            .ok_or_else(|| Error::UnresolvedInterface(interface.to_string()))
    }

    /// Human-readable technology summary. Informational only.
    pub fn technologies(&self) -> Result<String> {
        services::technologies(&self.bus)
    }

    // ========================================================================
    // Enable / disable
    // ========================================================================

    /// Enable the interface's service. No-op success when already
    /// online/ready; a null connect reply is the only other success.
    pub fn up(&self, interface: &str) -> Result<bool> {
        let service = self.require_service(interface)?;
        if services::is_connected(&self.cfg, &self.bus, &service)? {
            return Ok(true);
        }
        info!("Connecting service {service}");
        match self.bus.connect_service(&self.cfg.service_path(&service))? {
            None => Ok(true),
            Some(reply) => Err(Error::daemon(format!(
                "Couldn't enable service {service}: unexpected reply {reply:?}"
            ))),
        }
    }

    /// Alias for [`Self::up`].
    pub fn enable(&self, interface: &str) -> Result<bool> {
        self.up(interface)
    }

    /// Disable the interface's service. No-op success when already
    /// disconnected.
    pub fn down(&self, interface: &str) -> Result<bool> {
        let service = self.require_service(interface)?;
        if !services::is_connected(&self.cfg, &self.bus, &service)? {
            return Ok(true);
        }
        info!("Disconnecting service {service}");
        match self.bus.disconnect_service(&self.cfg.service_path(&service))? {
            None => Ok(true),
            Some(reply) => Err(Error::daemon(format!(
                "Couldn't disable service {service}: unexpected reply {reply:?}"
            ))),
        }
    }

    /// Alias for [`Self::down`].
    pub fn disable(&self, interface: &str) -> Result<bool> {
        self.down(interface)
    }

    // ========================================================================
    // Address configuration
    // ========================================================================

    /// Configure the interface for DHCP with link-local fallback.
    /// Requires a live service; the Static Store is never touched.
    pub fn set_dhcp_linklocal(&self, interface: &str) -> Result<bool> {
        let service = self.require_service(interface)?;
        let path = self.cfg.service_path(&service);
        let mut ipv4 = self.ipv4_configuration(&service)?;
        ipv4.insert("Method".to_string(), PropValue::Str("dhcp".to_string()));
        for field in ["Address", "Netmask", "Gateway"] {
            ipv4.insert(field.to_string(), PropValue::Str(String::new()));
        }
        self.bus
            .set_service_property(&path, "IPv4.Configuration", PropValue::Map(ipv4))?;
        // reset the configured nameserver list
        self.bus.set_service_property(
            &path,
            "Nameservers.Configuration",
            PropValue::List(vec![String::new()]),
        )?;
        info!("Set dhcp_linklocal on {interface} via service {service}");
        Ok(true)
    }

    /// Configure static IPv4 settings, landing on the live service when
    /// one resolves and on the Static Store when the interface exists on
    /// the host without a service.
    pub fn set_static(
        &self,
        interface: &str,
        address: &str,
        netmask: &str,
        gateway: &str,
        nameservers: &[String],
    ) -> Result<bool> {
        validation::validate_ipv4(&[address, netmask, gateway])?;
        validation::validate_nameservers(nameservers)?;

        match services::resolve(&self.cfg, &self.bus, interface)? {
            Resolution::Live(service) => {
                let path = self.cfg.service_path(&service);
                let mut ipv4 = self.ipv4_configuration(&service)?;
                ipv4.insert("Method".to_string(), PropValue::Str("manual".to_string()));
                ipv4.insert("Address".to_string(), PropValue::Str(address.to_string()));
                ipv4.insert("Netmask".to_string(), PropValue::Str(netmask.to_string()));
                ipv4.insert("Gateway".to_string(), PropValue::Str(gateway.to_string()));
                self.bus
                    .set_service_property(&path, "IPv4.Configuration", PropValue::Map(ipv4))?;
                if !nameservers.is_empty() {
                    self.bus.set_service_property(
                        &path,
                        "Nameservers.Configuration",
                        PropValue::List(nameservers.to_vec()),
                    )?;
                }
                info!("Set static IPv4 on {interface} via service {service}");
                Ok(true)
            }
            Resolution::Absent => {
                let iface = self.host_interface(interface)?;
                let section_id = iface.section_id();
                self.store().upsert(
                    &section_id,
                    address,
                    netmask,
                    gateway,
                    &nameservers.join(","),
                    &format!("ethernet_cable_{section_id}"),
                    &iface.hwaddr,
                )?;
                info!("Set static IPv4 on {interface} via fallback config");
                Ok(true)
            }
        }
    }

    /// Build one interface's configuration from a settings map, then
    /// optionally enable it. Returns the resulting normalized record.
    pub fn build_interface(
        &self,
        interface: &str,
        iface_type: &str,
        enable: bool,
        settings: &Settings,
    ) -> Result<InterfaceInfo> {
        if iface_type != "eth" {
            return Err(Error::Unsupported(format!(
                "Interface type not supported: {iface_type}"
            )));
        }
        match settings.get("proto").map(String::as_str) {
            None | Some("dhcp") => {
                self.set_dhcp_linklocal(interface)?;
            }
            Some("static") => {
                // check the keys by name before positional validation so
                // the error names the key that is actually absent
                let mut triple = Vec::new();
                for key in ["ipaddr", "netmask", "gateway"] {
                    match settings.get(key) {
                        Some(value) => triple.push(value.as_str()),
                        None => {
                            return Err(Error::invalid_input(format!(
                                "Invalid value for ipv4 option: missing {key}"
                            )));
                        }
                    }
                }
                validation::validate_ipv4(&triple)?;
                let mut nameservers = Vec::new();
                let mut keys: Vec<&String> = settings.keys().collect();
                keys.sort();
                for key in keys {
                    if key.contains("dns") || key.contains("domain") {
                        nameservers
                            .extend(validation::validate_nameserver_list(&settings[key])?);
                    }
                }
                self.set_static(interface, triple[0], triple[1], triple[2], &nameservers)?;
            }
            Some(proto) => {
                return Err(Error::Unsupported(format!(
                    "Protocol type: {proto} is not supported"
                )));
            }
        }
        if enable {
            self.up(interface)?;
        }
        self.interface_details(interface)
    }

    // ========================================================================
    // Global network settings
    // ========================================================================

    /// Current global settings: networking on/off plus hostname.
    pub fn get_network_settings(&self) -> Result<NetworkSettings> {
        let networking = services::manager_state(&self.bus)? != "offline";
        let hostname = self.host.hostname()?;
        Ok(NetworkSettings {
            networking,
            hostname,
        })
    }

    /// Apply global settings at boot scope: connman unit enablement and
    /// hostname. Returns the list of changes made.
    pub fn build_network_settings(&self, settings: &Settings) -> Result<Vec<String>> {
        let mut changes = Vec::new();
        if let Some(networking) = settings.get("networking") {
            if self.cfg.is_truthy(networking) {
                self.host.enable_service(&self.cfg.connman_unit)?;
            } else {
                self.host.disable_service(&self.cfg.connman_unit)?;
            }
        }
        if let Some(hostname) = settings.get("hostname") {
            // only the host part; the domain is not ours to manage
            let new_hostname = hostname.split('.').next().unwrap_or(hostname);
            let old_hostname = self.host.hostname()?;
            if new_hostname != old_hostname {
                self.host.set_hostname(new_hostname)?;
                changes.push(format!("hostname={new_hostname}"));
            }
        }
        Ok(changes)
    }

    /// Apply global settings at runtime scope: optional hostname change
    /// and a connman restart unless a reboot was requested instead.
    pub fn apply_network_settings(&self, settings: &Settings) -> Result<bool> {
        let truthy = |key: &str| {
            settings
                .get(key)
                .map(|v| self.cfg.is_truthy(v))
                .unwrap_or(false)
        };

        let mut hostname_applied = true;
        if truthy("apply_hostname") {
            match settings.get("hostname") {
                Some(hostname) => hostname_applied = self.host.set_hostname(hostname)?,
                None => {
                    warn!("Hostname apply requested but no hostname is defined");
                    hostname_applied = false;
                }
            }
        }

        let restarted = if truthy("require_reboot") {
            warn!("A reboot is required to properly apply the network configuration");
            true
        } else {
            let stopped = self.host.stop_service(&self.cfg.connman_unit)?;
            thread::sleep(self.cfg.settle_delay);
            stopped && self.host.start_service(&self.cfg.connman_unit)?
        };

        Ok(hostname_applied && restarted)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Current IPv4.Configuration of a service, empty when unreadable as
    /// a map (the subsequent set overwrites every field we care about).
    fn ipv4_configuration(&self, service: &str) -> Result<PropMap> {
        match services::service_property(&self.cfg, &self.bus, service, "IPv4.Configuration")? {
            Some(PropValue::Map(map)) => Ok(map),
            _ => Ok(PropMap::new()),
        }
    }

    fn host_interface(&self, interface: &str) -> Result<InterfaceRef> {
        self.probe
            .interfaces()?
            .into_iter()
            .find(|iface| iface.name == interface)
            .ok_or_else(|| Error::UnresolvedInterface(interface.to_string()))
    }
}
