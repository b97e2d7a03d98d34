// Netcfg - State Normalizer
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Conversion of heterogeneous interface state into the canonical
//! [`InterfaceInfo`] shape.
//!
//! Two sources feed the same record: live ConnMan service properties and
//! Static Store records. [`get_info`] is the single read funnel; every
//! external "get details" operation goes through it, so callers see one
//! consistent shape no matter which backend answered. Read-side
//! anomalies (a property missing from live state) are logged and the
//! field omitted, never a failure.

use tracing::warn;

use crate::connman::{ConnmanBus, PropValue};
use crate::ifaces::InterfaceProbe;
use crate::models::{
    InterfaceInfo, InterfaceRef, Ipv4Config, Ipv6Config, NetConfig, RequestMode, Result,
};
use crate::services::{self, Resolution};
use crate::store::StaticStore;

/// Normalize a live ConnMan service into the canonical shape.
pub fn normalize_live<B: ConnmanBus>(
    cfg: &NetConfig,
    bus: &B,
    service: &str,
) -> Result<InterfaceInfo> {
    let props = bus.service_properties(&cfg.service_path(service))?;
    let ethernet = props.get("Ethernet");
    let mut info = InterfaceInfo {
        label: service.to_string(),
        wireless: props.get("Type").and_then(PropValue::as_str) == Some("wifi"),
        connectionid: ethernet
            .and_then(|e| e.str_of("Interface"))
            .unwrap_or_default()
            .to_string(),
        hwaddr: ethernet
            .and_then(|e| e.str_of("Address"))
            .unwrap_or_default()
            .to_string(),
        up: false,
        ipv4: None,
        ipv6: None,
    };

    let state = props.get("State").and_then(PropValue::as_str);
    if !matches!(state, Some("ready") | Some("online")) {
        return Ok(info);
    }
    info.up = true;

    let mut ipv4 = Ipv4Config {
        gateway: Some("0.0.0.0".to_string()),
        ..Ipv4Config::default()
    };
    // manually configured services report their settings under
    // IPv4.Configuration rather than IPv4
    let manual = props.get("IPv4").and_then(|v| v.str_of("Method")) == Some("manual");
    let block_name = if manual { "IPv4.Configuration" } else { "IPv4" };
    let block = props.get(block_name);
    for field in ["Method", "Address", "Netmask", "Gateway"] {
        match block.and_then(|b| b.str_of(field)) {
            Some(value) => match field {
                "Method" => match RequestMode::from_method(value) {
                    Some(mode) => ipv4.requestmode = mode,
                    None => warn!("Unrecognized IPv4 method {value:?} for service {service}"),
                },
                "Address" => ipv4.address = Some(value.to_string()),
                "Netmask" => ipv4.netmask = Some(value.to_string()),
                _ => ipv4.gateway = Some(value.to_string()),
            },
            None => warn!("Unable to get IPv4 {field} for service {service}"),
        }
    }
    ipv4.dns = props
        .get("Nameservers")
        .and_then(PropValue::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default();
    info.ipv4 = Some(ipv4);

    // the block is initialized before population so a partially-filled
    // IPv6 property set still produces a well-formed record
    let mut ipv6 = Ipv6Config::default();
    if let Some(block) = props.get("IPv6") {
        for field in ["Address", "Prefix", "Gateway"] {
            match block.get(field).and_then(scalar_string) {
                Some(value) => match field {
                    "Address" => ipv6.address = vec![value],
                    "Prefix" => ipv6.prefix = vec![value],
                    _ => ipv6.gateway = vec![value],
                },
                None => warn!("Unable to get IPv6 {field} for service {service}"),
            }
        }
    }
    if !ipv6.is_empty() {
        info.ipv6 = Some(ipv6);
    }

    Ok(info)
}

/// Normalize a Static Store record (or its absence) into the canonical
/// shape. Interfaces without a live service are always reported down.
pub fn normalize_static(store: &StaticStore, iface: &InterfaceRef) -> Result<InterfaceInfo> {
    let mut info = InterfaceInfo {
        label: iface.name.clone(),
        connectionid: iface.name.clone(),
        hwaddr: iface.hwaddr.clone(),
        wireless: false,
        up: false,
        ipv4: Some(Ipv4Config::default()),
        ipv6: None,
    };
    if let Some(record) = store.get(&iface.section_id())? {
        if let Some(ipv4) = info.ipv4.as_mut() {
            ipv4.address = Some(record.address);
            ipv4.netmask = Some(record.netmask);
            ipv4.gateway = Some(record.gateway);
            ipv4.dns = record.nameservers;
        }
    }
    Ok(info)
}

/// The canonical record for one interface, from whichever backend is
/// authoritative right now.
pub fn get_info<B: ConnmanBus>(
    cfg: &NetConfig,
    bus: &B,
    store: &StaticStore,
    iface: &InterfaceRef,
) -> Result<InterfaceInfo> {
    match services::resolve(cfg, bus, &iface.name)? {
        Resolution::Live(service) => normalize_live(cfg, bus, &service),
        Resolution::Absent => normalize_static(store, iface),
    }
}

/// Records for all host interfaces except loopback, in enumeration order.
pub fn get_all_details<B: ConnmanBus, P: InterfaceProbe>(
    cfg: &NetConfig,
    bus: &B,
    store: &StaticStore,
    probe: &P,
) -> Result<Vec<InterfaceInfo>> {
    let mut details = Vec::new();
    for iface in probe.interfaces()? {
        if iface.is_loopback() {
            continue;
        }
        details.push(get_info(cfg, bus, store, &iface)?);
    }
    Ok(details)
}

fn scalar_string(value: &PropValue) -> Option<String> {
    match value {
        PropValue::Str(s) => Some(s.clone()),
        PropValue::Int(n) => Some(n.to_string()),
        _ => None,
    }
}
