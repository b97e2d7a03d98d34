// Netcfg - Interface Read Model
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Canonical interface records.
//!
//! [`InterfaceInfo`] is the one shape every read operation returns, no
//! matter whether the data came from a live ConnMan service or from the
//! fallback configuration file. It is constructed fresh on each query and
//! never stored.

use std::fmt;

use serde::Serialize;

use super::{IFF_LOOPBACK, IFF_RUNNING};

/// Identity of a physical network interface as enumerated from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRef {
    /// Interface name (e.g. "eth0").
    pub name: String,
    /// Hardware address in colon-hex form, trailing separator stripped.
    pub hwaddr: String,
    /// Kernel interface flags (IFF_*).
    pub flags: u32,
}

impl InterfaceRef {
    pub fn new(name: impl Into<String>, hwaddr: impl Into<String>, flags: u32) -> Self {
        Self {
            name: name.into(),
            hwaddr: hwaddr.into(),
            flags,
        }
    }

    pub fn is_loopback(&self) -> bool {
        self.flags & IFF_LOOPBACK != 0
    }

    pub fn is_running(&self) -> bool {
        self.flags & IFF_RUNNING != 0
    }

    /// Fallback-file section identifier: hardware address with the colon
    /// separators removed.
    pub fn section_id(&self) -> String {
        self.hwaddr.split(':').collect()
    }
}

/// How an interface obtains its IPv4 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestMode {
    Static,
    DhcpLinklocal,
}

impl RequestMode {
    /// The fixed pair of modes every interface supports.
    pub const SUPPORTED: [RequestMode; 2] = [RequestMode::Static, RequestMode::DhcpLinklocal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::DhcpLinklocal => "dhcp_linklocal",
        }
    }

    /// Translate a ConnMan `Method` value. "dhcp" surfaces as
    /// dhcp_linklocal; "manual" and "fixed" surface as static.
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "dhcp" => Some(Self::DhcpLinklocal),
            "manual" | "fixed" => Some(Self::Static),
            _ => None,
        }
    }
}

impl fmt::Display for RequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IPv4 block of the canonical read model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ipv4Config {
    pub requestmode: RequestMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<String>,
    pub supportedrequestmodes: Vec<RequestMode>,
}

impl Default for Ipv4Config {
    fn default() -> Self {
        Self {
            requestmode: RequestMode::Static,
            address: None,
            netmask: None,
            gateway: None,
            dns: Vec::new(),
            supportedrequestmodes: RequestMode::SUPPORTED.to_vec(),
        }
    }
}

/// Best-effort IPv6 block. Each field keeps the single-element list shape
/// the callers expect.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ipv6Config {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefix: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gateway: Vec<String>,
}

impl Ipv6Config {
    pub fn is_empty(&self) -> bool {
        self.address.is_empty() && self.prefix.is_empty() && self.gateway.is_empty()
    }
}

/// Canonical per-interface read model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceInfo {
    /// Service identifier for live interfaces, interface name otherwise.
    pub label: String,
    /// Interface name the record is bound to.
    pub connectionid: String,
    pub hwaddr: String,
    pub wireless: bool,
    pub up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Ipv4Config>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Ipv6Config>,
}

impl fmt::Display for InterfaceInfo {
    /// Flat `key: value` rendering, keys in lexical order, nested blocks
    /// flattened with a `-` separator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "connectionid: {}", self.connectionid)?;
        writeln!(f, "hwaddr: {}", self.hwaddr)?;
        if let Some(ipv4) = &self.ipv4 {
            if let Some(address) = &ipv4.address {
                writeln!(f, "ipv4-address: {address}")?;
            }
            if !ipv4.dns.is_empty() {
                writeln!(f, "ipv4-dns: {}", ipv4.dns.join(" "))?;
            }
            if let Some(gateway) = &ipv4.gateway {
                writeln!(f, "ipv4-gateway: {gateway}")?;
            }
            if let Some(netmask) = &ipv4.netmask {
                writeln!(f, "ipv4-netmask: {netmask}")?;
            }
            writeln!(f, "ipv4-requestmode: {}", ipv4.requestmode)?;
            let modes: Vec<&str> = ipv4
                .supportedrequestmodes
                .iter()
                .map(RequestMode::as_str)
                .collect();
            writeln!(f, "ipv4-supportedrequestmodes: {}", modes.join(" "))?;
        }
        if let Some(ipv6) = &self.ipv6 {
            if !ipv6.address.is_empty() {
                writeln!(f, "ipv6-address: {}", ipv6.address.join(" "))?;
            }
            if !ipv6.gateway.is_empty() {
                writeln!(f, "ipv6-gateway: {}", ipv6.gateway.join(" "))?;
            }
            if !ipv6.prefix.is_empty() {
                writeln!(f, "ipv6-prefix: {}", ipv6.prefix.join(" "))?;
            }
        }
        writeln!(f, "label: {}", self.label)?;
        writeln!(f, "up: {}", self.up)?;
        write!(f, "wireless: {}", self.wireless)
    }
}

/// One interface's record in the fallback configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRecord {
    pub address: String,
    pub netmask: String,
    pub gateway: String,
    pub nameservers: Vec<String>,
    pub name: String,
    pub mac: String,
}
