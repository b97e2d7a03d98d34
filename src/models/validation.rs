// Netcfg - Validation Utilities
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Input validation for IPv4 settings and nameserver lists.
//!
//! Pure functions: every validator reports the specific failing field and
//! value, and none of them mutates anything.

use std::net::Ipv4Addr;
use std::str::FromStr;

use super::error::{Error, Result};

const IPV4_FIELDS: [&str; 3] = ["address", "netmask", "gateway"];

/// Validate an address/netmask/gateway triple.
///
/// Exactly three elements are required; a shorter slice names the missing
/// field(s) so callers can report what was left out.
pub fn validate_ipv4(parts: &[&str]) -> Result<()> {
    if parts.len() != 3 {
        if parts.len() < 3 {
            let missing = IPV4_FIELDS[parts.len()..].join(", ");
            return Err(Error::invalid_input(format!(
                "Invalid value for ipv4 option: missing {missing}"
            )));
        }
        return Err(Error::invalid_input(format!(
            "Invalid value: {parts:?} for ipv4 option"
        )));
    }
    if !is_ipv4_addr(parts[0]) {
        return Err(Error::invalid_input(format!(
            "Invalid ip address: {} for ipv4 option",
            parts[0]
        )));
    }
    if !is_netmask(parts[1]) {
        return Err(Error::invalid_input(format!(
            "Invalid netmask: {} for ipv4 option",
            parts[1]
        )));
    }
    if !is_ipv4_addr(parts[2]) {
        return Err(Error::invalid_input(format!(
            "Invalid gateway: {} for ipv4 option",
            parts[2]
        )));
    }
    Ok(())
}

/// Validate a whitespace-delimited nameserver value, returning the split
/// tokens. Empty after splitting is invalid.
pub fn validate_nameserver_list(value: &str) -> Result<Vec<String>> {
    let servers: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    if servers.is_empty() {
        return Err(Error::invalid_input(format!(
            "{value:?} is not a valid list of name servers"
        )));
    }
    Ok(servers)
}

/// Validate an already-structured nameserver sequence. An empty sequence
/// is a legitimate "leave unset"; a blank entry is not.
pub fn validate_nameservers(servers: &[String]) -> Result<()> {
    for server in servers {
        if server.trim().is_empty() || server.contains(char::is_whitespace) {
            return Err(Error::invalid_input(format!(
                "{server:?} is not a valid name server entry"
            )));
        }
    }
    Ok(())
}

fn is_ipv4_addr(value: &str) -> bool {
    Ipv4Addr::from_str(value.trim()).is_ok()
}

/// A netmask is a dotted quad whose bit pattern is a contiguous run of
/// ones followed by zeros.
fn is_netmask(value: &str) -> bool {
    match Ipv4Addr::from_str(value.trim()) {
        Ok(addr) => {
            let mask = u32::from(addr);
            mask.count_ones() + mask.trailing_zeros() == 32
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_triple() {
        assert!(validate_ipv4(&["10.0.0.5", "255.255.255.0", "10.0.0.1"]).is_ok());
        assert!(validate_ipv4(&["192.168.1.10", "255.255.0.0", "192.168.1.1"]).is_ok());
    }

    #[test]
    fn test_invalid_address_names_field() {
        let err = validate_ipv4(&["256.1.1.1", "255.255.255.0", "10.0.0.1"]).unwrap_err();
        assert!(err.to_string().contains("Invalid ip address: 256.1.1.1"));
    }

    #[test]
    fn test_invalid_netmask_names_field() {
        // non-contiguous mask bits
        let err = validate_ipv4(&["10.0.0.5", "255.0.255.0", "10.0.0.1"]).unwrap_err();
        assert!(err.to_string().contains("Invalid netmask: 255.0.255.0"));
        let err = validate_ipv4(&["10.0.0.5", "garbage", "10.0.0.1"]).unwrap_err();
        assert!(err.to_string().contains("Invalid netmask: garbage"));
    }

    #[test]
    fn test_invalid_gateway_names_field() {
        let err = validate_ipv4(&["10.0.0.5", "255.255.255.0", "not-an-ip"]).unwrap_err();
        assert!(err.to_string().contains("Invalid gateway: not-an-ip"));
    }

    #[test]
    fn test_short_triple_names_missing_field() {
        let err = validate_ipv4(&["10.0.0.5", "255.255.255.0"]).unwrap_err();
        assert!(err.to_string().contains("missing gateway"));
        let err = validate_ipv4(&["10.0.0.5"]).unwrap_err();
        assert!(err.to_string().contains("missing netmask, gateway"));
    }

    #[test]
    fn test_netmask_edge_values() {
        assert!(validate_ipv4(&["10.0.0.5", "0.0.0.0", "10.0.0.1"]).is_ok());
        assert!(validate_ipv4(&["10.0.0.5", "255.255.255.255", "10.0.0.1"]).is_ok());
    }

    #[test]
    fn test_nameserver_list_splits_whitespace() {
        let servers = validate_nameserver_list("8.8.8.8  8.8.4.4").unwrap();
        assert_eq!(servers, vec!["8.8.8.8", "8.8.4.4"]);
    }

    #[test]
    fn test_empty_nameserver_list_is_invalid() {
        assert!(validate_nameserver_list("").is_err());
        assert!(validate_nameserver_list("   ").is_err());
    }

    #[test]
    fn test_structured_nameservers() {
        assert!(validate_nameservers(&[]).is_ok());
        assert!(validate_nameservers(&["8.8.8.8".to_string()]).is_ok());
        assert!(validate_nameservers(&["".to_string()]).is_err());
    }
}
