// Netcfg - Test Fixtures
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! In-memory fakes for the capability traits.
//!
//! `FakeBus` mimics the daemon's observable behavior just enough for the
//! reconciliation tests: writes to `IPv4.Configuration` and
//! `Nameservers.Configuration` are mirrored into the corresponding
//! runtime properties, and Connect/Disconnect flip the service state.
//! Only mutations are recorded in the call log; reads are free.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::connman::{ConnmanBus, PropMap, PropValue};
use crate::host::HostControl;
use crate::ifaces::InterfaceProbe;
use crate::models::{Error, InterfaceRef, Result};

/// A wired-ethernet service fixture as (object path, properties).
pub fn eth_service(id: &str, iface: &str, state: &str, method: &str) -> (String, PropMap) {
    let mut props = PropMap::new();
    props.insert("Type".to_string(), PropValue::Str("ethernet".to_string()));
    props.insert("State".to_string(), PropValue::Str(state.to_string()));
    props.insert(
        "Ethernet".to_string(),
        PropValue::Map(HashMap::from([
            ("Interface".to_string(), PropValue::Str(iface.to_string())),
            (
                "Address".to_string(),
                PropValue::Str("00:80:2f:aa:bb:cc".to_string()),
            ),
        ])),
    );
    props.insert(
        "IPv4".to_string(),
        PropValue::Map(HashMap::from([
            ("Method".to_string(), PropValue::Str(method.to_string())),
            (
                "Address".to_string(),
                PropValue::Str("192.168.1.10".to_string()),
            ),
            (
                "Netmask".to_string(),
                PropValue::Str("255.255.255.0".to_string()),
            ),
            (
                "Gateway".to_string(),
                PropValue::Str("192.168.1.1".to_string()),
            ),
        ])),
    );
    props.insert(
        "Nameservers".to_string(),
        PropValue::List(vec!["192.168.1.1".to_string()]),
    );
    (format!("/net/connman/service/{id}"), props)
}

/// [`eth_service`] with a closure applied to the properties afterwards.
pub fn eth_service_with(
    id: &str,
    iface: &str,
    state: &str,
    method: &str,
    tweak: impl FnOnce(&mut PropMap),
) -> (String, PropMap) {
    let (path, mut props) = eth_service(id, iface, state, method);
    tweak(&mut props);
    (path, props)
}

/// In-memory [`ConnmanBus`].
pub struct FakeBus {
    services: RefCell<Vec<(String, PropMap)>>,
    technologies: Vec<(String, PropMap)>,
    manager_state: String,
    connect_reply: Option<PropValue>,
    disconnect_reply: Option<PropValue>,
    calls: RefCell<Vec<String>>,
}

impl FakeBus {
    pub fn new(services: Vec<(String, PropMap)>) -> Self {
        Self {
            services: RefCell::new(services),
            technologies: Vec::new(),
            manager_state: "online".to_string(),
            connect_reply: None,
            disconnect_reply: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_technology(mut self, ty: &str, name: &str, powered: bool, connected: bool) -> Self {
        let props = PropMap::from([
            ("Type".to_string(), PropValue::Str(ty.to_string())),
            ("Name".to_string(), PropValue::Str(name.to_string())),
            ("Powered".to_string(), PropValue::Bool(powered)),
            ("Connected".to_string(), PropValue::Bool(connected)),
        ]);
        self.technologies
            .push((format!("/net/connman/technology/{ty}"), props));
        self
    }

    pub fn with_manager_state(mut self, state: &str) -> Self {
        self.manager_state = state.to_string();
        self
    }

    pub fn with_connect_reply(mut self, reply: PropValue) -> Self {
        self.connect_reply = Some(reply);
        self
    }

    pub fn with_disconnect_reply(mut self, reply: PropValue) -> Self {
        self.disconnect_reply = Some(reply);
        self
    }

    /// The mutation log, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn with_service<T>(&self, path: &str, f: impl FnOnce(&mut PropMap) -> T) -> Result<T> {
        let mut services = self.services.borrow_mut();
        match services.iter_mut().find(|(p, _)| p == path) {
            Some((_, props)) => Ok(f(props)),
            None => Err(Error::daemon(format!("No such service: {path}"))),
        }
    }
}

impl ConnmanBus for FakeBus {
    fn manager_properties(&self) -> Result<PropMap> {
        Ok(PropMap::from([(
            "State".to_string(),
            PropValue::Str(self.manager_state.clone()),
        )]))
    }

    fn services(&self) -> Result<Vec<(String, PropMap)>> {
        Ok(self.services.borrow().clone())
    }

    fn technologies(&self) -> Result<Vec<(String, PropMap)>> {
        Ok(self.technologies.clone())
    }

    fn service_properties(&self, path: &str) -> Result<PropMap> {
        self.with_service(path, |props| props.clone())
    }

    fn set_service_property(&self, path: &str, name: &str, value: PropValue) -> Result<()> {
        self.calls.borrow_mut().push(format!("set:{path}:{name}"));
        self.with_service(path, |props| {
            // mirror configuration writes into the runtime property the
            // way the daemon applies them
            match (name, &value) {
                ("IPv4.Configuration", PropValue::Map(_)) => {
                    props.insert("IPv4".to_string(), value.clone());
                }
                ("Nameservers.Configuration", PropValue::List(items)) => {
                    let applied: Vec<String> =
                        items.iter().filter(|s| !s.is_empty()).cloned().collect();
                    props.insert("Nameservers".to_string(), PropValue::List(applied));
                }
                _ => {}
            }
            props.insert(name.to_string(), value);
        })
    }

    fn connect_service(&self, path: &str) -> Result<Option<PropValue>> {
        self.calls.borrow_mut().push(format!("connect:{path}"));
        if self.connect_reply.is_none() {
            self.with_service(path, |props| {
                props.insert("State".to_string(), PropValue::Str("online".to_string()));
            })?;
        }
        Ok(self.connect_reply.clone())
    }

    fn disconnect_service(&self, path: &str) -> Result<Option<PropValue>> {
        self.calls.borrow_mut().push(format!("disconnect:{path}"));
        if self.disconnect_reply.is_none() {
            self.with_service(path, |props| {
                props.insert("State".to_string(), PropValue::Str("idle".to_string()));
            })?;
        }
        Ok(self.disconnect_reply.clone())
    }
}

/// In-memory [`InterfaceProbe`] over a fixed interface list.
pub struct FakeProbe {
    interfaces: Vec<InterfaceRef>,
}

impl FakeProbe {
    pub fn new(interfaces: Vec<InterfaceRef>) -> Self {
        Self { interfaces }
    }
}

impl InterfaceProbe for FakeProbe {
    fn interfaces(&self) -> Result<Vec<InterfaceRef>> {
        Ok(self.interfaces.clone())
    }
}

/// In-memory [`HostControl`] recording every call.
pub struct FakeHost {
    hostname: RefCell<String>,
    calls: RefCell<Vec<String>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            hostname: RefCell::new("testhost".to_string()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FakeHost {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl HostControl for FakeHost {
    fn enable_service(&self, unit: &str) -> Result<bool> {
        self.calls.borrow_mut().push(format!("enable:{unit}"));
        Ok(true)
    }

    fn disable_service(&self, unit: &str) -> Result<bool> {
        self.calls.borrow_mut().push(format!("disable:{unit}"));
        Ok(true)
    }

    fn start_service(&self, unit: &str) -> Result<bool> {
        self.calls.borrow_mut().push(format!("start:{unit}"));
        Ok(true)
    }

    fn stop_service(&self, unit: &str) -> Result<bool> {
        self.calls.borrow_mut().push(format!("stop:{unit}"));
        Ok(true)
    }

    fn hostname(&self) -> Result<String> {
        Ok(self.hostname.borrow().clone())
    }

    fn set_hostname(&self, name: &str) -> Result<bool> {
        self.calls.borrow_mut().push(format!("hostname:{name}"));
        *self.hostname.borrow_mut() = name.to_string();
        Ok(true)
    }
}
