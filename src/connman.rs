// Netcfg - ConnMan D-Bus Client
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Blocking D-Bus client for the ConnMan daemon.
//!
//! The rest of the crate talks to ConnMan through the [`ConnmanBus`]
//! trait, which exposes manager/service properties as bus-neutral
//! [`PropValue`]s. [`ConnmanDbus`] implements the trait over the system
//! bus; tests substitute an in-memory fake.

use std::collections::HashMap;

use tracing::debug;
use zbus::blocking::Connection;
use zbus::proxy;
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::models::{Error, Result};

/// Bus-neutral property value.
///
/// ConnMan properties are D-Bus variants; only the shapes the crate
/// actually reads are represented (strings, booleans, integers, string
/// lists and string-keyed dictionaries). Anything else is dropped at the
/// transport boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Bool(bool),
    Int(i64),
    List(Vec<String>),
    Map(HashMap<String, PropValue>),
}

/// Property map of one manager, service or technology object.
pub type PropMap = HashMap<String, PropValue>;

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(n) => Some(*n != 0),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Dictionary lookup; `None` for non-map values.
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// String field of a dictionary value.
    pub fn str_of(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }
}

/// Abstract ConnMan IPC capability.
///
/// Failures of any call surface as [`Error::Daemon`]; the caller treats
/// them as terminal for that operation, no retry.
pub trait ConnmanBus {
    /// Global manager properties (State, OfflineMode, ...).
    fn manager_properties(&self) -> Result<PropMap>;

    /// All known services as (object path, properties) pairs.
    fn services(&self) -> Result<Vec<(String, PropMap)>>;

    /// All known technologies as (object path, properties) pairs.
    fn technologies(&self) -> Result<Vec<(String, PropMap)>>;

    /// Properties of one service, by full object path.
    fn service_properties(&self, path: &str) -> Result<PropMap>;

    /// Set one service property, by full object path.
    fn set_service_property(&self, path: &str, name: &str, value: PropValue) -> Result<()>;

    /// Connect a service. A null reply (`Ok(None)`) is the only success;
    /// any non-null reply is treated as a failure by the caller.
    fn connect_service(&self, path: &str) -> Result<Option<PropValue>>;

    /// Disconnect a service. Same reply contract as [`Self::connect_service`].
    fn disconnect_service(&self, path: &str) -> Result<Option<PropValue>>;
}

#[proxy(
    default_service = "net.connman",
    default_path = "/",
    interface = "net.connman.Manager"
)]
trait Manager {
    fn get_properties(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    fn get_services(&self) -> zbus::Result<Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>>;

    fn get_technologies(
        &self,
    ) -> zbus::Result<Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>>;
}

#[proxy(default_service = "net.connman", interface = "net.connman.Service")]
trait Service {
    fn get_properties(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    fn set_property(&self, name: &str, value: Value<'_>) -> zbus::Result<()>;

    fn connect(&self) -> zbus::Result<()>;

    fn disconnect(&self) -> zbus::Result<()>;
}

/// [`ConnmanBus`] implementation over the system D-Bus.
pub struct ConnmanDbus {
    connection: Connection,
}

impl ConnmanDbus {
    /// Connect to the system bus.
    pub fn system() -> Result<Self> {
        let connection = Connection::system()?;
        debug!("Connected to system D-Bus");
        Ok(Self { connection })
    }

    fn manager(&self) -> Result<ManagerProxyBlocking<'_>> {
        Ok(ManagerProxyBlocking::new(&self.connection)?)
    }

    fn service(&self, path: &str) -> Result<ServiceProxyBlocking<'_>> {
        Ok(ServiceProxyBlocking::builder(&self.connection)
            .path(path.to_owned())?
            .build()?)
    }
}

impl ConnmanBus for ConnmanDbus {
    fn manager_properties(&self) -> Result<PropMap> {
        let raw = self.manager()?.get_properties()?;
        Ok(prop_map(&raw))
    }

    fn services(&self) -> Result<Vec<(String, PropMap)>> {
        let raw = self.manager()?.get_services()?;
        Ok(raw
            .into_iter()
            .map(|(path, props)| (path.to_string(), prop_map(&props)))
            .collect())
    }

    fn technologies(&self) -> Result<Vec<(String, PropMap)>> {
        let raw = self.manager()?.get_technologies()?;
        Ok(raw
            .into_iter()
            .map(|(path, props)| (path.to_string(), prop_map(&props)))
            .collect())
    }

    fn service_properties(&self, path: &str) -> Result<PropMap> {
        let raw = self.service(path)?.get_properties()?;
        Ok(prop_map(&raw))
    }

    fn set_service_property(&self, path: &str, name: &str, value: PropValue) -> Result<()> {
        debug!("SetProperty {name} on {path}");
        self.service(path)?.set_property(name, to_value(&value))?;
        Ok(())
    }

    fn connect_service(&self, path: &str) -> Result<Option<PropValue>> {
        // Connect returns an empty body; a successful reply is the null
        // return of the daemon contract.
        self.service(path)?.connect()?;
        Ok(None)
    }

    fn disconnect_service(&self, path: &str) -> Result<Option<PropValue>> {
        self.service(path)?.disconnect()?;
        Ok(None)
    }
}

impl From<zbus::zvariant::Error> for Error {
    fn from(err: zbus::zvariant::Error) -> Self {
        Error::Daemon(err.to_string())
    }
}

fn prop_map(raw: &HashMap<String, OwnedValue>) -> PropMap {
    raw.iter()
        .filter_map(|(name, value)| prop_value(value).map(|v| (name.clone(), v)))
        .collect()
}

fn prop_value(value: &Value<'_>) -> Option<PropValue> {
    match value {
        Value::Str(s) => Some(PropValue::Str(s.to_string())),
        Value::Bool(b) => Some(PropValue::Bool(*b)),
        Value::U8(n) => Some(PropValue::Int(i64::from(*n))),
        Value::I16(n) => Some(PropValue::Int(i64::from(*n))),
        Value::U16(n) => Some(PropValue::Int(i64::from(*n))),
        Value::I32(n) => Some(PropValue::Int(i64::from(*n))),
        Value::U32(n) => Some(PropValue::Int(i64::from(*n))),
        Value::I64(n) => Some(PropValue::Int(*n)),
        Value::U64(n) => Some(PropValue::Int(*n as i64)),
        Value::ObjectPath(p) => Some(PropValue::Str(p.to_string())),
        Value::Value(inner) => prop_value(inner),
        Value::Array(_) => {
            let items = Vec::<String>::try_from(value.try_clone().ok()?).ok()?;
            Some(PropValue::List(items))
        }
        Value::Dict(_) => {
            let map = HashMap::<String, OwnedValue>::try_from(value.try_clone().ok()?).ok()?;
            Some(PropValue::Map(prop_map(&map)))
        }
        _ => None,
    }
}

fn to_value(value: &PropValue) -> Value<'static> {
    match value {
        PropValue::Str(s) => Value::from(s.clone()),
        PropValue::Bool(b) => Value::from(*b),
        PropValue::Int(n) => Value::from(*n),
        PropValue::List(items) => Value::from(items.clone()),
        PropValue::Map(map) => {
            let converted: HashMap<String, Value<'static>> = map
                .iter()
                .map(|(k, v)| (k.clone(), to_value(v)))
                .collect();
            Value::from(converted)
        }
    }
}
