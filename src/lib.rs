// Netcfg - Library Root
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! IPv4 network interface configuration for embedded Linux.
//!
//! Mediates between the ConnMan daemon (authoritative for interfaces
//! with a live service) and an on-disk fallback file (authoritative for
//! interfaces without one). The [`reconcile::Reconciler`] is the
//! operation surface; everything below it is capability traits and pure
//! normalization so the whole stack is testable without a daemon.

pub mod connman;
pub mod host;
pub mod ifaces;
pub mod models;
pub mod normalize;
pub mod reconcile;
pub mod services;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use models::{Error, NetConfig, Result};
pub use reconcile::{NetworkSettings, Reconciler, Settings};
