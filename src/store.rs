// Netcfg - Static Store
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Persistent fallback configuration for interfaces without a live
//! ConnMan service.
//!
//! The file is INI-like: one `[interface_<hexhwaddr>]` section per
//! interface with `IPv4` (compound `address/netmask/gateway`),
//! `Nameservers` (comma-joined), `Name`, `MAC` and `Type` keys. Every
//! mutation is a whole-file read-modify-write finished with an atomic
//! replace (temp file + rename), so a targeted update can never drop or
//! corrupt unrelated sections. Single writer assumed; callers serialize
//! concurrent invocations.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::models::{Result, StaticRecord};

const KEY_IPV4: &str = "IPv4";
const KEY_NAMESERVERS: &str = "Nameservers";
const KEY_NAME: &str = "Name";
const KEY_MAC: &str = "MAC";
const KEY_TYPE: &str = "Type";

/// Handle on the fallback configuration file. Stateless between calls;
/// every operation re-reads the file.
#[derive(Debug, Clone)]
pub struct StaticStore {
    path: PathBuf,
}

#[derive(Debug, Clone, Default)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }
}

impl StaticStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The record stored for one section id, if any.
    pub fn get(&self, section_id: &str) -> Result<Option<StaticRecord>> {
        let sections = self.load()?;
        let wanted = section_name(section_id);
        Ok(sections
            .iter()
            .find(|s| s.name == wanted)
            .and_then(record_from))
    }

    /// Create or overwrite one interface's record, preserving every other
    /// section, then atomically replace the file.
    #[allow(clippy::too_many_arguments)]
    pub fn upsert(
        &self,
        section_id: &str,
        address: &str,
        netmask: &str,
        gateway: &str,
        dns_csv: &str,
        name: &str,
        mac: &str,
    ) -> Result<()> {
        let mut sections = self.load()?;
        let wanted = section_name(section_id);
        let section = match sections.iter_mut().find(|s| s.name == wanted) {
            Some(existing) => existing,
            None => {
                sections.push(Section {
                    name: wanted,
                    entries: Vec::new(),
                });
                sections.last_mut().expect("just pushed")
            }
        };
        section.set(KEY_IPV4, &format!("{address}/{netmask}/{gateway}"));
        section.set(KEY_NAMESERVERS, dns_csv);
        section.set(KEY_NAME, name);
        section.set(KEY_MAC, mac);
        section.set(KEY_TYPE, "ethernet");

        self.write_atomic(&render(&sections))
    }

    fn load(&self) -> Result<Vec<Section>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        match parse(&text) {
            Some(sections) => Ok(sections),
            None => {
                // content before any section header; treat the file as an
                // empty store so a never-initialized file blocks nothing
                warn!(
                    "No section header in {}, treating as empty store",
                    self.path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    fn write_atomic(&self, content: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!("Rewrote {}", self.path.display());
        Ok(())
    }
}

fn section_name(section_id: &str) -> String {
    format!("interface_{section_id}")
}

/// Parse the file into sections. `None` when a content line precedes the
/// first section header (the missing-section-header condition).
fn parse(text: &str) -> Option<Vec<Section>> {
    let mut sections: Vec<Section> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.push(Section {
                name: name.trim().to_string(),
                entries: Vec::new(),
            });
            continue;
        }
        let section = sections.last_mut()?;
        match line.split_once('=').or_else(|| line.split_once(':')) {
            Some((key, value)) => section
                .entries
                .push((key.trim().to_string(), value.trim().to_string())),
            None => warn!("Skipping malformed line in interfaces config: {line}"),
        }
    }
    Some(sections)
}

fn render(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push('[');
        out.push_str(&section.name);
        out.push_str("]\n");
        for (key, value) in &section.entries {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

fn record_from(section: &Section) -> Option<StaticRecord> {
    let ipv4 = section.get(KEY_IPV4)?;
    let mut parts = ipv4.splitn(3, '/');
    let address = parts.next()?.to_string();
    let netmask = parts.next()?.to_string();
    let gateway = parts.next()?.to_string();
    let nameservers = section
        .get(KEY_NAMESERVERS)
        .map(|csv| {
            csv.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Some(StaticRecord {
        address,
        netmask,
        gateway,
        nameservers,
        name: section.get(KEY_NAME).unwrap_or_default().to_string(),
        mac: section.get(KEY_MAC).unwrap_or_default().to_string(),
    })
}
