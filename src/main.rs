// Netcfg - Main Entry Point
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Netcfg
//!
//! IPv4 network interface configuration for embedded Linux, mediating
//! between the ConnMan daemon and an on-disk fallback file.
//!
//! This is the command-line entry point.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use netcfg::connman::ConnmanDbus;
use netcfg::host::Systemctl;
use netcfg::ifaces::SysfsProbe;
use netcfg::models::CRATE_VERSION;
use netcfg::{NetConfig, Reconciler, Result, Settings};

/// Human-readable application name.
const APP_NAME: &str = "Netcfg";

/// Print version information and exit.
fn print_version() {
    println!("{} {}", APP_NAME, CRATE_VERSION);
    println!("Copyright (C) 2026 Christos A. Daggas");
    println!("License: MIT");
    println!();
    println!("IPv4 network interface configuration over ConnMan for embedded Linux.");
}

/// Print help information and exit.
fn print_help() {
    println!(
        "Usage: {} [OPTIONS] <COMMAND> [ARGS]",
        env::args().next().unwrap_or_else(|| "netcfg".to_string())
    );
    println!();
    println!("IPv4 network interface configuration over ConnMan for embedded Linux.");
    println!();
    println!("Commands:");
    println!("  list                        Show details of all interfaces (JSON)");
    println!("  show <iface> [--text]       Show details of one interface (JSON,");
    println!("                              or flat key: value text with --text)");
    println!("  up <iface>                  Enable the interface's service");
    println!("  down <iface>                Disable the interface's service");
    println!("  set-dhcp <iface>            Configure DHCP with link-local fallback");
    println!("  set-static <iface> <addr> <mask> <gw> [dns ...]");
    println!("                              Configure static IPv4 settings");
    println!("  build <iface> <type> <on|off> [key=value ...]");
    println!("                              Build interface config from settings");
    println!("                              (type: eth; proto=dhcp|static, ipaddr=,");
    println!("                              netmask=, gateway=, dns=...)");
    println!("  technologies                List ConnMan technologies");
    println!("  settings-get                Show global network settings (JSON)");
    println!("  settings-build [key=value ...]");
    println!("                              Apply boot-scope network settings");
    println!("  settings-apply [key=value ...]");
    println!("                              Apply runtime-scope network settings");
    println!();
    println!("Options:");
    println!("  -h, --help                  Show this help message and exit");
    println!("  -v, --version               Show version information and exit");
    println!("  -d, --debug                 Enable debug logging");
    println!("      --config <path>         Alternate fallback config file path");
    println!();
    println!("Environment variables:");
    println!("  RUST_LOG                    Set log level (trace, debug, info, warn, error)");
}

fn parse_settings(args: &[String]) -> std::result::Result<Settings, String> {
    let mut settings: Settings = HashMap::new();
    for arg in args {
        match arg.split_once('=') {
            Some((key, value)) => {
                settings.insert(key.to_string(), value.to_string());
            }
            None => return Err(format!("Expected key=value, got: {arg}")),
        }
    }
    Ok(settings)
}

fn run(
    command: &str,
    args: &[String],
    config_path: Option<PathBuf>,
) -> Result<std::result::Result<(), String>> {
    let cfg = match config_path {
        Some(path) => NetConfig::with_interfaces_config(path),
        None => NetConfig::default(),
    };
    let reconciler = Reconciler::new(cfg, ConnmanDbus::system()?, SysfsProbe::default(), Systemctl);

    let need = |n: usize| -> std::result::Result<(), String> {
        if args.len() < n {
            Err(format!("Missing argument(s) for '{command}'"))
        } else {
            Ok(())
        }
    };

    match command {
        "list" => {
            let details = reconciler.interfaces_details()?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        "show" => {
            let text = args.iter().any(|a| a == "--text");
            let rest: Vec<&String> = args.iter().filter(|a| a.as_str() != "--text").collect();
            let Some(iface) = rest.first() else {
                return Ok(Err(format!("Missing argument(s) for '{command}'")));
            };
            let info = reconciler.interface_details(iface)?;
            if text {
                println!("{info}");
            } else {
                println!("{}", serde_json::to_string_pretty(&info)?);
            }
        }
        "up" | "enable" => {
            if let Err(e) = need(1) {
                return Ok(Err(e));
            }
            println!("{}", reconciler.up(&args[0])?);
        }
        "down" | "disable" => {
            if let Err(e) = need(1) {
                return Ok(Err(e));
            }
            println!("{}", reconciler.down(&args[0])?);
        }
        "set-dhcp" => {
            if let Err(e) = need(1) {
                return Ok(Err(e));
            }
            println!("{}", reconciler.set_dhcp_linklocal(&args[0])?);
        }
        "set-static" => {
            if let Err(e) = need(4) {
                return Ok(Err(e));
            }
            let nameservers: Vec<String> = args[4..].to_vec();
            println!(
                "{}",
                reconciler.set_static(&args[0], &args[1], &args[2], &args[3], &nameservers)?
            );
        }
        "build" => {
            if let Err(e) = need(3) {
                return Ok(Err(e));
            }
            let enable = match args[2].as_str() {
                "on" => true,
                "off" => false,
                other => return Ok(Err(format!("Expected on|off, got: {other}"))),
            };
            let settings = match parse_settings(&args[3..]) {
                Ok(s) => s,
                Err(e) => return Ok(Err(e)),
            };
            let info = reconciler.build_interface(&args[0], &args[1], enable, &settings)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        "technologies" => {
            print!("{}", reconciler.technologies()?);
        }
        "settings-get" => {
            let settings = reconciler.get_network_settings()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        "settings-build" => {
            let settings = match parse_settings(args) {
                Ok(s) => s,
                Err(e) => return Ok(Err(e)),
            };
            for change in reconciler.build_network_settings(&settings)? {
                println!("{change}");
            }
        }
        "settings-apply" => {
            let settings = match parse_settings(args) {
                Ok(s) => s,
                Err(e) => return Ok(Err(e)),
            };
            println!("{}", reconciler.apply_network_settings(&settings)?);
        }
        other => return Ok(Err(format!("Unknown command: {other}"))),
    }
    Ok(Ok(()))
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut debug_mode = false;
    let mut config_path: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            "-v" | "--version" => {
                print_version();
                return ExitCode::SUCCESS;
            }
            "-d" | "--debug" => {
                debug_mode = true;
            }
            "--config" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config_path = Some(PathBuf::from(path)),
                    None => {
                        eprintln!("--config requires a path argument");
                        return ExitCode::from(2);
                    }
                }
            }
            _ => {
                // everything after the command is the command's to parse
                positional.extend(args[i..].iter().cloned());
                break;
            }
        }
        i += 1;
    }

    let log_level = if debug_mode {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some((command, rest)) = positional.split_first() else {
        print_help();
        return ExitCode::from(2);
    };

    match run(command, rest, config_path) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(usage)) => {
            eprintln!("{usage}");
            eprintln!("Try '--help' for more information.");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
