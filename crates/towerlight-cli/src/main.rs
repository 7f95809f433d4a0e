//! Towerlight - drive a USB stacked signal tower from the command line.
//!
//! Each invocation sends at most one command packet. The tower is opened,
//! the packet written, the device reset, and the handle released on exit.

#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use towerlight_core::CommandKind;
use towerlight_usb::{SignalTower, TowerDevice, TowerResult, find_towers, is_tower_connected};

use crate::cli::{Cli, Commands};
use crate::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref())?;
    init_logging(cli.verbose, &config.general.log_level)?;
    match &config.source {
        Some(path) => debug!(?path, ?config, "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }

    if cli.dry_run {
        print_packet(&cli);
        return Ok(());
    }

    let json = cli.json;
    match cli.command {
        Commands::Light { color, pattern } => {
            with_tower(&config, json, CommandKind::Light, |t| t.set_light(color, pattern))
        }
        Commands::Tower { red, yellow, green, blue, white } => {
            with_tower(&config, json, CommandKind::Tower, |t| t.set_tower(red, yellow, green, blue, white))
        }
        Commands::Buzzer { pattern, repeat } => {
            with_tower(&config, json, CommandKind::Buzzer, |t| t.set_buzzer(pattern, repeat))
        }
        Commands::BuzzerPitch { pattern, repeat, pitch_a, pitch_b } => {
            with_tower(&config, json, CommandKind::BuzzerWithPitch, |t| {
                t.set_buzzer_with_pitch(pattern, repeat, pitch_a, pitch_b)
            })
        }
        Commands::Reset => with_tower(&config, json, CommandKind::Reset, |t| t.reset_all()),
        Commands::Detect => detect(&config, json),
    }
}

/// Open the configured tower and run one command against it.
fn with_tower<F>(config: &Config, as_json: bool, kind: CommandKind, command: F) -> Result<()>
where
    F: FnOnce(&mut SignalTower<'_, TowerDevice>) -> TowerResult<()>,
{
    let selector = config.device.selector()?;
    let mut device = TowerDevice::open(&selector).context("Failed to open signal tower")?;
    debug!(transfer_type = ?device.transfer_type(), "Command endpoint ready");
    let mut tower = SignalTower::new(&mut device, config.device.transport_settings());

    let sent = command(&mut tower);
    if as_json {
        println!("{}", send_status(kind, &sent));
    }
    if let Err(e) = sent {
        error!(command = %kind, error = %e, "Command failed");
        return Err(e).context("failed to send data");
    }
    info!(command = %kind, "Command sent");
    Ok(())
}

/// JSON status line printed for a send under `--json`.
fn send_status(kind: CommandKind, sent: &TowerResult<()>) -> serde_json::Value {
    match sent {
        Ok(()) => json!({ "command": kind, "sent": true }),
        Err(e) => json!({ "command": kind, "sent": false, "error": e.to_string() }),
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `-v` flags raise the configured level.
fn init_logging(verbose: u8, configured: &str) -> Result<()> {
    let level = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!(
            "towerlight={level},towerlight_usb={level},towerlight_core={level}"
        ))
        .with_context(|| format!("Invalid log level: {level:?}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn print_packet(cli: &Cli) {
    let Some((kind, packet)) = cli.command.packet() else {
        println!("detect sends no packet");
        return;
    };

    if cli.json {
        println!("{}", json!({ "command": kind, "bytes": packet }));
    } else {
        println!("{kind}: {packet}");
    }
}

fn detect(config: &Config, as_json: bool) -> Result<()> {
    let selector = config.device.selector()?;

    if !as_json && !is_tower_connected(&selector) {
        println!(
            "No signal tower found ({:04x}:{:04x})",
            selector.vendor_id, selector.product_id
        );
        return Ok(());
    }

    let towers = find_towers(&selector).context("Failed to enumerate USB devices")?;

    if as_json {
        let list: Vec<_> = towers
            .iter()
            .map(|t| json!({ "bus": t.bus, "address": t.address, "serial": t.serial }))
            .collect();
        println!("{}", json!({ "connected": !towers.is_empty(), "towers": list }));
        return Ok(());
    }

    for tower in &towers {
        println!(
            "Signal tower on bus {:03} address {:03} serial {}",
            tower.bus,
            tower.address,
            tower.serial.as_deref().unwrap_or("unknown")
        );
    }
    Ok(())
}
