//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use towerlight_usb::device::{COMMAND_INTERFACE, ENDPOINT_ADDRESS, PRODUCT_ID, SEND_TIMEOUT, VENDOR_ID};
use towerlight_usb::{DeviceSelector, TransportSettings, WriteCountCorrection};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Device settings
    #[serde(default)]
    pub device: DeviceConfig,
    /// File the settings were read from; `None` when defaults were used
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when `RUST_LOG` is unset and no `-v` is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// How to correct the byte count reported by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionSetting {
    /// Pick by host platform
    #[default]
    Auto,
    Exact,
    ReportsOneExtra,
}

impl From<CorrectionSetting> for WriteCountCorrection {
    fn from(setting: CorrectionSetting) -> Self {
        match setting {
            CorrectionSetting::Auto => Self::host(),
            CorrectionSetting::Exact => Self::Exact,
            CorrectionSetting::ReportsOneExtra => Self::ReportsOneExtra,
        }
    }
}

/// Device settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// USB Vendor ID
    #[serde(default = "default_vid")]
    pub vendor_id: String,
    /// USB Product ID
    #[serde(default = "default_pid")]
    pub product_id: String,
    /// Command endpoint address
    #[serde(default = "default_endpoint")]
    pub endpoint: u8,
    /// Interface carrying the command endpoint
    #[serde(default = "default_interface")]
    pub interface: u8,
    /// Write timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Byte count correction
    #[serde(default)]
    pub write_correction: CorrectionSetting,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: default_vid(),
            product_id: default_pid(),
            endpoint: default_endpoint(),
            interface: default_interface(),
            timeout_ms: default_timeout_ms(),
            write_correction: CorrectionSetting::default(),
        }
    }
}

fn default_vid() -> String {
    format!("{VENDOR_ID:04x}")
}

fn default_pid() -> String {
    format!("{PRODUCT_ID:04x}")
}

fn default_endpoint() -> u8 {
    ENDPOINT_ADDRESS
}

fn default_interface() -> u8 {
    COMMAND_INTERFACE
}

fn default_timeout_ms() -> u64 {
    u64::try_from(SEND_TIMEOUT.as_millis()).unwrap_or(1000)
}

impl DeviceConfig {
    /// Device selector built from these settings.
    ///
    /// # Errors
    /// Returns an error if either USB id is not a 16-bit hex number.
    pub fn selector(&self) -> Result<DeviceSelector> {
        Ok(DeviceSelector {
            vendor_id: parse_usb_id(&self.vendor_id).context("Invalid device.vendor_id")?,
            product_id: parse_usb_id(&self.product_id).context("Invalid device.product_id")?,
            interface: self.interface,
            endpoint: self.endpoint,
        })
    }

    #[must_use]
    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            endpoint: self.endpoint,
            timeout: Duration::from_millis(self.timeout_ms),
            correction: self.write_correction.into(),
        }
    }
}

/// Parse a USB id written as hex, with or without `0x`.
fn parse_usb_id(s: &str) -> Result<u16> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("expected 1-4 hex digits, got {s:?}");
    }
    u16::from_str_radix(digits, 16).with_context(|| format!("not a hex number: {s:?}"))
}

/// Load configuration from `path`, or from the default location.
///
/// An explicit path must exist. A missing default file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {config_path:?}"))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {config_path:?}"))?;
    config.device.selector()?;
    if config.device.timeout_ms == 0 {
        bail!("Invalid device.timeout_ms in {config_path:?}: must be at least 1 (0 never times out)");
    }
    config.source = Some(config_path);
    Ok(config)
}

/// Get the configuration file path.
fn config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "towerlight", "Towerlight")
        .context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.general.log_level, "warn");

        let selector = config.device.selector().unwrap();
        assert_eq!(selector, DeviceSelector::default());

        let settings = config.device.transport_settings();
        assert_eq!(settings, TransportSettings::default());
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"
[device]
product_id = "0x8004"
timeout_ms = 250
write_correction = "reports-one-extra"
"#,
        );

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.general.log_level, "warn");

        let selector = config.device.selector().unwrap();
        assert_eq!(selector.vendor_id, 0x191a);
        assert_eq!(selector.product_id, 0x8004);

        let settings = config.device.transport_settings();
        assert_eq!(settings.timeout, Duration::from_millis(250));
        assert_eq!(settings.correction, WriteCountCorrection::ReportsOneExtra);
    }

    #[test]
    fn test_load_rejects_bad_id() {
        let file = write_config("[device]\nvendor_id = \"zz\"\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("vendor_id"));
    }

    #[test]
    fn test_load_rejects_unknown_correction() {
        let file = write_config("[device]\nwrite_correction = \"sometimes\"\n");
        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let file = write_config("[device]\ntimeout_ms = 0\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("timeout_ms"));
    }

    #[test]
    fn test_load_records_source() {
        let file = write_config("[general]\nlog_level = \"debug\"\n");
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.source.as_deref(), Some(file.path()));
        assert!(Config::default().source.is_none());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_parse_usb_id() {
        assert_eq!(parse_usb_id("191a").unwrap(), 0x191a);
        assert_eq!(parse_usb_id("0x8003").unwrap(), 0x8003);
        assert!(parse_usb_id("").is_err());
        assert!(parse_usb_id("12345").is_err());
        assert!(parse_usb_id("0x0x191a").is_err());
        assert!(parse_usb_id("+191").is_err());
        assert!(parse_usb_id("0x").is_err());
    }

    #[test]
    fn test_auto_correction_follows_host() {
        assert_eq!(WriteCountCorrection::from(CorrectionSetting::Auto), WriteCountCorrection::host());
    }
}
