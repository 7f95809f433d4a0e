//! Signal tower detection and acquisition.

use std::time::Duration;

use rusb::{DeviceHandle, Direction, GlobalContext, TransferType, UsbContext};
use tracing::{debug, info};

use crate::error::{TowerError, TowerResult};
use crate::transport::CommandEndpoint;

/// Signal tower USB Vendor ID
pub const VENDOR_ID: u16 = 0x191a;
/// Signal tower USB Product ID
pub const PRODUCT_ID: u16 = 0x8003;
/// Host-to-device command endpoint
pub const ENDPOINT_ADDRESS: u8 = 0x01;
/// Interface carrying the command endpoint
pub const COMMAND_INTERFACE: u8 = 0;
/// Default bound on a command write
pub const SEND_TIMEOUT: Duration = Duration::from_millis(1000);

/// Which device to open and where its command endpoint lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSelector {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: u8,
    pub endpoint: u8,
}

impl Default for DeviceSelector {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            interface: COMMAND_INTERFACE,
            endpoint: ENDPOINT_ADDRESS,
        }
    }
}

impl DeviceSelector {
    fn matches(&self, desc: &rusb::DeviceDescriptor) -> bool {
        desc.vendor_id() == self.vendor_id && desc.product_id() == self.product_id
    }
}

/// A tower seen on the bus, not opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerInfo {
    pub bus: u8,
    pub address: u8,
    /// Serial number, if the device exposes one and it could be read
    pub serial: Option<String>,
}

/// An opened, configured signal tower.
pub struct TowerDevice {
    handle: DeviceHandle<GlobalContext>,
    transfer_type: TransferType,
}

impl TowerDevice {
    /// Open the first tower matching `selector`.
    ///
    /// On Linux any kernel driver bound to the command interface is detached
    /// first. The device's first configuration is selected and the command
    /// interface claimed.
    ///
    /// # Errors
    /// - `DeviceNotFound` if no matching device is attached.
    /// - `PermissionDenied` if the device cannot be opened.
    /// - `EndpointNotFound` if the configuration lacks the command endpoint.
    pub fn open(selector: &DeviceSelector) -> TowerResult<Self> {
        let device = find_device(selector)?.ok_or(TowerError::DeviceNotFound)?;
        let mut handle = device.open().map_err(TowerError::from_open)?;

        detach_kernel_driver(&mut handle, selector.interface)?;

        let config = device.config_descriptor(0)?;
        handle.set_active_configuration(config.number())?;
        handle.claim_interface(selector.interface)?;

        let transfer_type = out_endpoint_transfer_type(&config, selector.endpoint)
            .ok_or(TowerError::EndpointNotFound(selector.endpoint))?;

        info!(
            bus = device.bus_number(),
            address = device.address(),
            endpoint = selector.endpoint,
            ?transfer_type,
            "Signal tower opened"
        );

        Ok(Self { handle, transfer_type })
    }

    /// Transfer type used for command writes.
    #[must_use]
    pub fn transfer_type(&self) -> TransferType {
        self.transfer_type
    }
}

impl CommandEndpoint for TowerDevice {
    fn write(&mut self, address: u8, data: &[u8], timeout: Duration) -> rusb::Result<usize> {
        match self.transfer_type {
            TransferType::Interrupt => self.handle.write_interrupt(address, data, timeout),
            _ => self.handle.write_bulk(address, data, timeout),
        }
    }

    fn reset(&mut self) -> rusb::Result<()> {
        self.handle.reset()
    }
}

/// Detach any kernel driver bound to `interface`.
#[cfg(target_os = "linux")]
fn detach_kernel_driver(handle: &mut DeviceHandle<GlobalContext>, interface: u8) -> TowerResult<()> {
    if handle.kernel_driver_active(interface)? {
        debug!(interface, "Detaching kernel driver");
        handle.detach_kernel_driver(interface)?;
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn detach_kernel_driver(_handle: &mut DeviceHandle<GlobalContext>, _interface: u8) -> TowerResult<()> {
    Ok(())
}

/// Locate the first device matching `selector`.
fn find_device(selector: &DeviceSelector) -> TowerResult<Option<rusb::Device<GlobalContext>>> {
    let devices = rusb::devices().map_err(TowerError::from_open)?;

    for device in devices.iter() {
        let Ok(desc) = device.device_descriptor() else {
            continue;
        };
        if selector.matches(&desc) {
            return Ok(Some(device));
        }
    }

    debug!(vendor_id = selector.vendor_id, product_id = selector.product_id, "No signal tower found");
    Ok(None)
}

/// Find the transfer type of OUT endpoint `address` in `config`.
fn out_endpoint_transfer_type(config: &rusb::ConfigDescriptor, address: u8) -> Option<TransferType> {
    for interface in config.interfaces() {
        for alt in interface.descriptors() {
            for ep in alt.endpoint_descriptors() {
                if ep.address() == address && ep.direction() == Direction::Out {
                    return Some(ep.transfer_type());
                }
            }
        }
    }
    None
}

/// List every attached tower matching `selector`.
///
/// # Errors
/// Returns an error if USB enumeration fails.
pub fn find_towers(selector: &DeviceSelector) -> TowerResult<Vec<TowerInfo>> {
    let devices = rusb::devices().map_err(TowerError::from_open)?;
    let mut towers = Vec::new();

    for device in devices.iter() {
        let Ok(desc) = device.device_descriptor() else {
            continue;
        };
        if !selector.matches(&desc) {
            continue;
        }

        let serial = read_serial(&device, &desc);
        debug!(bus = device.bus_number(), address = device.address(), ?serial, "Signal tower detected");
        towers.push(TowerInfo { bus: device.bus_number(), address: device.address(), serial });
    }

    Ok(towers)
}

/// Get the serial number from a USB device.
fn read_serial<T: UsbContext>(device: &rusb::Device<T>, desc: &rusb::DeviceDescriptor) -> Option<String> {
    desc.serial_number_string_index()?;
    let handle = device.open().ok()?;
    handle.read_serial_number_string_ascii(desc).ok()
}

/// Check if a signal tower is currently connected.
#[must_use]
pub fn is_tower_connected(selector: &DeviceSelector) -> bool {
    let Ok(devices) = rusb::devices() else {
        return false;
    };

    devices
        .iter()
        .any(|device| device.device_descriptor().is_ok_and(|desc| selector.matches(&desc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selector() {
        let selector = DeviceSelector::default();
        assert_eq!(selector.vendor_id, 0x191a);
        assert_eq!(selector.product_id, 0x8003);
        assert_eq!(selector.interface, 0);
        assert_eq!(selector.endpoint, 0x01);
    }

    #[test]
    fn test_send_timeout() {
        assert_eq!(SEND_TIMEOUT.as_millis(), 1000);
    }
}
