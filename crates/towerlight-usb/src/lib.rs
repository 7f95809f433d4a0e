//! Towerlight USB - hardware access for USB stacked signal towers.
//!
//! Commands are fire-and-forget: each one is a single 8-byte write to the
//! command endpoint, always followed by a device reset. Nothing is read back.
//!
//! [`TowerDevice`] acquires the physical device. [`SignalTower`] borrows any
//! [`CommandEndpoint`] and exposes the five tower commands.

pub mod device;
pub mod error;
pub mod tower;
pub mod transport;

pub use device::{DeviceSelector, TowerDevice, TowerInfo, find_towers, is_tower_connected};
pub use error::{TowerError, TowerResult};
pub use tower::SignalTower;
pub use transport::{CommandEndpoint, Transport, TransportSettings, WriteCountCorrection};
