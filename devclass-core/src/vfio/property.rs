//! Text attributes under the PCI sysfs trees.

use crate::error::{DevclassError, Result};
use crate::vfio::classify::DeviceClassifier;
use crate::vfio::locator::normalize_bdf;
use crate::vfio::probe::Probe;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// The two PCI trees attributes are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysfsTree {
    /// `/sys/bus/pci/devices`, keyed by BDF.
    Devices,
    /// `/sys/bus/pci/slots`, keyed by slot name.
    Slots,
}

/// Well-known PCI sysfs attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PciProperty {
    /// `devices/<bdf>/class`
    Class,
    /// `slots/<slot>/address`
    SlotAddress,
    /// `slots/<slot>/max_bus_speed`
    MaxBusSpeed,
    /// Any other attribute file, read from the devices tree.
    Other(String),
}

impl PciProperty {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Class => "class",
            Self::SlotAddress => "address",
            Self::MaxBusSpeed => "max_bus_speed",
            Self::Other(name) => name,
        }
    }

    /// Which tree the attribute lives in.
    pub fn tree(&self) -> SysfsTree {
        match self {
            Self::SlotAddress | Self::MaxBusSpeed => SysfsTree::Slots,
            Self::Class | Self::Other(_) => SysfsTree::Devices,
        }
    }
}

impl From<&str> for PciProperty {
    fn from(name: &str) -> Self {
        match name {
            "class" => Self::Class,
            "address" => Self::SlotAddress,
            "max_bus_speed" => Self::MaxBusSpeed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PciProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read the first line of a sysfs attribute file.
///
/// Attribute files hold one newline-terminated value; anything after the
/// first newline is ignored. The value is returned as is, not validated.
pub fn read_property(path: &Path) -> Result<String> {
    let content = fs::read(path)
        .map_err(|e| DevclassError::PropertyRead { path: path.to_path_buf(), source: e })?;
    let content = String::from_utf8_lossy(&content);

    Ok(content.split('\n').next().unwrap_or_default().to_string())
}

/// Whether a slot's `max_bus_speed` describes a PCI-Express link.
pub fn bus_speed_is_express(speed: &str, keyword: &str) -> bool {
    speed.contains(keyword)
}

impl DeviceClassifier {
    /// Read `<pci-devices>/<bdf>/<property>`.
    ///
    /// A domain-less BDF is qualified first. Read failures give an empty,
    /// degraded value.
    pub fn device_property(&self, bdf: &str, property: &str) -> Probe<String> {
        let bdf = normalize_bdf(bdf, &self.config().default_domain);
        let path = self.config().pci_devices_dir.join(&bdf).join(property);
        probe_property(&path)
    }

    /// Read `<pci-slots>/<slot>/<property>`.
    pub fn slot_property(&self, slot: &str, property: &str) -> Probe<String> {
        let path = self.config().pci_slots_dir.join(slot).join(property);
        probe_property(&path)
    }

    /// Read a well-known attribute from whichever tree holds it.
    ///
    /// `id` is a BDF for device attributes and a slot name for slot attributes.
    pub fn pci_property(&self, id: &str, property: &PciProperty) -> Probe<String> {
        match property.tree() {
            SysfsTree::Devices => self.device_property(id, property.as_str()),
            SysfsTree::Slots => self.slot_property(id, property.as_str()),
        }
    }

    /// Whether a slot is wired as PCI-Express, judged from `max_bus_speed`.
    ///
    /// Degrades to `false` when the attribute cannot be read.
    pub fn slot_is_express(&self, slot: &str) -> Probe<bool> {
        let (speed, fault) =
            self.slot_property(slot, PciProperty::MaxBusSpeed.as_str()).into_parts();
        match fault {
            Some(fault) => Probe::degraded(false, fault),
            None => Probe::ok(bus_speed_is_express(&speed, &self.config().pcie_keyword)),
        }
    }
}

fn probe_property(path: &Path) -> Probe<String> {
    match read_property(path) {
        Ok(value) => {
            debug!(path = ?path, value = %value, "Read PCI sysfs property");
            Probe::ok(value)
        }
        Err(e) => Probe::degraded(String::new(), e),
    }
}
