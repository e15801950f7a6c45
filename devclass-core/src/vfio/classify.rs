//! VFIO device type classification.

use crate::config::ClassifierConfig;
use crate::error::{DevclassError, Result};
use crate::vfio::ap::ap_devices;
use crate::vfio::locator::{normalize_bdf, parse_locator, ParsedLocator};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a VFIO device node has to be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VfioDeviceType {
    /// A PCI function bound to vfio-pci, named by its address.
    NormalPci,
    /// A VFIO-AP mediated device (s390 crypto adapter queues).
    MediatedAp,
    /// Any other mediated device.
    MediatedPci,
}

impl fmt::Display for VfioDeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NormalPci => "normal-pci",
            Self::MediatedAp => "mediated-ap",
            Self::MediatedPci => "mediated-pci",
        };
        f.write_str(s)
    }
}

/// Resolve a mediated device node to its sysfs device directory.
///
/// Mediated devices show up in IOMMU groups as links, e.g.
/// `/sys/kernel/iommu_groups/0/devices/f79944e4-5a3d-11e8-99ce-479cbab002e4`,
/// pointing into the parent driver's subtree. Every link on the way is followed.
pub fn resolve_sysfs_dev(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path)
        .map_err(|e| DevclassError::SymlinkResolution { path: path.to_path_buf(), source: e })
}

/// Classifies host devices for passthrough.
///
/// Holds no state besides its configuration; every call goes back to sysfs.
#[derive(Debug, Clone, Default)]
pub struct DeviceClassifier {
    config: ClassifierConfig,
}

impl DeviceClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Qualify a BDF with the configured default domain.
    pub fn normalize_bdf(&self, bdf: &str) -> String {
        normalize_bdf(bdf, &self.config.default_domain)
    }

    /// Work out the device type behind a VFIO device path.
    ///
    /// # Decision
    ///
    /// 1. Base name is a PCI address (`0000:04:00.0`): `NormalPci`, no
    ///    filesystem access.
    /// 2. Base name is neither a PCI address nor a mediated device UUID: error.
    /// 3. UUID: the path is resolved; a target under the VFIO-AP subtree is
    ///    `MediatedAp`, anything else `MediatedPci`. An unresolvable link is an
    ///    error.
    pub fn classify_vfio_device(&self, device_path: impl AsRef<Path>) -> Result<VfioDeviceType> {
        let device_path = device_path.as_ref();
        let name = device_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let device_type = match parse_locator(&name) {
            ParsedLocator::PciAddress(_) => VfioDeviceType::NormalPci,
            ParsedLocator::Unrecognized(name) => {
                return Err(DevclassError::UnrecognizedDeviceName { name });
            }
            ParsedLocator::MediatedUuid(uuid) => {
                let sysfs_dev = resolve_sysfs_dev(device_path)?;
                let device_type = if sysfs_dev.starts_with(self.vfio_ap_root()) {
                    VfioDeviceType::MediatedAp
                } else {
                    VfioDeviceType::MediatedPci
                };
                debug!(uuid = %uuid, sysfs_dev = ?sysfs_dev, "Resolved mediated device");
                device_type
            }
        };

        debug!(path = ?device_path, device_type = %device_type, "Classified VFIO device");

        Ok(device_type)
    }

    /// The VFIO-AP subtree in the same resolved form as a mediated device link.
    ///
    /// Falls back to the configured path when it cannot be resolved.
    fn vfio_ap_root(&self) -> PathBuf {
        fs::canonicalize(&self.config.vfio_ap_dir)
            .unwrap_or_else(|_| self.config.vfio_ap_dir.clone())
    }

    /// APQNs assigned to the VFIO-AP mediated device at `sysfs_dev`.
    pub fn ap_devices(&self, sysfs_dev: &Path) -> Result<Vec<String>> {
        ap_devices(sysfs_dev)
    }
}
