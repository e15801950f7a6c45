//! Classifier configuration.

use crate::error::{DevclassError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Domain assumed for a BDF given without one.
pub const DEFAULT_PCI_DOMAIN: &str = "0000";

/// Size of the conventional PCI configuration space in bytes.
pub const PCI_CONFIG_SPACE_SIZE: u64 = 256;

/// Marker the kernel puts in `max_bus_speed` for PCI-Express slots.
pub const PCIE_KEYWORD: &str = "PCIe";

/// Locations and constants the classifier reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub pci_devices_dir: PathBuf,
    pub pci_slots_dir: PathBuf,
    pub vfio_ap_dir: PathBuf,
    pub default_domain: String,
    pub config_space_size: u64,
    pub pcie_keyword: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::with_sysfs_root(paths::sysfs_root())
    }
}

impl ClassifierConfig {
    /// Build a configuration with every sysfs directory under `root`.
    pub fn with_sysfs_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            pci_devices_dir: paths::pci_devices_dir(root),
            pci_slots_dir: paths::pci_slots_dir(root),
            vfio_ap_dir: paths::vfio_ap_dir(root),
            default_domain: DEFAULT_PCI_DOMAIN.to_string(),
            config_space_size: PCI_CONFIG_SPACE_SIZE,
            pcie_keyword: PCIE_KEYWORD.to_string(),
        }
    }

    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| DevclassError::InvalidConfig {
            reason: format!("Failed to read config {}: {}", path.display(), e),
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| DevclassError::InvalidConfig {
                reason: format!("Failed to parse config {}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the classifier cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.default_domain.is_empty() || self.default_domain.contains(':') {
            return Err(DevclassError::InvalidConfig {
                reason: format!("default_domain {:?} is not a PCI domain", self.default_domain),
            });
        }
        if self.config_space_size == 0 {
            return Err(DevclassError::InvalidConfig {
                reason: "config_space_size must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}
