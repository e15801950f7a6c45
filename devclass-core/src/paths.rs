//! Centralized sysfs path layout.
//!
//! Every sysfs location the classifier reads is derived from a single root so
//! the whole tree can be swapped for a synthetic one.

use std::path::{Path, PathBuf};

/// Environment variable overriding the sysfs mount point.
pub const SYSFS_ROOT_ENV: &str = "DEVCLASS_SYSFS_ROOT";

/// Where the kernel mounts sysfs.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys";

/// Get the sysfs root.
///
/// Resolution order:
/// 1. `DEVCLASS_SYSFS_ROOT` environment variable
/// 2. `/sys`
pub fn sysfs_root() -> PathBuf {
    sysfs_root_from(std::env::var(SYSFS_ROOT_ENV).ok())
}

/// Resolve the sysfs root from an already looked-up override.
fn sysfs_root_from(override_dir: Option<String>) -> PathBuf {
    match override_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_SYSFS_ROOT),
    }
}

/// `/sys/bus/pci/devices`
pub fn pci_devices_dir(root: &Path) -> PathBuf {
    root.join("bus").join("pci").join("devices")
}

/// `/sys/bus/pci/slots`
pub fn pci_slots_dir(root: &Path) -> PathBuf {
    root.join("bus").join("pci").join("slots")
}

/// `/sys/devices/vfio_ap`, the parent of every VFIO-AP mediated device.
pub fn vfio_ap_dir(root: &Path) -> PathBuf {
    root.join("devices").join("vfio_ap")
}
