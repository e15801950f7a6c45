//! Classification of PCI and VFIO devices from sysfs.
//!
//! Nothing here opens or binds a device. Everything is derived from path
//! names, file sizes and symlink targets under sysfs, and every call re-reads
//! the filesystem.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DeviceClassifier                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  classify_vfio_device() - NormalPci / MediatedAp / Mediated │
//! │  ├── parse_locator()     - PCI address | UUID | unknown     │
//! │  └── resolve_sysfs_dev() - only for mediated UUID names     │
//! │                                                             │
//! │  is_express()            - config space size > 256 bytes    │
//! │  device_property()       - first line of a sysfs attribute  │
//! │  ap_devices()            - APQNs of a VFIO-AP mdev          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Failure policy
//!
//! - **Soft**: property reads and the PCI-Express check return a [`Probe`]
//!   holding a fallback value and the fault. The caller decides whether to log.
//! - **Hard**: unrecognized device names, unresolvable mediated-device links
//!   and unreadable AP matrices are returned as errors.
//!
//! # Usage
//!
//! ```rust,ignore
//! use devclass_core::vfio::{DeviceClassifier, VfioDeviceType};
//!
//! let classifier = DeviceClassifier::default();
//!
//! match classifier.classify_vfio_device("/sys/kernel/iommu_groups/3/devices/0000:01:00.0")? {
//!     VfioDeviceType::NormalPci => { /* vfio-pci passthrough */ }
//!     VfioDeviceType::MediatedAp => { /* assign APQNs */ }
//!     VfioDeviceType::MediatedPci => { /* generic mdev */ }
//! }
//!
//! let pcie = classifier.is_express("04:00.0").value_or_warn("04:00.0");
//! ```

mod ap;
mod classify;
mod express;
mod locator;
mod probe;
mod property;

pub use ap::{ap_devices, MATRIX_FILE};
pub use classify::{resolve_sysfs_dev, DeviceClassifier, VfioDeviceType};
pub use express::{config_space_exceeds, CONFIG_SPACE_FILE};
pub use locator::{is_valid_pci_address, normalize_bdf, parse_locator, ParsedLocator, PciAddress};
pub use probe::Probe;
pub use property::{bus_speed_is_express, read_property, PciProperty, SysfsTree};
