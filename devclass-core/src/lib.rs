//! devclass core library
//!
//! Classifies host PCI and VFIO devices from sysfs so a device attachment
//! layer can pick the right passthrough strategy.

pub mod config;
pub mod error;
pub mod observability;
pub mod paths;
pub mod vfio;

// Re-export commonly used items
pub use config::ClassifierConfig;
pub use error::{DevclassError, Result};
pub use observability::init as init_observability;
pub use vfio::{DeviceClassifier, ParsedLocator, PciAddress, Probe, VfioDeviceType};
