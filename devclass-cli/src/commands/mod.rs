//! CLI command implementations

pub mod config;
pub mod pci;
pub mod vfio;
