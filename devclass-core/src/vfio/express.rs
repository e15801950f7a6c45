//! PCI vs PCI-Express detection.
//!
//! Conventional PCI functions expose 256 bytes of configuration space,
//! PCI-Express functions 4096. The kernel sizes the `config` attribute to the
//! visible space, so its size alone tells the two apart.

use crate::error::{DevclassError, Result};
use crate::vfio::classify::DeviceClassifier;
use crate::vfio::locator::normalize_bdf;
use crate::vfio::probe::Probe;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration space attribute of a PCI function.
pub const CONFIG_SPACE_FILE: &str = "config";

/// Whether the file at `config_path` is larger than `threshold` bytes.
pub fn config_space_exceeds(config_path: &Path, threshold: u64) -> Result<bool> {
    let metadata = fs::metadata(config_path).map_err(|e| DevclassError::ConfigSpaceStat {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    Ok(metadata.len() > threshold)
}

impl DeviceClassifier {
    /// Whether `bdf` is a PCI-Express function.
    ///
    /// When the config space cannot be stat'ed the answer degrades to `false`.
    pub fn is_express(&self, bdf: &str) -> Probe<bool> {
        let bdf = normalize_bdf(bdf, &self.config().default_domain);
        let config_path = self.config().pci_devices_dir.join(&bdf).join(CONFIG_SPACE_FILE);

        match config_space_exceeds(&config_path, self.config().config_space_size) {
            Ok(express) => {
                debug!(address = %bdf, express = %express, "Checked PCI config space size");
                Probe::ok(express)
            }
            Err(e) => Probe::degraded(false, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use tempfile::TempDir;

    fn with_config_space(size: usize) -> (TempDir, DeviceClassifier) {
        let temp = TempDir::new().unwrap();
        let classifier = DeviceClassifier::new(ClassifierConfig::with_sysfs_root(temp.path()));
        let dev = classifier.config().pci_devices_dir.join("0000:04:00.0");
        fs::create_dir_all(&dev).unwrap();
        fs::write(dev.join(CONFIG_SPACE_FILE), vec![0u8; size]).unwrap();
        (temp, classifier)
    }

    #[test]
    fn test_conventional_pci() {
        let (_temp, classifier) = with_config_space(256);
        let probe = classifier.is_express("0000:04:00.0");
        assert!(!probe.is_degraded());
        assert!(!probe.into_value());
    }

    #[test]
    fn test_pci_express() {
        let (_temp, classifier) = with_config_space(257);
        assert!(classifier.is_express("0000:04:00.0").into_value());

        let (_temp, classifier) = with_config_space(4096);
        assert!(classifier.is_express("0000:04:00.0").into_value());
    }

    #[test]
    fn test_short_bdf_is_qualified() {
        let (_temp, classifier) = with_config_space(4096);
        assert!(classifier.is_express("04:00.0").into_value());
    }

    #[test]
    fn test_missing_config_space_is_soft() {
        let temp = TempDir::new().unwrap();
        let classifier = DeviceClassifier::new(ClassifierConfig::with_sysfs_root(temp.path()));

        let probe = classifier.is_express("0000:04:00.0");
        assert!(probe.is_degraded());
        assert!(matches!(probe.fault(), Some(DevclassError::ConfigSpaceStat { .. })));
        assert!(!probe.value_or_warn("0000:04:00.0"));
    }

    #[test]
    fn test_custom_threshold() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_SPACE_FILE);
        fs::write(&path, vec![0u8; 512]).unwrap();

        assert!(config_space_exceeds(&path, 256).unwrap());
        assert!(!config_space_exceeds(&path, 512).unwrap());
    }
}
