//! `devclass classify` and `devclass ap-matrix` commands

use anyhow::Result;
use devclass_core::vfio::resolve_sysfs_dev;
use devclass_core::{DeviceClassifier, VfioDeviceType};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Serialize)]
struct ClassifyReport {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_type: Option<VfioDeviceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Classify each path. Fails if any of them could not be classified.
pub fn classify(classifier: &DeviceClassifier, paths: &[PathBuf], json: bool) -> Result<()> {
    let reports: Vec<ClassifyReport> = paths
        .iter()
        .map(|path| match classifier.classify_vfio_device(path) {
            Ok(device_type) => {
                ClassifyReport { path: path.clone(), device_type: Some(device_type), error: None }
            }
            Err(e) => {
                ClassifyReport { path: path.clone(), device_type: None, error: Some(e.to_string()) }
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("{:<14} {}", "TYPE", "PATH");
        println!("{}", "-".repeat(60));
        for report in &reports {
            match (&report.device_type, &report.error) {
                (Some(device_type), _) => {
                    println!("{:<14} {}", device_type.to_string(), report.path.display())
                }
                (None, Some(error)) => {
                    println!("{:<14} {} ({})", "error", report.path.display(), error)
                }
                (None, None) => {}
            }
        }
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} device(s) could not be classified", failed, reports.len());
    }

    Ok(())
}

/// Print one APQN per line.
pub fn ap_matrix(classifier: &DeviceClassifier, device: &Path) -> Result<()> {
    let sysfs_dev = resolve_sysfs_dev(device)?;

    match classifier.classify_vfio_device(device) {
        Ok(VfioDeviceType::MediatedAp) => {}
        Ok(device_type) => {
            warn!(device = ?device, device_type = %device_type, "Not a VFIO-AP mediated device")
        }
        Err(e) => warn!(device = ?device, error = %e, "Could not classify device"),
    }

    for apqn in classifier.ap_devices(&sysfs_dev)? {
        println!("{}", apqn);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use devclass_core::ClassifierConfig;

    #[test]
    fn test_classify_fails_when_any_path_fails() {
        let classifier = DeviceClassifier::new(ClassifierConfig::with_sysfs_root("/nonexistent"));
        let valid = PathBuf::from("/nonexistent/kernel/iommu_groups/1/devices/0000:04:00.0");
        let invalid = PathBuf::from("/nonexistent/kernel/iommu_groups/1/devices/not-a-valid-name");

        assert!(classify(&classifier, &[valid.clone()], false).is_ok());

        let err = classify(&classifier, &[valid, invalid], true).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
    }
}
