//! VFIO-AP mediated device queues.
//!
//! A VFIO-AP mediated device is assigned crypto adapter queues (APQNs, written
//! `<adapter>.<domain>` e.g. `05.0010`). The kernel lists them in the
//! device's `matrix` attribute, one per line.

use crate::error::{DevclassError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Attribute of a VFIO-AP mediated device listing its APQNs.
pub const MATRIX_FILE: &str = "matrix";

/// Read the APQNs assigned to the mediated device at `sysfs_dev`, in file order.
///
/// An unreadable matrix is an error: an AP device without one is
/// misconfigured and must not be attached.
pub fn ap_devices(sysfs_dev: &Path) -> Result<Vec<String>> {
    let path = sysfs_dev.join(MATRIX_FILE);
    let content =
        fs::read(&path).map_err(|e| DevclassError::MatrixRead { path: path.clone(), source: e })?;
    let content = String::from_utf8_lossy(&content);

    let content = content.strip_suffix('\n').unwrap_or(&content);
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let apqns: Vec<String> = content.split('\n').map(str::to_string).collect();
    debug!(sysfs_dev = ?sysfs_dev, apqns = ?apqns, "Read AP matrix");

    Ok(apqns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_matrix(content: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MATRIX_FILE), content).unwrap();
        temp
    }

    #[test]
    fn test_matrix_in_order() {
        let temp = with_matrix("05.0010\n05.0011\n");
        assert_eq!(ap_devices(temp.path()).unwrap(), vec!["05.0010", "05.0011"]);
    }

    #[test]
    fn test_single_apqn() {
        let temp = with_matrix("0a.002f\n");
        assert_eq!(ap_devices(temp.path()).unwrap(), vec!["0a.002f"]);
    }

    #[test]
    fn test_empty_matrix() {
        let temp = with_matrix("");
        assert!(ap_devices(temp.path()).unwrap().is_empty());

        let temp = with_matrix("\n");
        assert!(ap_devices(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_trailing_newline() {
        let temp = with_matrix("05.0010\n05.0011");
        assert_eq!(ap_devices(temp.path()).unwrap(), vec!["05.0010", "05.0011"]);
    }

    #[test]
    fn test_non_utf8_matrix_is_read() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MATRIX_FILE), b"05.0010\n\xff\xfe\n").unwrap();

        let apqns = ap_devices(temp.path()).unwrap();
        assert_eq!(apqns.len(), 2);
        assert_eq!(apqns[0], "05.0010");
    }

    #[test]
    fn test_missing_matrix_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = ap_devices(temp.path()).unwrap_err();
        match err {
            DevclassError::MatrixRead { path, source } => {
                assert_eq!(path, temp.path().join(MATRIX_FILE));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
