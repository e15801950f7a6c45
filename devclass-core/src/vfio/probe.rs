//! Best-effort sysfs reads.

use crate::error::DevclassError;
use tracing::warn;

/// A value read from sysfs, or the fallback used when the read failed.
///
/// A failed read does not abort anything: the probe carries the fallback and
/// the fault, and the caller decides whether that deserves a log line.
#[derive(Debug)]
pub struct Probe<T> {
    value: T,
    fault: Option<DevclassError>,
}

impl<T> Probe<T> {
    /// A successful read.
    pub fn ok(value: T) -> Self {
        Self { value, fault: None }
    }

    /// A failed read, substituted by `fallback`.
    pub fn degraded(fallback: T, fault: DevclassError) -> Self {
        Self { value: fallback, fault: Some(fault) }
    }

    /// Whether the value is a fallback rather than what sysfs holds.
    pub fn is_degraded(&self) -> bool {
        self.fault.is_some()
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn fault(&self) -> Option<&DevclassError> {
        self.fault.as_ref()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Split into the value and the fault, if any.
    pub fn into_parts(self) -> (T, Option<DevclassError>) {
        (self.value, self.fault)
    }

    /// Take the value, logging a warning for `device` if it is a fallback.
    pub fn value_or_warn(self, device: &str) -> T {
        if let Some(fault) = &self.fault {
            warn!(
                device = %device,
                path = ?fault.path(),
                error = %fault,
                "sysfs read failed, using fallback value"
            );
        }
        self.value
    }
}
