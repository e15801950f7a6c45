//! PCI address and mediated device name handling.

use crate::error::{DevclassError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// PCI address with an optional domain: `0000:01:00.0` or `01:00.0`.
static PCI_ADDRESS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([0-9a-fA-F]{4,8}):)?([0-9a-fA-F]{2}):([0-9a-fA-F]{2})\.([0-7])$")
        .expect("Invalid PCI address regex")
});

/// Hyphenated mdev UUID: 83b8f4f2-509f-382f-3c1e-e6bfe0fa1001
static MDEV_UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .expect("Invalid mdev UUID regex")
});

/// Highest device number on a PCI bus (5 bits).
const MAX_PCI_DEVICE: u8 = 0x1f;

/// Qualify a BDF with `default_domain` if it was given without one.
///
/// Only the segment count is looked at. Anything that is neither
/// `bus:device.function` nor `domain:bus:device.function` comes back unchanged
/// and will simply not be found in sysfs.
pub fn normalize_bdf(bdf: &str, default_domain: &str) -> String {
    if bdf.split(':').count() == 2 {
        format!("{}:{}", default_domain, bdf)
    } else {
        bdf.to_string()
    }
}

/// Validate a domain-qualified PCI address.
pub fn is_valid_pci_address(address: &str) -> bool {
    matches!(parse_address(address), Some((Some(_), _)))
}

/// A parsed PCI function address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PciAddress {
    pub domain: u32,
    pub bus: u8,
    pub device: u8,
    pub function: u8,
}

impl PciAddress {
    pub fn new(domain: u32, bus: u8, device: u8, function: u8) -> Self {
        Self { domain, bus, device, function }
    }
}

impl fmt::Display for PciAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:02x}:{:02x}.{:x}", self.domain, self.bus, self.device, self.function)
    }
}

impl FromStr for PciAddress {
    type Err = DevclassError;

    /// Parses `domain:bus:device.function`; a missing domain means domain 0.
    fn from_str(s: &str) -> Result<Self> {
        parse_address(s)
            .map(|(_, address)| address)
            .ok_or_else(|| DevclassError::InvalidPciAddress { address: s.to_string() })
    }
}

/// Returns the domain as written (if any) alongside the parsed address.
fn parse_address(s: &str) -> Option<(Option<&str>, PciAddress)> {
    let caps = PCI_ADDRESS_REGEX.captures(s)?;
    let domain_str = caps.get(1).map(|m| m.as_str());

    let domain = match domain_str {
        Some(d) => u32::from_str_radix(d, 16).ok()?,
        None => 0,
    };
    let bus = u8::from_str_radix(&caps[2], 16).ok()?;
    let device = u8::from_str_radix(&caps[3], 16).ok()?;
    let function = u8::from_str_radix(&caps[4], 16).ok()?;

    if device > MAX_PCI_DEVICE {
        return None;
    }

    Some((domain_str, PciAddress { domain, bus, device, function }))
}

/// What a device file's base name identifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLocator {
    /// `0000:04:00.0`, a PCI function bound to vfio-pci.
    PciAddress(PciAddress),
    /// `83b8f4f2-509f-382f-3c1e-e6bfe0fa1001`, a mediated device instance.
    MediatedUuid(Uuid),
    /// Neither naming convention.
    Unrecognized(String),
}

/// Parse a device file name.
///
/// PCI addresses must carry their domain here: VFIO device nodes are always
/// named by the full address.
pub fn parse_locator(name: &str) -> ParsedLocator {
    if let Some((Some(_), address)) = parse_address(name) {
        return ParsedLocator::PciAddress(address);
    }

    if MDEV_UUID_REGEX.is_match(name) {
        if let Ok(uuid) = Uuid::parse_str(name) {
            return ParsedLocator::MediatedUuid(uuid);
        }
    }

    ParsedLocator::Unrecognized(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bdf() {
        assert_eq!(normalize_bdf("04:00.0", "0000"), "0000:04:00.0");
        assert_eq!(normalize_bdf("ff:1f.7", "0000"), "0000:ff:1f.7");
        assert_eq!(normalize_bdf("04:00.0", "0001"), "0001:04:00.0");

        // Already qualified
        assert_eq!(normalize_bdf("0000:04:00.0", "0000"), "0000:04:00.0");
        assert_eq!(normalize_bdf("0002:04:00.0", "0000"), "0002:04:00.0");

        // Malformed input passes through
        assert_eq!(normalize_bdf("garbage", "0000"), "garbage");
        assert_eq!(normalize_bdf("a:b:c:d", "0000"), "a:b:c:d");
    }

    #[test]
    fn test_pci_address_validation() {
        assert!(is_valid_pci_address("0000:01:00.0"));
        assert!(is_valid_pci_address("0000:ff:1f.7"));
        assert!(is_valid_pci_address("ABCD:12:14.5"));
        assert!(is_valid_pci_address("10000:00:02.0"));

        assert!(!is_valid_pci_address("01:00.0")); // Missing domain
        assert!(!is_valid_pci_address("0000:01:00")); // Missing function
        assert!(!is_valid_pci_address("0000:01:00.8")); // Invalid function (max 7)
        assert!(!is_valid_pci_address("0000:01:20.0")); // Invalid device (max 1f)
        assert!(!is_valid_pci_address("invalid"));
    }

    #[test]
    fn test_pci_address_from_str() {
        let addr: PciAddress = "0000:04:00.1".parse().unwrap();
        assert_eq!(addr, PciAddress::new(0, 4, 0, 1));

        let short: PciAddress = "04:00.1".parse().unwrap();
        assert_eq!(short, addr);

        let err = "04:00".parse::<PciAddress>().unwrap_err();
        assert!(matches!(err, DevclassError::InvalidPciAddress { .. }));
    }

    #[test]
    fn test_pci_address_display() {
        let addr: PciAddress = "ABCD:0A:1F.7".parse().unwrap();
        assert_eq!(addr.to_string(), "abcd:0a:1f.7");
        assert_eq!(PciAddress::new(0, 4, 0, 0).to_string(), "0000:04:00.0");
    }

    #[test]
    fn test_parse_locator() {
        assert_eq!(
            parse_locator("0000:04:00.0"),
            ParsedLocator::PciAddress(PciAddress::new(0, 4, 0, 0))
        );

        match parse_locator("83b8f4f2-509f-382f-3c1e-e6bfe0fa1001") {
            ParsedLocator::MediatedUuid(uuid) => {
                assert_eq!(uuid.to_string(), "83b8f4f2-509f-382f-3c1e-e6bfe0fa1001")
            }
            other => panic!("expected mediated UUID, got {:?}", other),
        }

        assert_eq!(
            parse_locator("not-a-valid-name"),
            ParsedLocator::Unrecognized("not-a-valid-name".to_string())
        );
        // Domain-less addresses are not device file names
        assert!(matches!(parse_locator("04:00.0"), ParsedLocator::Unrecognized(_)));
        // Five tokens but not hex
        assert!(matches!(
            parse_locator("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz"),
            ParsedLocator::Unrecognized(_)
        ));
        assert!(matches!(parse_locator(""), ParsedLocator::Unrecognized(_)));
    }
}
