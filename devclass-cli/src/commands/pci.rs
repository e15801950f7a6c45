//! `devclass normalize|parse|property|slot-property|express` commands

use devclass_core::vfio::{parse_locator, ParsedLocator};
use devclass_core::DeviceClassifier;

/// Print what kind of locator a device file name is.
pub fn parse(name: &str) {
    match parse_locator(name) {
        ParsedLocator::PciAddress(addr) => {
            println!("pci-address {}", addr);
            println!(
                "  domain={:04x} bus={:02x} device={:02x} function={}",
                addr.domain, addr.bus, addr.device, addr.function
            );
        }
        ParsedLocator::MediatedUuid(uuid) => println!("mediated-uuid {}", uuid),
        ParsedLocator::Unrecognized(name) => println!("unrecognized {:?}", name),
    }
}

/// Print a device attribute. Unreadable attributes print an empty line.
pub fn property(classifier: &DeviceClassifier, bdf: &str, name: &str) {
    let value = classifier.device_property(bdf, name).value_or_warn(bdf);
    println!("{}", value);
}

/// Print a slot attribute. Unreadable attributes print an empty line.
pub fn slot_property(classifier: &DeviceClassifier, slot: &str, name: &str) {
    let value = classifier.slot_property(slot, name).value_or_warn(slot);
    println!("{}", value);
}

/// Print `pcie` or `pci`.
///
/// When sysfs cannot tell, the answer is `pci` and a warning is logged.
pub fn express(classifier: &DeviceClassifier, id: &str, slot: bool) {
    let probe = if slot { classifier.slot_is_express(id) } else { classifier.is_express(id) };
    let degraded = probe.is_degraded();

    let label = if probe.value_or_warn(id) { "pcie" } else { "pci" };
    if degraded {
        println!("{} (assumed)", label);
    } else {
        println!("{}", label);
    }
}
