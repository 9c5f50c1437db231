//! Device metadata snapshot.
//!
//! [`DeviceMeta`] is a lightweight, cloneable description of the device sitting in
//! a pad slot, suitable for logging and for writing new mapping lines. Backends
//! populate what they know; unknown fields stay at their defaults.
//!
//! # Conventions
//! - `bus` is a short, human-readable hint like `"evdev"`, `"xinput"` or `"virtual"`.
//! - `path` is an OS path (opaque string), e.g. `/dev/input/event7`. It is the
//!   identity the Linux backend uses to match delete notifications to slots.
//! - `bustype`/`version` are the kernel `input_id` fields when available.

use serde::{Deserialize, Serialize};

/// Snapshot of metadata describing the device behind one slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Backend classification (`"evdev"`, `"xinput"`, `"virtual"`).
    pub bus: Option<String>,

    /// Kernel bus type (`BUS_USB` = 0x03, `BUS_BLUETOOTH` = 0x05, ...), 0 if unknown.
    pub bustype: u16,

    /// Firmware/driver version word, 0 if unknown.
    pub version: u16,

    /// OS path to the device node.
    pub path: Option<String>,
}

impl DeviceMeta {
    /// Build an SDL 2.0.5+ style GUID string for this device.
    ///
    /// Each 16-bit word is written little-endian as two hex bytes followed by two
    /// zero bytes: `bus, vendor, product, version`. This is the same encoding the
    /// mapping database keys on (vendor at byte 4, product at byte 8).
    ///
    /// When vendor, product or version is unknown the name bytes are used instead,
    /// matching the community tooling's fallback.
    pub fn guid(&self, vendor: u16, product: u16, name: &str) -> String {
        if vendor != 0 && product != 0 && self.version != 0 {
            let mut out = String::with_capacity(32);
            for word in [self.bustype, vendor, product, self.version] {
                push_word(&mut out, word);
                out.push_str("0000");
            }
            return out;
        }

        let mut out = String::with_capacity(32);
        push_word(&mut out, self.bustype);
        out.push_str("0000");
        let name = name.as_bytes();
        for i in 0..11 {
            let byte = name.get(i).copied().unwrap_or(0);
            out.push_str(&format!("{byte:02x}"));
        }
        out.push_str("00");
        out
    }
}

fn push_word(out: &mut String, word: u16) {
    out.push_str(&format!("{:02x}{:02x}", word & 0xff, word >> 8));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamedb::guid_vendor_product;

    #[test]
    fn guid_round_trips_through_database_key() {
        let meta = DeviceMeta {
            bus: Some("evdev".into()),
            bustype: 0x03,
            version: 0x0114,
            path: None,
        };
        let guid = meta.guid(0x045e, 0x028e, "Xbox 360 Controller");
        assert_eq!(guid, "030000005e0400008e02000014010000");
        assert_eq!(guid_vendor_product(&guid), (0x045e, 0x028e));
    }

    #[test]
    fn guid_falls_back_to_name_bytes() {
        let meta = DeviceMeta {
            bustype: 0x05,
            ..DeviceMeta::default()
        };
        let guid = meta.guid(0, 0, "Pad");
        assert_eq!(guid.len(), 32);
        assert!(guid.starts_with("05000000506164"));
        assert!(guid.ends_with("00"));
    }
}
