//! Controller mapping database (SDL GameController DB format).
//!
//! Each record is one line:
//!
//! ```text
//! GUID,Name,target:source,target:source,...,platform:Platform,
//! ```
//!
//! The GUID is a 32-character hex string; bytes 4–5 hold the vendor id and bytes
//! 8–9 the product id, each as little-endian hex pairs. Lookup is keyed on that
//! vendor:product pair plus the `platform:` tag.
//!
//! # Matching policy
//! Records are scanned top to bottom and the **first** match wins. User-supplied
//! text is scanned before the compiled-in table, so user records take precedence.
//! Ordering inside a source is significant; keep it when adding lines.
//!
//! Lines that are empty, start with `#`, or are too short to carry a GUID are
//! skipped. Fields with unknown targets are ignored, and malformed sources become
//! [`Binding::None`].

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::binding::{Binding, MAX_TOKEN_LEN};
use crate::error::Error;
use crate::gamepad::{GamepadAxis, GamepadButton, Target};

/// Compiled-in curated subset of the community database.
pub const BUILTIN_MAPPINGS: &str = include_str!("gamecontrollerdb.txt");

/// Length of a database GUID in hex characters.
pub const GUID_LEN: usize = 32;

/// Platform tag of a database record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Linux,
    Windows,
    #[serde(rename = "Mac OS X")]
    MacOs,
    Android,
    #[serde(rename = "iOS")]
    Ios,
}

impl Platform {
    /// Platform this crate was compiled for.
    pub fn current() -> Platform {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Linux
        }
    }

    /// Value used after `platform:` in the database.
    pub fn db_name(self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
            Platform::MacOs => "Mac OS X",
            Platform::Android => "Android",
            Platform::Ios => "iOS",
        }
    }

    pub fn from_db_name(name: &str) -> Option<Platform> {
        [
            Platform::Linux,
            Platform::Windows,
            Platform::MacOs,
            Platform::Android,
            Platform::Ios,
        ]
        .into_iter()
        .find(|p| p.db_name() == name)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.db_name())
    }
}

fn hex_digit(c: u8) -> Option<u16> {
    (c as char).to_digit(16).map(|d| d as u16)
}

/// Little-endian 16-bit word at `byte_offset` of a hex GUID. 0 when unreadable.
fn guid_u16(guid: &[u8], byte_offset: usize) -> u16 {
    let pos = byte_offset * 2;
    let Some(hex) = guid.get(pos..pos + 4) else {
        return 0;
    };
    let mut nibbles = [0u16; 4];
    for (n, c) in nibbles.iter_mut().zip(hex) {
        match hex_digit(*c) {
            Some(d) => *n = d,
            None => return 0,
        }
    }
    let lo = (nibbles[0] << 4) | nibbles[1];
    let hi = (nibbles[2] << 4) | nibbles[3];
    (hi << 8) | lo
}

/// Decode `(vendor, product)` from a database GUID.
pub fn guid_vendor_product(guid: &str) -> (u16, u16) {
    let bytes = guid.as_bytes();
    (guid_u16(bytes, 4), guid_u16(bytes, 8))
}

/// Binding table for one pad: one [`Binding`] per standardized button and axis.
#[derive(Clone, Debug, PartialEq)]
pub struct PadMapping {
    /// Display name from the record (or the resolver).
    pub name: String,
    /// GUID of the record this table came from; empty for synthesized tables.
    pub guid: String,
    pub buttons: [Binding; GamepadButton::COUNT],
    pub axes: [Binding; GamepadAxis::COUNT],
}

impl PadMapping {
    /// Table with every input unbound.
    pub fn unbound(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: String::new(),
            buttons: [Binding::None; GamepadButton::COUNT],
            axes: [Binding::None; GamepadAxis::COUNT],
        }
    }

    #[inline]
    pub fn button(&self, button: GamepadButton) -> Binding {
        self.buttons[button.index()]
    }

    #[inline]
    pub fn axis(&self, axis: GamepadAxis) -> Binding {
        self.axes[axis.index()]
    }

    pub fn set(&mut self, target: Target, binding: Binding) {
        match target {
            Target::Button(b) => self.buttons[b.index()] = binding,
            Target::Axis(a) => self.axes[a.index()] = binding,
        }
    }

    /// Render this table as a database line for `platform`.
    pub fn to_db_line(&self, platform: Platform) -> String {
        let mut line = format!("{},{},", self.guid, self.name);
        for button in GamepadButton::ALL {
            push_field(&mut line, button.db_name(), self.button(button));
        }
        for axis in GamepadAxis::ALL {
            push_field(&mut line, axis.db_name(), self.axis(axis));
        }
        line.push_str("platform:");
        line.push_str(platform.db_name());
        line.push(',');
        line
    }
}

fn push_field(line: &mut String, target: &str, binding: Binding) {
    let source = match binding {
        Binding::None => return,
        Binding::Button(i) => format!("b{i}"),
        Binding::Axis { index, invert } => {
            format!("{}a{index}", if invert { "-" } else { "" })
        }
        Binding::Hat { hat, mask } => format!("h{hat}.{}", mask.0),
    };
    line.push_str(target);
    line.push(':');
    line.push_str(&source);
    line.push(',');
}

/// One database line split into GUID, name and mapping fields.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    pub guid: &'a str,
    pub name: &'a str,
    fields: &'a str,
}

impl<'a> Record<'a> {
    /// Split a line. `None` for blank lines, comments and lines without a GUID.
    pub fn parse(line: &'a str) -> Option<Record<'a>> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (guid, rest) = line.split_once(',')?;
        if guid.len() < GUID_LEN {
            return None;
        }
        let (name, fields) = rest.split_once(',').unwrap_or((rest, ""));
        Some(Record { guid, name, fields })
    }

    pub fn vendor_product(&self) -> (u16, u16) {
        guid_vendor_product(self.guid)
    }

    /// `target:source` pairs in line order. Fields without `:` are dropped.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.fields
            .split(',')
            .filter_map(|field| field.split_once(':'))
    }

    /// Value of the `platform:` field, if any.
    pub fn platform(&self) -> Option<&'a str> {
        self.fields()
            .find(|(key, _)| *key == "platform")
            .map(|(_, value)| value)
    }

    /// Untagged records match every platform.
    pub fn matches_platform(&self, platform: Platform) -> bool {
        match self.platform() {
            Some(tag) => tag.starts_with(platform.db_name()),
            None => true,
        }
    }

    /// Build the binding table described by this record.
    pub fn to_mapping(&self) -> PadMapping {
        let mut mapping = PadMapping::unbound(self.name);
        mapping.guid = self.guid.to_owned();

        for (target, source) in self.fields() {
            if target == "platform" || source.len() > MAX_TOKEN_LEN {
                continue;
            }
            if let Some(target) = Target::from_name(target) {
                mapping.set(target, Binding::parse(source));
            }
        }
        mapping
    }
}

/// Ordered set of mapping sources.
///
/// User text (added with [`MappingDatabase::add_text`] / [`MappingDatabase::add_file`])
/// is scanned in the order it was added, then the built-in table.
#[derive(Clone, Debug)]
pub struct MappingDatabase {
    user: Vec<String>,
    builtin: Option<Cow<'static, str>>,
}

impl Default for MappingDatabase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MappingDatabase {
    /// Database holding only the compiled-in table.
    pub fn builtin() -> Self {
        Self {
            user: Vec::new(),
            builtin: Some(Cow::Borrowed(BUILTIN_MAPPINGS)),
        }
    }

    /// Database with no records at all.
    pub fn empty() -> Self {
        Self {
            user: Vec::new(),
            builtin: None,
        }
    }

    /// Database over a single text blob (replaces the built-in table).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            user: Vec::new(),
            builtin: Some(Cow::Owned(text.into())),
        }
    }

    /// Add user records, scanned before the built-in table.
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.user.push(text.into());
        self
    }

    /// Read a mapping file and add it as user records.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded mapping file {}", path.display());
        Ok(self.add_text(text))
    }

    /// All records in scan order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.user
            .iter()
            .map(String::as_str)
            .chain(self.builtin.as_deref())
            .flat_map(str::lines)
            .filter_map(Record::parse)
    }

    /// First record for `vendor:product` tagged for `platform`.
    ///
    /// `(0, 0)` means "unknown device" and never scans.
    pub fn find(&self, vendor: u16, product: u16, platform: Platform) -> Option<Record<'_>> {
        if vendor == 0 && product == 0 {
            return None;
        }
        self.records()
            .find(|r| r.vendor_product() == (vendor, product) && r.matches_platform(platform))
    }

    /// Binding table for `vendor:product` on `platform`, if the database has one.
    pub fn lookup(&self, vendor: u16, product: u16, platform: Platform) -> Option<PadMapping> {
        self.find(vendor, product, platform).map(|r| r.to_mapping())
    }
}
