//! Mapping resolution strategies.
//!
//! A [`MappingResolver`] turns a freshly connected pad into a [`PadMapping`]. The
//! manager picks one once at startup from the backend's [`RawLayout`]:
//!
//! - [`RawLayout::Fixed`] → [`FixedLayoutResolver`]: identity table, no database.
//! - [`RawLayout::DeviceSpecific`] → [`DatabaseResolver`]: vendor:product lookup.

use crate::binding::Binding;
use crate::device::RawLayout;
use crate::gamedb::{MappingDatabase, PadMapping, Platform};
use crate::gamepad::{GamepadAxis, GamepadButton};
use crate::pad::PadState;

/// Produces the binding table for a connected pad.
pub trait MappingResolver: Send {
    /// `None` means the pad has no mapping; standardized queries then read
    /// released / `0.0`.
    fn resolve(&self, pad: &PadState) -> Option<PadMapping>;
}

/// Identity table for backends whose raw layout is already standardized.
///
/// Raw buttons: `0..=3` A/B/X/Y, `4`/`5` bumpers, `6` back, `7` start,
/// `8`/`9` thumbs, `10..=13` D-pad up/down/left/right. Guide is unbound.
/// Raw axes: `0..=3` sticks, `4`/`5` triggers.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedLayoutResolver;

impl FixedLayoutResolver {
    pub fn mapping() -> PadMapping {
        use GamepadButton::*;

        const RAW_BUTTONS: [(GamepadButton, u8); 14] = [
            (A, 0),
            (B, 1),
            (X, 2),
            (Y, 3),
            (LeftBumper, 4),
            (RightBumper, 5),
            (Back, 6),
            (Start, 7),
            (LeftThumb, 8),
            (RightThumb, 9),
            (DpadUp, 10),
            (DpadDown, 11),
            (DpadLeft, 12),
            (DpadRight, 13),
        ];

        let mut mapping = PadMapping::unbound("Standard Gamepad");
        for (button, raw) in RAW_BUTTONS {
            mapping.buttons[button.index()] = Binding::Button(raw);
        }
        for axis in GamepadAxis::ALL {
            mapping.axes[axis.index()] = Binding::Axis {
                index: axis.index() as u8,
                invert: false,
            };
        }
        mapping
    }
}

impl MappingResolver for FixedLayoutResolver {
    fn resolve(&self, _pad: &PadState) -> Option<PadMapping> {
        Some(Self::mapping())
    }
}

/// Database lookup keyed by the pad's vendor:product.
#[derive(Clone, Debug)]
pub struct DatabaseResolver {
    db: MappingDatabase,
    platform: Platform,
}

impl DatabaseResolver {
    pub fn new(db: MappingDatabase, platform: Platform) -> Self {
        Self { db, platform }
    }

    /// Built-in table, current platform.
    pub fn builtin() -> Self {
        Self::new(MappingDatabase::builtin(), Platform::current())
    }

    pub fn database(&self) -> &MappingDatabase {
        &self.db
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

impl MappingResolver for DatabaseResolver {
    fn resolve(&self, pad: &PadState) -> Option<PadMapping> {
        let found = self.db.lookup(pad.vendor_id, pad.product_id, self.platform);
        match &found {
            Some(mapping) => log::debug!(
                "{:04x}:{:04x} mapped by \"{}\" ({})",
                pad.vendor_id,
                pad.product_id,
                mapping.name,
                mapping.guid
            ),
            None => log::debug!(
                "no {} mapping for {:04x}:{:04x} ({}), guid {}",
                self.platform,
                pad.vendor_id,
                pad.product_id,
                pad.name,
                pad.guid()
            ),
        }
        found
    }
}

/// Strategy for a backend's raw layout.
pub fn resolver_for(
    layout: RawLayout,
    db: MappingDatabase,
    platform: Platform,
) -> Box<dyn MappingResolver> {
    match layout {
        RawLayout::Fixed => Box::new(FixedLayoutResolver),
        RawLayout::DeviceSpecific => Box::new(DatabaseResolver::new(db, platform)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DeviceMeta;

    #[test]
    fn fixed_layout_is_identity() {
        let map = FixedLayoutResolver::mapping();
        assert_eq!(map.button(GamepadButton::A), Binding::Button(0));
        assert_eq!(map.button(GamepadButton::DpadRight), Binding::Button(13));
        assert_eq!(map.button(GamepadButton::Guide), Binding::None);
        assert_eq!(
            map.axis(GamepadAxis::RightTrigger),
            Binding::Axis {
                index: 5,
                invert: false
            }
        );
        // Vendor-agnostic: resolves even for unknown ids.
        assert!(FixedLayoutResolver.resolve(&PadState::default()).is_some());
    }

    #[test]
    fn database_resolver_uses_vendor_product() {
        let resolver = DatabaseResolver::new(MappingDatabase::builtin(), Platform::Linux);
        let mut pad = PadState::default();
        pad.attach("DualSense", 0x054c, 0x0ce6, 15, 6, DeviceMeta::default());
        assert_eq!(resolver.resolve(&pad).unwrap().name, "PS5 Controller");

        pad.attach("Mystery", 0, 0, 15, 6, DeviceMeta::default());
        assert!(resolver.resolve(&pad).is_none());
    }

    #[test]
    fn layout_selects_strategy() {
        let mut pad = PadState::default();
        pad.attach("Mystery", 0, 0, 15, 6, DeviceMeta::default());
        let fixed = resolver_for(RawLayout::Fixed, MappingDatabase::empty(), Platform::Windows);
        let db = resolver_for(
            RawLayout::DeviceSpecific,
            MappingDatabase::builtin(),
            Platform::Linux,
        );
        assert!(fixed.resolve(&pad).is_some());
        assert!(db.resolve(&pad).is_none());
    }
}
