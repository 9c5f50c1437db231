//! Per-tick snapshot of standardized pad state.
//!
//! [`Snapshot`] is an **owned**, read-only view of every connected pad at a point
//! in time (typically "this frame"). It is produced by
//! [`Manager::snapshot`](crate::manager::Manager::snapshot) and is cheap to clone
//! for fan-out to multiple consumers, or to ship elsewhere as JSON.
//!
//! # Semantics
//! - One entry per connected slot, in slot order.
//! - Buttons and axes are the standardized values (what
//!   [`Manager::gamepad_button`](crate::manager::Manager::gamepad_button) and
//!   [`Manager::gamepad_axis`](crate::manager::Manager::gamepad_axis) return),
//!   indexed by [`GamepadButton::index`] / [`GamepadAxis::index`].
//! - A snapshot does **not** poll; it reflects the manager's last poll.
//!
//! ```no_run
//! use padmap::{GamepadAxis, GamepadButton, Snapshot};
//!
//! fn print(snap: &Snapshot) {
//!     for pad in snap.iter() {
//!         println!(
//!             "{}: A={} LX={:.2}",
//!             pad.name,
//!             pad.button(GamepadButton::A),
//!             pad.axis(GamepadAxis::LeftX)
//!         );
//!     }
//! }
//! ```

use serde::Serialize;

use crate::error::Error;
use crate::gamepad::{GamepadAxis, GamepadButton};

/// Standardized state of one connected pad.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PadSnapshot {
    pub slot: usize,
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    /// A mapping was resolved; when `false` every button and axis is inactive.
    pub mapped: bool,
    pub buttons: [bool; GamepadButton::COUNT],
    pub axes: [f32; GamepadAxis::COUNT],
}

impl PadSnapshot {
    #[inline]
    pub fn button(&self, button: GamepadButton) -> bool {
        self.buttons[button.index()]
    }

    #[inline]
    pub fn axis(&self, axis: GamepadAxis) -> f32 {
        self.axes[axis.index()]
    }
}

/// Owned snapshot of all connected pads.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(pub Vec<PadSnapshot>);

impl Snapshot {
    /// State of a specific slot, if connected.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<&PadSnapshot> {
        self.0.iter().find(|p| p.slot == slot)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &PadSnapshot> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the snapshot and return the inner list.
    #[inline]
    pub fn into_inner(self) -> Vec<PadSnapshot> {
        self.0
    }

    /// Serialize as a JSON array.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}
