//! Raw deltas and hotplug transitions.
//!
//! Backends describe raw changes as small, slot-local deltas ([`InputKind`]) that
//! [`PadState::apply`](crate::pad::PadState::apply) folds into a pad slot. Device
//! arrival and removal is reported separately as [`HotplugEvent`].
//!
//! ## Value conventions
//! - **Axes:** normalized to `[-1.0, 1.0]`. Values outside are clamped on apply.
//! - **Buttons:** press/release edges on a raw button index.
//! - **Hat (D-pad):** two independent axes, each `-1`, `0` or `1`.
//!   `x` is left/right, `y` is up (`-1`) / down (`+1`).

use std::time::Instant;

/// One component of the D-pad hat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HatAxis {
    X,
    Y,
}

/// Per-slot raw input change.
///
/// Indices are raw, device-native positions (`0..button_count`,
/// `0..axis_count`), not standardized ids.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputKind {
    /// A continuous channel changed.
    AxisMoved { axis: u8, value: f32 },

    /// A button transitioned to pressed.
    ButtonPressed { button: u8 },

    /// A button transitioned to released.
    ButtonReleased { button: u8 },

    /// One hat component changed. `value` is `-1`, `0` or `1`.
    HatChanged { axis: HatAxis, value: i8 },
}

/// A pad slot connected or disconnected.
///
/// Fired exactly once per transition, in the poll that observed it.
#[derive(Clone, Debug)]
pub struct HotplugEvent {
    /// Capture time (monotonic).
    pub at: Instant,
    /// Slot index in `0..MAX_PADS`.
    pub slot: usize,
    /// `true` on arrival, `false` on removal.
    pub connected: bool,
}

impl HotplugEvent {
    pub fn connected(slot: usize) -> Self {
        Self {
            at: Instant::now(),
            slot,
            connected: true,
        }
    }

    pub fn disconnected(slot: usize) -> Self {
        Self {
            at: Instant::now(),
            slot,
            connected: false,
        }
    }
}
