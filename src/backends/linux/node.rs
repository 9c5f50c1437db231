//! Per-node raw layout and evdev event translation.
//!
//! Probing a node yields a [`NodeLayout`]: which of the known button and axis
//! codes it has, in raw index order, plus axis calibration. Kernel events are then
//! turned into [`InputKind`] deltas against that layout.

use super::codes::*;
use crate::event::{HatAxis, InputKind};
use crate::{MAX_AXES, MAX_BUTTONS};

/// Calibration of one absolute axis (`EVIOCGABS`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisInfo {
    pub code: u16,
    pub minimum: i32,
    pub maximum: i32,
}

impl AxisInfo {
    /// Map a raw reading into `[-1, 1]`. A degenerate range reads `0.0`.
    pub fn normalize(&self, value: i32) -> f32 {
        let range = self.maximum as f32 - self.minimum as f32;
        if range == 0.0 {
            return 0.0;
        }
        2.0 * (value as f32 - self.minimum as f32) / range - 1.0
    }
}

/// Raw layout of one opened node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeLayout {
    /// Key code of each raw button index.
    pub buttons: Vec<u16>,
    /// Calibration of each raw axis index.
    pub axes: Vec<AxisInfo>,
    /// Node reports `ABS_HAT0X` and `ABS_HAT0Y`.
    pub has_hat: bool,
}

/// Words of an `unsigned long` bitmap holding `bits` bits (`EVIOCGBIT` layout).
pub const fn bitmap_len(bits: usize) -> usize {
    let word = libc::c_ulong::BITS as usize;
    (bits + word - 1) / word
}

pub fn test_bit(bits: &[libc::c_ulong], bit: usize) -> bool {
    let word = libc::c_ulong::BITS as usize;
    bits.get(bit / word)
        .map_or(false, |w| w & (1 << (bit % word)) != 0)
}

/// Gamepad check: the node has absolute axes, keys, and at least one key in
/// the gamepad button block.
pub fn is_gamepad(ev_bits: &[libc::c_ulong], key_bits: &[libc::c_ulong]) -> bool {
    test_bit(ev_bits, EV_ABS as usize)
        && test_bit(ev_bits, EV_KEY as usize)
        && (BTN_GAMEPAD..BTN_GAMEPAD + 16).any(|code| test_bit(key_bits, code as usize))
}

impl NodeLayout {
    /// Build the layout from capability bitmaps. `calibrate` reads one axis'
    /// calibration and returns `None` if the query fails; such axes are skipped.
    pub fn probe(
        abs_bits: &[libc::c_ulong],
        key_bits: &[libc::c_ulong],
        mut calibrate: impl FnMut(u16) -> Option<AxisInfo>,
    ) -> Self {
        let axes = AXIS_CODES
            .iter()
            .filter(|&&code| test_bit(abs_bits, code as usize))
            .filter_map(|&code| calibrate(code))
            .take(MAX_AXES)
            .collect();
        let buttons = BUTTON_CODES
            .iter()
            .copied()
            .filter(|&code| test_bit(key_bits, code as usize))
            .take(MAX_BUTTONS)
            .collect();
        let has_hat = test_bit(abs_bits, ABS_HAT0X as usize) && test_bit(abs_bits, ABS_HAT0Y as usize);
        Self {
            buttons,
            axes,
            has_hat,
        }
    }

    /// Translate one kernel event into a raw delta.
    pub fn translate(&self, type_: u16, code: u16, value: i32) -> Option<InputKind> {
        match type_ {
            EV_KEY => self.translate_key(code, value != 0),
            EV_ABS => self.translate_abs(code, value),
            _ => None,
        }
    }

    fn translate_key(&self, code: u16, pressed: bool) -> Option<InputKind> {
        if let Some(index) = self.buttons.iter().position(|&c| c == code) {
            let button = index as u8;
            return Some(if pressed {
                InputKind::ButtonPressed { button }
            } else {
                InputKind::ButtonReleased { button }
            });
        }
        if self.has_hat {
            return None;
        }
        let (axis, direction) = match code {
            BTN_DPAD_UP | BTN_TRIGGER_HAPPY3 => (HatAxis::Y, -1),
            BTN_DPAD_DOWN | BTN_TRIGGER_HAPPY4 => (HatAxis::Y, 1),
            BTN_DPAD_LEFT | BTN_TRIGGER_HAPPY1 => (HatAxis::X, -1),
            BTN_DPAD_RIGHT | BTN_TRIGGER_HAPPY2 => (HatAxis::X, 1),
            _ => return None,
        };
        Some(InputKind::HatChanged {
            axis,
            value: if pressed { direction } else { 0 },
        })
    }

    fn translate_abs(&self, code: u16, value: i32) -> Option<InputKind> {
        match code {
            ABS_HAT0X => Some(InputKind::HatChanged {
                axis: HatAxis::X,
                value: value.signum() as i8,
            }),
            ABS_HAT0Y => Some(InputKind::HatChanged {
                axis: HatAxis::Y,
                value: value.signum() as i8,
            }),
            _ => {
                let index = self.axes.iter().position(|a| a.code == code)?;
                Some(InputKind::AxisMoved {
                    axis: index as u8,
                    value: self.axes[index].normalize(value),
                })
            }
        }
    }
}
