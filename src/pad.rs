//! Raw per-slot pad state.
//!
//! A [`PadState`] is what a backend writes every poll and what the binding engine
//! reads. Indices are raw, device-native positions; anything at or beyond
//! `button_count` / `axis_count` reads as released / `0.0`.

use crate::event::{HatAxis, InputKind};
use crate::metadata::DeviceMeta;
use crate::{MAX_AXES, MAX_BUTTONS, NAME_LEN};

/// Raw state of one pad slot.
#[derive(Clone, Debug, PartialEq)]
pub struct PadState {
    pub connected: bool,
    /// `connected` as of the previous poll.
    pub was_connected: bool,
    /// Display name, device-supplied or synthesized.
    pub name: String,
    /// 0 if unknown.
    pub vendor_id: u16,
    /// 0 if unknown.
    pub product_id: u16,
    /// Set only by `attach`/`detach`, so always `<= MAX_BUTTONS`.
    button_count: usize,
    /// Set only by `attach`/`detach`, so always `<= MAX_AXES`.
    axis_count: usize,
    pub buttons: [bool; MAX_BUTTONS],
    /// Buttons as of the previous poll. Written only by the poll step.
    pub prev_buttons: [bool; MAX_BUTTONS],
    pub axes: [f32; MAX_AXES],
    pub hat_x: f32,
    pub hat_y: f32,
    pub meta: DeviceMeta,
}

impl Default for PadState {
    fn default() -> Self {
        Self {
            connected: false,
            was_connected: false,
            name: String::new(),
            vendor_id: 0,
            product_id: 0,
            button_count: 0,
            axis_count: 0,
            buttons: [false; MAX_BUTTONS],
            prev_buttons: [false; MAX_BUTTONS],
            axes: [0.0; MAX_AXES],
            hat_x: 0.0,
            hat_y: 0.0,
            meta: DeviceMeta::default(),
        }
    }
}

impl PadState {
    /// Copy current values into the previous-poll snapshot.
    ///
    /// Called once per poll, before the backend overwrites current values.
    pub(crate) fn snapshot_previous(&mut self) {
        self.prev_buttons = self.buttons;
        self.was_connected = self.connected;
    }

    /// Mark the slot occupied by a freshly opened device.
    ///
    /// Identity fields are reset; counts are clamped to the compile-time limits.
    pub fn attach(
        &mut self,
        name: &str,
        vendor_id: u16,
        product_id: u16,
        button_count: usize,
        axis_count: usize,
        meta: DeviceMeta,
    ) {
        self.clear_inputs();
        self.name = truncate_name(name);
        self.vendor_id = vendor_id;
        self.product_id = product_id;
        self.button_count = button_count.min(MAX_BUTTONS);
        self.axis_count = axis_count.min(MAX_AXES);
        self.meta = meta;
        self.connected = true;
    }

    /// Tear the slot down: inputs zeroed, identity cleared, `connected = false`.
    ///
    /// `prev_buttons` and `was_connected` keep last poll's values so the release
    /// edge and the disconnect transition stay observable for this poll.
    pub fn detach(&mut self) {
        self.clear_inputs();
        self.connected = false;
        self.button_count = 0;
        self.axis_count = 0;
        self.name.clear();
        self.vendor_id = 0;
        self.product_id = 0;
        self.meta = DeviceMeta::default();
    }

    fn clear_inputs(&mut self) {
        self.buttons = [false; MAX_BUTTONS];
        self.axes = [0.0; MAX_AXES];
        self.hat_x = 0.0;
        self.hat_y = 0.0;
    }

    /// Fold one raw delta into the current state.
    ///
    /// Deltas addressing raw indices beyond the populated counts are ignored.
    pub fn apply(&mut self, kind: InputKind) {
        match kind {
            InputKind::ButtonPressed { button } => self.set_button(button as usize, true),
            InputKind::ButtonReleased { button } => self.set_button(button as usize, false),
            InputKind::AxisMoved { axis, value } => {
                let axis = axis as usize;
                if axis < self.axis_count {
                    if let Some(slot) = self.axes.get_mut(axis) {
                        *slot = value.clamp(-1.0, 1.0);
                    }
                }
            }
            InputKind::HatChanged { axis, value } => {
                let value = value.signum() as f32;
                match axis {
                    HatAxis::X => self.hat_x = value,
                    HatAxis::Y => self.hat_y = value,
                }
            }
        }
    }

    /// Number of raw buttons actually populated (`<= MAX_BUTTONS`).
    pub fn button_count(&self) -> usize {
        self.button_count
    }

    /// Number of raw axes actually populated (`<= MAX_AXES`).
    pub fn axis_count(&self) -> usize {
        self.axis_count
    }

    fn set_button(&mut self, button: usize, pressed: bool) {
        if button < self.button_count {
            if let Some(slot) = self.buttons.get_mut(button) {
                *slot = pressed;
            }
        }
    }

    /// Raw button level. Out-of-range index reads `false`.
    pub fn button(&self, index: usize) -> bool {
        index < self.button_count && self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Raw button went down since the previous poll.
    pub fn button_pressed(&self, index: usize) -> bool {
        self.button(index) && !self.prev_buttons.get(index).copied().unwrap_or(false)
    }

    /// Raw button went up since the previous poll.
    ///
    /// Also true in the poll that tears a slot down while the button was held.
    pub fn button_released(&self, index: usize) -> bool {
        match (self.buttons.get(index), self.prev_buttons.get(index)) {
            (Some(&now), Some(&before)) => !now && before,
            _ => false,
        }
    }

    /// Raw axis value. Out-of-range index reads `0.0`.
    pub fn axis(&self, index: usize) -> f32 {
        if index < self.axis_count {
            self.axes.get(index).copied().unwrap_or(0.0)
        } else {
            0.0
        }
    }

    /// Slot went from disconnected to connected in the last poll.
    pub fn just_connected(&self) -> bool {
        self.connected && !self.was_connected
    }

    /// Slot went from connected to disconnected in the last poll.
    pub fn just_disconnected(&self) -> bool {
        !self.connected && self.was_connected
    }

    /// SDL-style GUID for this slot's device (see [`DeviceMeta::guid`]).
    pub fn guid(&self) -> String {
        self.meta.guid(self.vendor_id, self.product_id, &self.name)
    }
}

fn truncate_name(name: &str) -> String {
    if name.len() < NAME_LEN {
        return name.to_owned();
    }
    let mut end = NAME_LEN - 1;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_owned()
}
