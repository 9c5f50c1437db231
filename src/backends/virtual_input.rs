//! Scriptable in-memory raw layer.
//!
//! [`VirtualBackend`] lets tests, demos and replay tools drive pad slots without
//! hardware. Calls queue raw operations; the next [`Backend::poll`] applies them
//! in order, exactly like a real backend would observe them during one tick.
//!
//! ```
//! use padmap::backends::virtual_input::{VirtualBackend, VirtualPad};
//! use padmap::{GamepadButton, Manager, Platform};
//!
//! let mut manager = Manager::new(VirtualBackend::new().with_platform(Platform::Linux));
//! manager.backend_mut().plug(0, VirtualPad::new("Xbox 360 Controller", 0x045e, 0x028e));
//! manager.poll();
//! manager.backend_mut().press_button(0, 0);
//! manager.poll();
//! assert!(manager.gamepad_button_pressed(0, GamepadButton::A));
//! ```

use crate::device::{Backend, RawLayout};
use crate::event::{HatAxis, HotplugEvent, InputKind};
use crate::gamedb::Platform;
use crate::metadata::DeviceMeta;
use crate::pad::PadState;

/// Identity and shape of a virtual device.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualPad {
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub button_count: usize,
    pub axis_count: usize,
    pub meta: DeviceMeta,
}

impl VirtualPad {
    /// A pad with 15 raw buttons and 6 raw axes.
    pub fn new(name: &str, vendor_id: u16, product_id: u16) -> Self {
        Self {
            name: name.to_owned(),
            vendor_id,
            product_id,
            button_count: 15,
            axis_count: 6,
            meta: DeviceMeta {
                bus: Some("virtual".to_owned()),
                bustype: 0x03,
                ..DeviceMeta::default()
            },
        }
    }

    pub fn with_counts(mut self, button_count: usize, axis_count: usize) -> Self {
        self.button_count = button_count;
        self.axis_count = axis_count;
        self
    }
}

#[derive(Clone, Debug)]
enum Op {
    Plug(VirtualPad),
    Unplug,
    /// Simulated read failure: torn down like a device I/O error.
    Fail,
    Input(InputKind),
}

/// In-memory backend; see the module docs.
#[derive(Debug)]
pub struct VirtualBackend {
    layout: RawLayout,
    platform: Platform,
    pending: Vec<(usize, Op)>,
}

impl Default for VirtualBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualBackend {
    /// Device-specific layout (database-resolved) on the current platform.
    pub fn new() -> Self {
        Self::with_layout(RawLayout::DeviceSpecific)
    }

    pub fn with_layout(layout: RawLayout) -> Self {
        Self {
            layout,
            platform: Platform::current(),
            pending: Vec::new(),
        }
    }

    /// Override the platform tag used for database lookups.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Connect a device to `slot` on the next poll. Ignored if the slot is taken.
    pub fn plug(&mut self, slot: usize, pad: VirtualPad) {
        self.pending.push((slot, Op::Plug(pad)));
    }

    /// Disconnect `slot` on the next poll.
    pub fn unplug(&mut self, slot: usize) {
        self.pending.push((slot, Op::Unplug));
    }

    /// Make the device in `slot` fail its next read.
    pub fn fail(&mut self, slot: usize) {
        self.pending.push((slot, Op::Fail));
    }

    /// Inject a raw input delta.
    pub fn feed(&mut self, slot: usize, kind: InputKind) {
        self.pending.push((slot, Op::Input(kind)));
    }

    pub fn set_axis(&mut self, slot: usize, axis: u8, value: f32) {
        self.feed(slot, InputKind::AxisMoved { axis, value });
    }

    pub fn press_button(&mut self, slot: usize, button: u8) {
        self.feed(slot, InputKind::ButtonPressed { button });
    }

    pub fn release_button(&mut self, slot: usize, button: u8) {
        self.feed(slot, InputKind::ButtonReleased { button });
    }

    /// Set both hat components (`-1`, `0` or `1`; `y = -1` is up).
    pub fn set_hat(&mut self, slot: usize, x: i8, y: i8) {
        self.feed(slot, InputKind::HatChanged { axis: HatAxis::X, value: x });
        self.feed(slot, InputKind::HatChanged { axis: HatAxis::Y, value: y });
    }

    /// Operations queued for the next poll.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Backend for VirtualBackend {
    fn name(&self) -> &'static str {
        "virtual"
    }

    fn layout(&self) -> RawLayout {
        self.layout
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn poll(&mut self, pads: &mut [PadState], events: &mut Vec<HotplugEvent>) {
        for (slot, op) in self.pending.drain(..) {
            let Some(pad) = pads.get_mut(slot) else {
                log::debug!("virtual: slot {slot} out of range, dropping {op:?}");
                continue;
            };
            match op {
                Op::Plug(dev) => {
                    if pad.connected {
                        log::debug!("virtual: slot {slot} already occupied");
                        continue;
                    }
                    pad.attach(
                        &dev.name,
                        dev.vendor_id,
                        dev.product_id,
                        dev.button_count,
                        dev.axis_count,
                        dev.meta,
                    );
                    log::info!(
                        "[pad {slot}] {} ({:04x}:{:04x}) plugged",
                        pad.name,
                        pad.vendor_id,
                        pad.product_id
                    );
                    events.push(HotplugEvent::connected(slot));
                }
                Op::Unplug if pad.connected => {
                    log::info!("[pad {slot}] unplugged");
                    pad.detach();
                    events.push(HotplugEvent::disconnected(slot));
                }
                Op::Fail if pad.connected => {
                    log::warn!("[pad {slot}] read failed, closing device");
                    pad.detach();
                    events.push(HotplugEvent::disconnected(slot));
                }
                Op::Input(kind) if pad.connected => {
                    log::trace!("[pad {slot}] {kind:?}");
                    pad.apply(kind);
                }
                Op::Unplug | Op::Fail | Op::Input(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_PADS;

    fn pads() -> [PadState; MAX_PADS] {
        Default::default()
    }

    #[test]
    fn operations_apply_in_order() {
        let mut backend = VirtualBackend::new();
        let mut pads = pads();
        let mut events = Vec::new();

        backend.press_button(0, 0); // before plug: dropped
        backend.plug(0, VirtualPad::new("Pad", 1, 2).with_counts(4, 2));
        backend.press_button(0, 1);
        backend.set_axis(0, 1, -0.25);
        backend.plug(0, VirtualPad::new("Other", 3, 4)); // slot taken
        assert_eq!(backend.pending(), 5);
        backend.poll(&mut pads, &mut events);

        assert_eq!(backend.pending(), 0);
        assert_eq!(events.len(), 1);
        assert!(events[0].connected);
        assert_eq!(pads[0].name, "Pad");
        assert!(!pads[0].button(0));
        assert!(pads[0].button(1));
        assert_eq!(pads[0].axis(1), -0.25);
    }

    #[test]
    fn fail_and_unplug_tear_down_once() {
        let mut backend = VirtualBackend::new();
        let mut pads = pads();
        let mut events = Vec::new();
        backend.plug(2, VirtualPad::new("Pad", 1, 2));
        backend.poll(&mut pads, &mut events);
        events.clear();

        backend.fail(2);
        backend.unplug(2);
        backend.unplug(9);
        backend.poll(&mut pads, &mut events);
        assert_eq!(events.len(), 1);
        assert_eq!((events[0].slot, events[0].connected), (2, false));
        assert!(!pads[2].connected);
    }
}
