//! Raw device layer boundary.
//!
//! A [`Backend`] owns the OS-facing side of input (evdev nodes, XInput slots, or a
//! scripted source) and writes raw state into the pad slots it is handed each poll.
//!
//! # Poll contract
//! The [`Manager`](crate::manager::Manager) snapshots every slot (`prev_buttons`,
//! `was_connected`) *before* calling [`Backend::poll`]. The backend then:
//! - overwrites current buttons/axes/hat for slots it drives,
//! - attaches newly found devices to free slots ([`PadState::attach`]),
//! - detaches removed or failing devices ([`PadState::detach`]),
//! - pushes exactly one [`HotplugEvent`] per connect/disconnect it performed.
//!
//! Backends must not block; a poll drains whatever is pending and returns.
//! They are `Send` so a [`Manager`](crate::manager::Manager) can live on an
//! input thread.

use crate::event::HotplugEvent;
use crate::gamedb::Platform;
use crate::pad::PadState;

/// How raw indices relate to the standardized layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawLayout {
    /// Every device exposes the same standardized raw layout (XInput).
    /// Mappings come from a fixed identity table.
    Fixed,
    /// Raw layout depends on the device model. Mappings come from the database.
    DeviceSpecific,
}

/// Source of raw pad state.
pub trait Backend: Send {
    /// Short backend name for logs (`"evdev"`, `"xinput"`, `"virtual"`).
    fn name(&self) -> &'static str;

    /// Raw layout capability; selects the mapping resolver once at startup.
    fn layout(&self) -> RawLayout;

    /// Platform tag used when scanning the mapping database.
    fn platform(&self) -> Platform {
        Platform::current()
    }

    /// Update `pads` in place and report connect/disconnect transitions.
    fn poll(&mut self, pads: &mut [PadState], events: &mut Vec<HotplugEvent>);
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn layout(&self) -> RawLayout {
        (**self).layout()
    }

    fn platform(&self) -> Platform {
        (**self).platform()
    }

    fn poll(&mut self, pads: &mut [PadState], events: &mut Vec<HotplugEvent>) {
        (**self).poll(pads, events)
    }
}
