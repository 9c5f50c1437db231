//! Pad manager: the context object applications talk to.
//!
//! [`Manager`] owns a raw [`Backend`], the fixed array of pad slots, one cached
//! [`PadMapping`] per slot and the hotplug queue/listener registry. Call
//! [`Manager::poll`] once per frame, then query.
//!
//! # Tick
//! 1. Every slot copies current buttons into `prev_buttons` and `connected` into
//!    `was_connected`.
//! 2. The backend updates raw state and reports connect/disconnect transitions.
//! 3. Any slot that saw a transition drops its cached mapping.
//! 4. Connected slots with no resolution attempt since they connected are
//!    resolved once through the [`MappingResolver`]. A failed lookup is cached
//!    too, so the database is scanned at most once per connection.
//! 5. Transitions are queued and dispatched to listeners.
//!
//! Queries never mutate state: asking twice in one tick gives the same answer.
//! Out-of-range slots and indices read as `false` / `0.0` / `""`.
//!
//! ```no_run
//! use padmap::{GamepadAxis, GamepadButton, HotplugLogger, EventFilter, Manager};
//!
//! let mut manager = Manager::discover();
//! manager.add_listener(HotplugLogger::new(), EventFilter::All);
//! loop {
//!     manager.poll();
//!     if manager.gamepad_button_pressed(0, GamepadButton::A) {
//!         println!("jump");
//!     }
//!     let x = manager.gamepad_axis(0, GamepadAxis::LeftX);
//!     # let _ = x;
//!     # break;
//! }
//! ```

use std::collections::VecDeque;

use crate::backends;
use crate::config::Config;
use crate::device::Backend;
use crate::error::Error;
use crate::event::HotplugEvent;
use crate::eventbus::{EventBus, EventFilter, HotplugListener};
use crate::gamedb::{MappingDatabase, PadMapping};
use crate::gamepad::{GamepadAxis, GamepadButton};
use crate::pad::PadState;
use crate::resolver::{resolver_for, MappingResolver};
use crate::snapshot::{PadSnapshot, Snapshot};
use crate::MAX_PADS;

/// Undrained transitions kept before the oldest are dropped.
pub const EVENT_QUEUE_LEN: usize = 64;

/// Resolution state of one slot.
#[derive(Clone, Debug, Default)]
enum SlotMapping {
    /// Not attempted since the slot (re)connected.
    #[default]
    Pending,
    /// Attempted; `None` means no mapping exists for this device.
    Resolved(Option<PadMapping>),
}

impl SlotMapping {
    fn get(&self) -> Option<&PadMapping> {
        match self {
            SlotMapping::Resolved(Some(mapping)) => Some(mapping),
            _ => None,
        }
    }
}

/// Gamepad subsystem context.
pub struct Manager<B: Backend = Box<dyn Backend>> {
    backend: B,
    resolver: Box<dyn MappingResolver>,
    pads: [PadState; MAX_PADS],
    mappings: [SlotMapping; MAX_PADS],
    queue: VecDeque<HotplugEvent>,
    bus: EventBus,
}

impl Manager {
    /// Native backend for this target with the built-in database.
    ///
    /// Never fails: without a native backend the manager simply sees no pads.
    pub fn discover() -> Self {
        match Self::from_config(&Config::default()) {
            Ok(manager) => manager,
            Err(err) => {
                log::warn!("falling back to an empty virtual backend: {err}");
                Self::with_resolver(
                    Box::new(backends::virtual_input::VirtualBackend::new()),
                    Box::new(crate::resolver::DatabaseResolver::builtin()),
                )
            }
        }
    }

    /// Backend, database and platform tag as described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let backend = backends::default_backend(config)?;
        let db = config.database()?;
        let platform = config.platform.unwrap_or_else(|| backend.platform());
        let resolver = resolver_for(backend.layout(), db, platform);
        log::debug!("using {} backend, {} mappings", backend.name(), platform);
        Ok(Self::with_resolver(backend, resolver))
    }
}

impl<B: Backend> Manager<B> {
    /// Manager over `backend`, resolving with the strategy matching its raw
    /// layout and the built-in database.
    pub fn new(backend: B) -> Self {
        let resolver = resolver_for(
            backend.layout(),
            MappingDatabase::builtin(),
            backend.platform(),
        );
        Self::with_resolver(backend, resolver)
    }

    /// Manager over `backend` with an explicit resolution strategy.
    pub fn with_resolver(backend: B, resolver: Box<dyn MappingResolver>) -> Self {
        Self {
            backend,
            resolver,
            pads: Default::default(),
            mappings: Default::default(),
            queue: VecDeque::new(),
            bus: EventBus::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Advance one tick. Returns this tick's transitions in the order they
    /// happened; they are also queued for [`Manager::drain_events`].
    pub fn poll(&mut self) -> Vec<HotplugEvent> {
        for pad in &mut self.pads {
            pad.snapshot_previous();
        }

        let mut events = Vec::new();
        self.backend.poll(&mut self.pads, &mut events);
        events.retain(|e| e.slot < MAX_PADS);

        for event in &events {
            self.mappings[event.slot] = SlotMapping::Pending;
        }
        for (pad, mapping) in self.pads.iter().zip(self.mappings.iter_mut()) {
            if !pad.connected {
                *mapping = SlotMapping::Pending;
            } else if matches!(mapping, SlotMapping::Pending) {
                *mapping = SlotMapping::Resolved(self.resolver.resolve(pad));
            }
        }

        for event in &events {
            if self.queue.len() == EVENT_QUEUE_LEN {
                if let Some(dropped) = self.queue.pop_front() {
                    log::trace!("event queue full, dropping {dropped:?}");
                }
            }
            self.queue.push_back(event.clone());
        }
        self.bus.emit_all(&events);
        events
    }

    /// Take every queued transition not yet drained, oldest first.
    pub fn drain_events(&mut self) -> Vec<HotplugEvent> {
        self.queue.drain(..).collect()
    }

    /// Register a hotplug listener; returns its id.
    pub fn add_listener(
        &mut self,
        listener: impl HotplugListener + 'static,
        filter: EventFilter,
    ) -> u64 {
        self.bus.add_listener(listener, filter)
    }

    pub fn remove_listener(&mut self, id: u64) -> bool {
        self.bus.remove_listener(id)
    }

    pub fn enable_listener(&mut self, id: u64) {
        self.bus.enable(id)
    }

    pub fn disable_listener(&mut self, id: u64) {
        self.bus.disable(id)
    }

    /// Raw slot state.
    pub fn pad(&self, slot: usize) -> Option<&PadState> {
        self.pads.get(slot)
    }

    pub fn pads(&self) -> &[PadState] {
        &self.pads
    }

    fn connected_pad(&self, slot: usize) -> Option<&PadState> {
        self.pads.get(slot).filter(|p| p.connected)
    }

    // Raw queries.

    pub fn connected(&self, slot: usize) -> bool {
        self.connected_pad(slot).is_some()
    }

    pub fn name(&self, slot: usize) -> &str {
        self.connected_pad(slot).map_or("", |p| p.name.as_str())
    }

    pub fn vendor_id(&self, slot: usize) -> u16 {
        self.connected_pad(slot).map_or(0, |p| p.vendor_id)
    }

    pub fn product_id(&self, slot: usize) -> u16 {
        self.connected_pad(slot).map_or(0, |p| p.product_id)
    }

    pub fn button_count(&self, slot: usize) -> usize {
        self.connected_pad(slot).map_or(0, |p| p.button_count())
    }

    pub fn axis_count(&self, slot: usize) -> usize {
        self.connected_pad(slot).map_or(0, |p| p.axis_count())
    }

    pub fn button(&self, slot: usize, index: usize) -> bool {
        self.connected_pad(slot).map_or(false, |p| p.button(index))
    }

    pub fn button_pressed(&self, slot: usize, index: usize) -> bool {
        self.connected_pad(slot).map_or(false, |p| p.button_pressed(index))
    }

    /// Raw release edge. Also reported in the tick a held button's device goes away.
    pub fn button_released(&self, slot: usize, index: usize) -> bool {
        self.pads.get(slot).map_or(false, |p| p.button_released(index))
    }

    pub fn axis(&self, slot: usize, index: usize) -> f32 {
        self.connected_pad(slot).map_or(0.0, |p| p.axis(index))
    }

    pub fn hat_x(&self, slot: usize) -> f32 {
        self.connected_pad(slot).map_or(0.0, |p| p.hat_x)
    }

    pub fn hat_y(&self, slot: usize) -> f32 {
        self.connected_pad(slot).map_or(0.0, |p| p.hat_y)
    }

    // Standardized queries.

    /// Cached mapping of a connected slot, if one was found.
    pub fn mapping(&self, slot: usize) -> Option<&PadMapping> {
        self.connected_pad(slot)?;
        self.mappings[slot].get()
    }

    pub fn has_mapping(&self, slot: usize) -> bool {
        self.mapping(slot).is_some()
    }

    fn mapped(&self, slot: usize) -> Option<(&PadState, &PadMapping)> {
        let pad = self.connected_pad(slot)?;
        Some((pad, self.mappings[slot].get()?))
    }

    /// Standardized button held.
    pub fn gamepad_button(&self, slot: usize, button: GamepadButton) -> bool {
        self.mapped(slot)
            .map_or(false, |(pad, map)| map.button(button).read_button(pad))
    }

    /// Standardized button went down this tick. Only button-sourced bindings
    /// have press edges.
    pub fn gamepad_button_pressed(&self, slot: usize, button: GamepadButton) -> bool {
        self.mapped(slot)
            .map_or(false, |(pad, map)| map.button(button).read_button_pressed(pad))
    }

    /// Standardized axis value.
    pub fn gamepad_axis(&self, slot: usize, axis: GamepadAxis) -> f32 {
        self.mapped(slot)
            .map_or(0.0, |(pad, map)| map.axis(axis).read_axis(pad))
    }

    /// Owned standardized view of every connected pad.
    pub fn snapshot(&self) -> Snapshot {
        let pads = (0..MAX_PADS)
            .filter_map(|slot| {
                let pad = self.connected_pad(slot)?;
                let mut buttons = [false; GamepadButton::COUNT];
                for button in GamepadButton::ALL {
                    buttons[button.index()] = self.gamepad_button(slot, button);
                }
                let mut axes = [0.0; GamepadAxis::COUNT];
                for axis in GamepadAxis::ALL {
                    axes[axis.index()] = self.gamepad_axis(slot, axis);
                }
                Some(PadSnapshot {
                    slot,
                    name: pad.name.clone(),
                    vendor_id: pad.vendor_id,
                    product_id: pad.product_id,
                    mapped: self.has_mapping(slot),
                    buttons,
                    axes,
                })
            })
            .collect();
        Snapshot(pads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::{VirtualBackend, VirtualPad};
    use crate::gamedb::Platform;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Resolver that counts calls and maps everything to the identity table.
    struct Counting(Arc<AtomicUsize>);

    impl MappingResolver for Counting {
        fn resolve(&self, pad: &PadState) -> Option<PadMapping> {
            self.0.fetch_add(1, Ordering::SeqCst);
            (pad.vendor_id != 0).then(crate::resolver::FixedLayoutResolver::mapping)
        }
    }

    fn counting() -> (Manager<VirtualBackend>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let manager = Manager::with_resolver(
            VirtualBackend::new().with_platform(Platform::Linux),
            Box::new(Counting(Arc::clone(&calls))),
        );
        (manager, calls)
    }

    #[test]
    fn resolves_once_per_connection() {
        let (mut m, calls) = counting();
        m.backend_mut().plug(0, VirtualPad::new("Pad", 1, 1));
        m.poll();
        m.poll();
        m.poll();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        m.backend_mut().plug(1, VirtualPad::new("Unknown", 0, 0));
        m.poll();
        m.poll();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!m.has_mapping(1));

        m.backend_mut().unplug(0);
        m.backend_mut().plug(0, VirtualPad::new("Pad", 1, 1));
        m.poll();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn out_of_range_queries_are_inactive() {
        let (mut m, _) = counting();
        m.backend_mut().plug(0, VirtualPad::new("Pad", 1, 1));
        m.poll();
        assert!(!m.connected(MAX_PADS));
        assert_eq!(m.name(MAX_PADS + 7), "");
        assert!(!m.button(0, 99));
        assert_eq!(m.axis(0, 99), 0.0);
        assert!(!m.gamepad_button(MAX_PADS, GamepadButton::A));
        assert_eq!(m.gamepad_axis(usize::MAX, GamepadAxis::LeftX), 0.0);
        assert!(m.mapping(MAX_PADS).is_none());
    }

    #[test]
    fn queue_keeps_most_recent() {
        let (mut m, _) = counting();
        for _ in 0..EVENT_QUEUE_LEN {
            m.backend_mut().plug(0, VirtualPad::new("Pad", 1, 1));
            m.backend_mut().unplug(0);
        }
        let tick = m.poll();
        assert_eq!(tick.len(), EVENT_QUEUE_LEN * 2);
        let drained = m.drain_events();
        assert_eq!(drained.len(), EVENT_QUEUE_LEN);
        assert!(!drained.last().unwrap().connected);
        assert!(m.drain_events().is_empty());
    }
}
