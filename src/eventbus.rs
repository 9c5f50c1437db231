use crate::event::HotplugEvent;
use std::collections::HashMap;

/// Trait for reacting to pad connect/disconnect transitions.
pub trait HotplugListener: Send {
    fn on_hotplug(&mut self, event: &HotplugEvent);
}

impl<F> HotplugListener for F
where
    F: FnMut(&HotplugEvent) + Send,
{
    fn on_hotplug(&mut self, event: &HotplugEvent) {
        self(event)
    }
}

/// Determines which transitions a listener wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    All,
    ConnectOnly,
    DisconnectOnly,
    /// Only transitions of one slot.
    Slot(usize),
    Custom(fn(&HotplugEvent) -> bool),
}

impl EventFilter {
    fn accepts(&self, event: &HotplugEvent) -> bool {
        match *self {
            EventFilter::All => true,
            EventFilter::ConnectOnly => event.connected,
            EventFilter::DisconnectOnly => !event.connected,
            EventFilter::Slot(slot) => event.slot == slot,
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Metadata-wrapped listener with filter and enable flag.
struct ListenerEntry {
    listener: Box<dyn HotplugListener>,
    enabled: bool,
    filter: EventFilter,
}

/// Registry of hotplug listeners, dispatched in registration order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    order: Vec<u64>,
    listeners: HashMap<u64, ListenerEntry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its id.
    pub fn add_listener(
        &mut self,
        listener: impl HotplugListener + 'static,
        filter: EventFilter,
    ) -> u64 {
        let id = self.next_id;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
            },
        );
        self.order.push(id);
        self.next_id += 1;
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely. Returns whether it existed.
    pub fn remove_listener(&mut self, id: u64) -> bool {
        self.order.retain(|&i| i != id);
        self.listeners.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Emits one event to all active and matching listeners.
    fn emit(&mut self, event: &HotplugEvent) {
        for id in &self.order {
            let Some(entry) = self.listeners.get_mut(id) else {
                continue;
            };
            if entry.enabled && entry.filter.accepts(event) {
                entry.listener.on_hotplug(event);
            }
        }
    }

    /// Emits a batch of events to matching listeners.
    pub fn emit_all(&mut self, events: &[HotplugEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}
