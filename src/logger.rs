use crate::event::HotplugEvent;
use crate::eventbus::HotplugListener;

/// A listener that logs every hotplug transition through the `log` facade.
#[derive(Default)]
pub struct HotplugLogger;

impl HotplugLogger {
    pub fn new() -> Self {
        HotplugLogger
    }
}

impl HotplugListener for HotplugLogger {
    fn on_hotplug(&mut self, event: &HotplugEvent) {
        if event.connected {
            log::info!("[pad {}] connected", event.slot);
        } else {
            log::info!("[pad {}] disconnected", event.slot);
        }
    }
}
