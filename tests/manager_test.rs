// Manager behavior over the scripted backend.
use std::sync::{Arc, Mutex};

use padmap::backends::virtual_input::{VirtualBackend, VirtualPad};
use padmap::{
    Backend, DatabaseResolver, DeviceMeta, EventFilter, GamepadAxis, GamepadButton, HotplugEvent,
    Manager, MappingDatabase, PadState, Platform, RawLayout, MAX_AXES, MAX_BUTTONS,
};

fn linux_manager() -> Manager<VirtualBackend> {
    Manager::new(VirtualBackend::new().with_platform(Platform::Linux))
}

fn xbox360() -> VirtualPad {
    VirtualPad::new("Xbox 360 Controller", 0x045e, 0x028e)
}

fn ps4() -> VirtualPad {
    VirtualPad::new("Wireless Controller", 0x054c, 0x05c4)
}

#[test]
fn connect_resolves_builtin_mapping() {
    let mut m = linux_manager();
    m.backend_mut().plug(0, xbox360());
    let events = m.poll();
    assert_eq!(events.len(), 1);
    assert!(m.connected(0));
    assert_eq!(m.name(0), "Xbox 360 Controller");
    let mapping = m.mapping(0).expect("xbox 360 is in the built-in table");
    // First of the duplicate 045e:028e records wins.
    assert_eq!(mapping.guid, "030000005e0400008e02000014010000");
}

#[test]
fn press_edge_lasts_one_tick() {
    let mut m = linux_manager();
    m.backend_mut().plug(0, xbox360());
    m.poll();
    assert!(!m.gamepad_button(0, GamepadButton::A));

    m.backend_mut().press_button(0, 0);
    m.poll();
    assert!(m.gamepad_button(0, GamepadButton::A));
    assert!(m.gamepad_button_pressed(0, GamepadButton::A));
    assert!(m.button_pressed(0, 0));

    m.poll();
    assert!(m.gamepad_button(0, GamepadButton::A));
    assert!(!m.gamepad_button_pressed(0, GamepadButton::A));

    m.backend_mut().release_button(0, 0);
    m.poll();
    assert!(m.button_released(0, 0));
    assert!(!m.gamepad_button(0, GamepadButton::A));
}

#[test]
fn queries_do_not_mutate_state() {
    let mut m = linux_manager();
    m.backend_mut().plug(0, ps4());
    m.poll();
    m.backend_mut().press_button(0, 1);
    m.backend_mut().set_axis(0, 0, 0.75);
    m.poll();

    let first = (
        m.gamepad_button_pressed(0, GamepadButton::A),
        m.gamepad_axis(0, GamepadAxis::LeftX),
        m.snapshot(),
    );
    let second = (
        m.gamepad_button_pressed(0, GamepadButton::A),
        m.gamepad_axis(0, GamepadAxis::LeftX),
        m.snapshot(),
    );
    assert_eq!(first, second);
    assert!(first.0);
    assert_eq!(first.1, 0.75);
}

#[test]
fn reconnect_with_other_device_re_resolves() {
    let mut m = linux_manager();
    m.backend_mut().plug(0, xbox360());
    m.poll();
    assert_eq!(m.mapping(0).unwrap().name, "Xbox 360 Controller");

    m.backend_mut().unplug(0);
    m.poll();
    assert!(!m.connected(0));
    assert!(m.mapping(0).is_none());

    m.backend_mut().plug(0, ps4());
    m.poll();
    assert_eq!(m.mapping(0).unwrap().name, "PS4 Controller");

    // PS4 "a" is raw button 1; raw 0 is "x".
    m.backend_mut().press_button(0, 0);
    m.poll();
    assert!(m.gamepad_button(0, GamepadButton::X));
    assert!(!m.gamepad_button(0, GamepadButton::A));
}

#[test]
fn swap_within_one_tick_re_resolves() {
    let mut m = linux_manager();
    m.backend_mut().plug(0, xbox360());
    m.poll();
    m.backend_mut().unplug(0);
    m.backend_mut().plug(0, ps4());
    let events = m.poll();
    assert_eq!(events.len(), 2);
    assert_eq!(m.mapping(0).unwrap().name, "PS4 Controller");
}

#[test]
fn unknown_device_has_only_raw_state() {
    let mut m = linux_manager();
    m.backend_mut().plug(1, VirtualPad::new("Mystery Pad", 0, 0));
    m.poll();
    m.backend_mut().press_button(1, 0);
    m.backend_mut().set_axis(1, 0, 1.0);
    m.poll();

    assert!(m.connected(1));
    assert!(!m.has_mapping(1));
    for button in GamepadButton::ALL {
        assert!(!m.gamepad_button(1, button));
        assert!(!m.gamepad_button_pressed(1, button));
    }
    for axis in GamepadAxis::ALL {
        assert_eq!(m.gamepad_axis(1, axis), 0.0);
    }
    assert!(m.button(1, 0));
    assert_eq!(m.axis(1, 0), 1.0);
    assert!(!m.snapshot().get(1).unwrap().mapped);
}

#[test]
fn hat_drives_dpad_buttons() {
    let mut m = linux_manager();
    m.backend_mut().plug(0, ps4());
    m.poll();

    m.backend_mut().set_hat(0, 0, -1);
    m.poll();
    assert!(m.gamepad_button(0, GamepadButton::DpadUp));
    assert!(!m.gamepad_button(0, GamepadButton::DpadDown));
    assert!(!m.gamepad_button(0, GamepadButton::DpadLeft));
    assert!(!m.gamepad_button(0, GamepadButton::DpadRight));
    // Hat sources have no press edge.
    assert!(!m.gamepad_button_pressed(0, GamepadButton::DpadUp));

    m.backend_mut().set_hat(0, 1, 0);
    m.poll();
    assert!(m.gamepad_button(0, GamepadButton::DpadRight));
    assert!(!m.gamepad_button(0, GamepadButton::DpadUp));
}

#[test]
fn read_failure_tears_down_slot() {
    let mut m = linux_manager();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    m.add_listener(
        move |e: &HotplugEvent| sink.lock().unwrap().push((e.slot, e.connected)),
        EventFilter::All,
    );

    m.backend_mut().plug(2, xbox360());
    m.poll();
    m.backend_mut().press_button(2, 0);
    m.poll();

    m.backend_mut().fail(2);
    let events = m.poll();
    assert_eq!(events.len(), 1);
    assert!(!m.connected(2));
    assert_eq!(m.name(2), "");
    assert!(m.button_released(2, 0));
    assert!(!m.gamepad_button(2, GamepadButton::A));
    assert_eq!(*seen.lock().unwrap(), vec![(2, true), (2, false)]);

    // No repeat notification on later ticks.
    assert!(m.poll().is_empty());
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn listeners_filter_and_queue_drains() {
    let mut m = linux_manager();
    let connects = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&connects);
    let id = m.add_listener(
        move |_: &HotplugEvent| *sink.lock().unwrap() += 1,
        EventFilter::ConnectOnly,
    );

    m.backend_mut().plug(0, xbox360());
    m.backend_mut().plug(1, ps4());
    m.poll();
    assert_eq!(*connects.lock().unwrap(), 2);

    m.disable_listener(id);
    m.backend_mut().unplug(1);
    m.backend_mut().plug(1, ps4());
    m.poll();
    assert_eq!(*connects.lock().unwrap(), 2);

    let drained: Vec<(usize, bool)> = m
        .drain_events()
        .into_iter()
        .map(|e| (e.slot, e.connected))
        .collect();
    assert_eq!(drained, vec![(0, true), (1, true), (1, false), (1, true)]);
    assert!(m.drain_events().is_empty());
    assert!(m.remove_listener(id));
}

#[test]
fn fixed_layout_maps_every_device() {
    let mut m = Manager::new(VirtualBackend::with_layout(RawLayout::Fixed));
    m.backend_mut().plug(0, VirtualPad::new("XInput Controller 0", 0, 0).with_counts(14, 6));
    m.poll();
    assert!(m.has_mapping(0));

    m.backend_mut().press_button(0, 10);
    m.backend_mut().set_axis(0, 5, 0.4);
    m.poll();
    assert!(m.gamepad_button_pressed(0, GamepadButton::DpadUp));
    assert!(!m.gamepad_button(0, GamepadButton::Guide));
    assert_eq!(m.gamepad_axis(0, GamepadAxis::RightTrigger), 0.4);
}

#[test]
fn user_records_override_builtin() {
    let mut db = MappingDatabase::builtin();
    db.add_text(
        "030000005e0400008e02000099990000,My Remapped Pad,a:b3,leftx:-a0,lefttrigger:b4,righttrigger:a5,platform:Linux,\n",
    );
    let mut m = Manager::with_resolver(
        VirtualBackend::new().with_platform(Platform::Linux),
        Box::new(DatabaseResolver::new(db, Platform::Linux)),
    );
    m.backend_mut().plug(0, xbox360());
    m.poll();
    assert_eq!(m.mapping(0).unwrap().name, "My Remapped Pad");

    m.backend_mut().press_button(0, 3);
    m.backend_mut().press_button(0, 4);
    m.backend_mut().set_axis(0, 0, 0.6);
    m.backend_mut().set_axis(0, 5, 0.7);
    m.poll();
    assert!(m.gamepad_button(0, GamepadButton::A));
    assert_eq!(m.gamepad_axis(0, GamepadAxis::LeftX), -0.6);
    // Digital trigger reads as a full-scale axis.
    assert_eq!(m.gamepad_axis(0, GamepadAxis::LeftTrigger), 1.0);
    assert_eq!(m.gamepad_axis(0, GamepadAxis::RightTrigger), 0.7);
    // Unbound targets stay inactive.
    assert!(!m.gamepad_button(0, GamepadButton::B));
}

#[test]
fn platform_tag_filters_records() {
    let mut m = Manager::new(VirtualBackend::new().with_platform(Platform::Ios));
    m.backend_mut().plug(0, xbox360());
    m.poll();
    assert!(m.connected(0));
    assert!(!m.has_mapping(0));
}

/// Out-of-tree backend that claims more inputs than a slot can hold.
struct Oversized {
    plugged: bool,
}

impl Backend for Oversized {
    fn name(&self) -> &'static str {
        "oversized"
    }

    fn layout(&self) -> RawLayout {
        RawLayout::Fixed
    }

    fn poll(&mut self, pads: &mut [PadState], events: &mut Vec<HotplugEvent>) {
        if !self.plugged {
            self.plugged = true;
            pads[0].attach("Big Pad", 1, 2, 40, 12, DeviceMeta::default());
            events.push(HotplugEvent::connected(0));
        }
        pads[0].buttons[MAX_BUTTONS - 1] = true;
        pads[0].axes[MAX_AXES - 1] = 0.9;
    }
}

#[test]
fn oversized_backend_counts_are_clamped() {
    let mut m = Manager::new(Oversized { plugged: false });
    m.poll();
    assert_eq!(m.button_count(0), MAX_BUTTONS);
    assert_eq!(m.axis_count(0), MAX_AXES);

    assert!(m.button(0, MAX_BUTTONS - 1));
    assert_eq!(m.axis(0, MAX_AXES - 1), 0.9);
    assert!(!m.button(0, 35));
    assert!(!m.button_pressed(0, 35));
    assert!(!m.button_released(0, 35));
    assert_eq!(m.axis(0, 10), 0.0);
    assert!(!m.gamepad_button(0, GamepadButton::A));
    assert_eq!(m.gamepad_axis(0, GamepadAxis::LeftX), 0.0);
}

#[test]
fn manager_can_move_across_threads() {
    fn assert_send<T: Send>() {}
    assert_send::<Manager>();
    assert_send::<Manager<VirtualBackend>>();
}
