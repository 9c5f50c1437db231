//! Scripted pads, no hardware needed.

use padmap::backends::virtual_input::{VirtualBackend, VirtualPad};
use padmap::{EventFilter, GamepadAxis, GamepadButton, HotplugEvent, Manager, Platform};

fn main() {
    env_logger::init();
    let mut mgr = Manager::new(VirtualBackend::new().with_platform(Platform::Linux));
    mgr.add_listener(
        |e: &HotplugEvent| println!("slot {} connected={}", e.slot, e.connected),
        EventFilter::All,
    );

    // A PS4 pad: raw button 1 is "a", D-pad on the hat.
    mgr.backend_mut()
        .plug(0, VirtualPad::new("Wireless Controller", 0x054c, 0x05c4));
    mgr.poll();
    println!("mapped as {:?}", mgr.mapping(0).map(|m| m.name.as_str()));

    mgr.backend_mut().press_button(0, 1);
    mgr.backend_mut().set_axis(0, 1, -0.8);
    mgr.backend_mut().set_hat(0, 0, -1);
    mgr.poll();
    println!(
        "A pressed={} dpad up={} left y={:+.2}",
        mgr.gamepad_button_pressed(0, GamepadButton::A),
        mgr.gamepad_button(0, GamepadButton::DpadUp),
        mgr.gamepad_axis(0, GamepadAxis::LeftY)
    );

    mgr.backend_mut().fail(0);
    mgr.poll();
    println!("after read failure: connected={}", mgr.connected(0));

    match mgr.snapshot().to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("{err}"),
    }
}
