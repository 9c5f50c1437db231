//! Standardized view: buttons by name, sticks and triggers, with hotplug logging.
//!
//! Run with `RUST_LOG=info` to see connect/disconnect lines.

use std::time::Duration;

use padmap::{EventFilter, GamepadAxis, GamepadButton, HotplugLogger, Manager, MAX_PADS};

fn main() {
    env_logger::init();
    let mut mgr = match std::env::args().nth(1) {
        Some(path) => {
            let config = padmap::Config::load(&path).unwrap_or_else(|err| {
                eprintln!("{err}");
                std::process::exit(1);
            });
            Manager::from_config(&config).unwrap_or_else(|err| {
                eprintln!("{err}");
                std::process::exit(1);
            })
        }
        None => Manager::discover(),
    };
    mgr.add_listener(HotplugLogger::new(), EventFilter::All);

    loop {
        mgr.poll();
        for slot in 0..MAX_PADS {
            if !mgr.connected(slot) {
                continue;
            }
            for button in GamepadButton::ALL {
                if mgr.gamepad_button_pressed(slot, button) {
                    println!(
                        "pad {slot}: {button:?}  L=({:+.2},{:+.2}) R=({:+.2},{:+.2}) LT={:.2} RT={:.2}",
                        mgr.gamepad_axis(slot, GamepadAxis::LeftX),
                        mgr.gamepad_axis(slot, GamepadAxis::LeftY),
                        mgr.gamepad_axis(slot, GamepadAxis::RightX),
                        mgr.gamepad_axis(slot, GamepadAxis::RightY),
                        mgr.gamepad_axis(slot, GamepadAxis::LeftTrigger),
                        mgr.gamepad_axis(slot, GamepadAxis::RightTrigger),
                    );
                }
            }
        }
        std::thread::sleep(Duration::from_millis(16));
    }
}
