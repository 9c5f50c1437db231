//! Raw view: every connected slot's raw buttons, axes and hat.

use std::time::Duration;

use padmap::{Manager, MAX_PADS};

fn main() {
    env_logger::init();
    let mut mgr = Manager::discover();
    println!("Raw pad monitor. Connect a controller...");

    loop {
        for event in mgr.poll() {
            if event.connected {
                println!(
                    "Pad {} connected: {} (vendor:{:04x} product:{:04x})",
                    event.slot,
                    mgr.name(event.slot),
                    mgr.vendor_id(event.slot),
                    mgr.product_id(event.slot)
                );
            } else {
                println!("Pad {} disconnected", event.slot);
            }
        }

        for slot in 0..MAX_PADS {
            if !mgr.connected(slot) {
                continue;
            }
            let pressed: Vec<usize> = (0..mgr.button_count(slot))
                .filter(|&b| mgr.button_pressed(slot, b))
                .collect();
            if pressed.is_empty() {
                continue;
            }
            let axes: Vec<String> = (0..mgr.axis_count(slot))
                .map(|a| format!("{:+.2}", mgr.axis(slot, a)))
                .collect();
            println!(
                "pad {slot}: pressed {pressed:?} axes [{}] hat ({}, {})",
                axes.join(" "),
                mgr.hat_x(slot),
                mgr.hat_y(slot)
            );
        }

        std::thread::sleep(Duration::from_millis(16));
    }
}
