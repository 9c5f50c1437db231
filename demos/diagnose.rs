//! Print what the manager knows about each pad: identity, GUID, resolved mapping.
//!
//! Pads without a database record get a blank mapping line to fill in and
//! add through `mapping_files`.

use std::time::{Duration, Instant};

use padmap::{Backend, Manager, PadMapping, MAX_PADS};

fn main() {
    env_logger::init();
    let mut mgr = Manager::discover();
    let platform = mgr.backend().platform();
    println!("backend: {} ({platform})", mgr.backend().name());

    // Give hotplug a moment to settle.
    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(500) {
        mgr.poll();
        std::thread::sleep(Duration::from_millis(16));
    }

    for slot in 0..MAX_PADS {
        let Some(pad) = mgr.pad(slot).filter(|p| p.connected) else {
            continue;
        };
        println!("== pad {slot}: {} ==", pad.name);
        println!(
            "  ids {:04x}:{:04x}  buttons {}  axes {}  guid {}",
            pad.vendor_id,
            pad.product_id,
            pad.button_count(),
            pad.axis_count(),
            pad.guid()
        );
        if let Some(path) = &pad.meta.path {
            println!("  node {path}");
        }
        match mgr.mapping(slot) {
            Some(mapping) => println!("  mapping {}", mapping.to_db_line(platform)),
            None => {
                let mut blank = PadMapping::unbound(pad.name.clone());
                blank.guid = pad.guid();
                println!("  no mapping; template:\n  {}", blank.to_db_line(platform));
            }
        }
    }

    match mgr.snapshot().to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("{err}"),
    }
}
