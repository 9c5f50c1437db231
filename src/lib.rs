//! padmap: gamepad slots, hotplug, and SDL-compatible mapping lookup.
//!
//! Raw controllers (evdev nodes on Linux, XInput slots on Windows, or a scripted
//! [`VirtualBackend`](backends::virtual_input::VirtualBackend)) feed a fixed set
//! of pad slots. Each connected pad is matched once against a mapping database
//! in the community `gamecontrollerdb.txt` format, and applications query a
//! stable, standardized vocabulary ([`GamepadButton`], [`GamepadAxis`]) instead
//! of device-specific raw indices.
//!
//! Start with [`Manager`]: call [`Manager::poll`] once per frame, then query.

pub mod backends;
pub mod binding;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod gamedb;
pub mod gamepad;
pub mod logger;
pub mod manager;
pub mod metadata;
pub mod pad;
pub mod resolver;
pub mod snapshot;

pub use binding::{Binding, HatMask, SourceKind};
pub use config::{BackendKind, Config};
pub use device::{Backend, RawLayout};
pub use error::Error;
pub use event::{HatAxis, HotplugEvent, InputKind};
pub use eventbus::{EventBus, EventFilter, HotplugListener};
pub use gamedb::{MappingDatabase, PadMapping, Platform};
pub use gamepad::{GamepadAxis, GamepadButton, Target};
pub use logger::HotplugLogger;
pub use manager::Manager;
pub use metadata::DeviceMeta;
pub use pad::PadState;
pub use resolver::{DatabaseResolver, FixedLayoutResolver, MappingResolver};
pub use snapshot::{PadSnapshot, Snapshot};

/// Simultaneous pad slots.
pub const MAX_PADS: usize = 4;
/// Raw buttons per pad.
pub const MAX_BUTTONS: usize = 32;
/// Raw axes per pad.
pub const MAX_AXES: usize = 8;
/// Pad name buffer size; names are truncated to `NAME_LEN - 1` bytes.
pub const NAME_LEN: usize = 256;
