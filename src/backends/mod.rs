//! Raw input backends for `padmap`.
//!
//! Implementations of [`Backend`](crate::device::Backend) for platform-specific
//! input sources.
//!
//! # Feature flags
//! - **`evdev`**: Linux evdev nodes with inotify hotplug (default).
//! - **`xinput`**: Windows XInput slots (default).
//!
//! The [`virtual_input`] backend is always available.

use crate::config::{BackendKind, Config};
use crate::device::Backend;
use crate::error::Error;

#[cfg(all(feature = "evdev", target_os = "linux"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "evdev", target_os = "linux"))))]
pub mod linux;

#[cfg(all(feature = "xinput", target_os = "windows"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "xinput", target_os = "windows"))))]
pub mod windows;

pub mod virtual_input;

/// Build the backend a [`Config`] asks for.
///
/// `auto` picks the native backend for the target, falling back to an empty
/// virtual backend where none is compiled in.
pub fn default_backend(config: &Config) -> Result<Box<dyn Backend>, Error> {
    match config.backend {
        BackendKind::Virtual => Ok(Box::new(virtual_input::VirtualBackend::new())),
        BackendKind::Evdev => evdev(config).ok_or_else(|| Error::BackendUnavailable("evdev".into())),
        BackendKind::Xinput => xinput().ok_or_else(|| Error::BackendUnavailable("xinput".into())),
        BackendKind::Auto => Ok(evdev(config).or_else(xinput).unwrap_or_else(|| {
            log::warn!("no native backend for this target, using an empty virtual backend");
            Box::new(virtual_input::VirtualBackend::new())
        })),
    }
}

#[cfg(all(feature = "evdev", target_os = "linux"))]
fn evdev(config: &Config) -> Option<Box<dyn Backend>> {
    Some(Box::new(linux::EvdevBackend::with_dir(
        &config.input_dir,
        config.rescan_ticks,
    )))
}

#[cfg(not(all(feature = "evdev", target_os = "linux")))]
fn evdev(_config: &Config) -> Option<Box<dyn Backend>> {
    None
}

#[cfg(all(feature = "xinput", target_os = "windows"))]
fn xinput() -> Option<Box<dyn Backend>> {
    Some(Box::new(windows::XInputBackend::new()))
}

#[cfg(not(all(feature = "xinput", target_os = "windows")))]
fn xinput() -> Option<Box<dyn Backend>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_is_always_available() {
        let config = Config {
            backend: BackendKind::Virtual,
            ..Config::default()
        };
        assert_eq!(default_backend(&config).unwrap().name(), "virtual");
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn xinput_unavailable_off_windows() {
        let config = Config {
            backend: BackendKind::Xinput,
            ..Config::default()
        };
        assert!(matches!(
            default_backend(&config),
            Err(Error::BackendUnavailable(name)) if name == "xinput"
        ));
    }
}
