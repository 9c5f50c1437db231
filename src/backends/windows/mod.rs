#![cfg(target_os = "windows")]

//! Windows raw device layer.
//!
//! Only XInput is supported. Most users reach it through
//! [`Manager::discover`](crate::manager::Manager::discover) rather than directly.

pub mod xinput_devices;

pub use xinput_devices::XInputBackend;
