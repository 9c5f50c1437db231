//! Windows XInput raw device layer.
//!
//! XInput exposes four fixed user slots (`0..4`) with an identical, already
//! standardized layout, so slot `i` maps straight onto pad slot `i` and the
//! manager pairs this backend with the fixed-layout resolver.
//!
//! # Raw layout
//! Buttons (14): `0` A, `1` B, `2` X, `3` Y, `4` LB, `5` RB, `6` Back, `7` Start,
//! `8` left stick, `9` right stick, `10..=13` D-pad up/down/left/right.
//!
//! Axes (6): `0` LX, `1` LY, `2` RX, `3` RY (sticks, dead zone removed and
//! rescaled to `[-1, 1]`), `4` LT, `5` RT (threshold removed, `[0, 1]`).
//!
//! Hat: D-pad, screen convention (`hat_y = -1` is up).
//!
//! XInput reports no vendor/product ids; both stay `0`.

use crate::device::{Backend, RawLayout};
use crate::event::HotplugEvent;
use crate::gamedb::Platform;
use crate::metadata::DeviceMeta;
use crate::pad::PadState;
use crate::MAX_PADS;

use windows_sys::Win32::UI::Input::XboxController::*;

const LEFT_THUMB_DEADZONE: i16 = 7849;
const RIGHT_THUMB_DEADZONE: i16 = 8689;
const TRIGGER_THRESHOLD: u8 = 30;

const BUTTON_COUNT: usize = 14;
const AXIS_COUNT: usize = 6;

/// `wButtons` bit of each raw button index.
const BUTTON_MAP: [u16; BUTTON_COUNT] = [
    XINPUT_GAMEPAD_A,
    XINPUT_GAMEPAD_B,
    XINPUT_GAMEPAD_X,
    XINPUT_GAMEPAD_Y,
    XINPUT_GAMEPAD_LEFT_SHOULDER,
    XINPUT_GAMEPAD_RIGHT_SHOULDER,
    XINPUT_GAMEPAD_BACK,
    XINPUT_GAMEPAD_START,
    XINPUT_GAMEPAD_LEFT_THUMB,
    XINPUT_GAMEPAD_RIGHT_THUMB,
    XINPUT_GAMEPAD_DPAD_UP,
    XINPUT_GAMEPAD_DPAD_DOWN,
    XINPUT_GAMEPAD_DPAD_LEFT,
    XINPUT_GAMEPAD_DPAD_RIGHT,
];

/// Remove the stick dead zone and rescale the rest to `[-1, 1]`.
fn apply_deadzone(value: i16, deadzone: i16) -> f32 {
    let (v, dz) = (value as f32, deadzone as f32);
    let scaled = if v > dz {
        (v - dz) / (32767.0 - dz)
    } else if v < -dz {
        (v + dz) / (32767.0 - dz)
    } else {
        0.0
    };
    scaled.clamp(-1.0, 1.0)
}

/// Remove the trigger threshold and rescale the rest to `[0, 1]`.
fn normalize_trigger(value: u8, threshold: u8) -> f32 {
    if value > threshold {
        (value - threshold) as f32 / (255 - threshold) as f32
    } else {
        0.0
    }
}

/// Write one XInput reading into a pad slot.
fn write_gamepad(pad: &mut PadState, gp: &XINPUT_GAMEPAD) {
    let w = gp.wButtons;
    for (i, &mask) in BUTTON_MAP.iter().enumerate() {
        pad.buttons[i] = w & mask != 0;
    }

    pad.axes[0] = apply_deadzone(gp.sThumbLX, LEFT_THUMB_DEADZONE);
    pad.axes[1] = apply_deadzone(gp.sThumbLY, LEFT_THUMB_DEADZONE);
    pad.axes[2] = apply_deadzone(gp.sThumbRX, RIGHT_THUMB_DEADZONE);
    pad.axes[3] = apply_deadzone(gp.sThumbRY, RIGHT_THUMB_DEADZONE);
    pad.axes[4] = normalize_trigger(gp.bLeftTrigger, TRIGGER_THRESHOLD);
    pad.axes[5] = normalize_trigger(gp.bRightTrigger, TRIGGER_THRESHOLD);

    pad.hat_x = 0.0;
    pad.hat_y = 0.0;
    if w & XINPUT_GAMEPAD_DPAD_LEFT != 0 {
        pad.hat_x = -1.0;
    }
    if w & XINPUT_GAMEPAD_DPAD_RIGHT != 0 {
        pad.hat_x = 1.0;
    }
    if w & XINPUT_GAMEPAD_DPAD_UP != 0 {
        pad.hat_y = -1.0;
    }
    if w & XINPUT_GAMEPAD_DPAD_DOWN != 0 {
        pad.hat_y = 1.0;
    }
}

/// XInput-backed raw layer over user slots `0..4`.
#[derive(Debug, Default)]
pub struct XInputBackend;

impl XInputBackend {
    pub fn new() -> Self {
        XInputBackend
    }
}

impl Backend for XInputBackend {
    fn name(&self) -> &'static str {
        "xinput"
    }

    fn layout(&self) -> RawLayout {
        RawLayout::Fixed
    }

    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn poll(&mut self, pads: &mut [PadState], events: &mut Vec<HotplugEvent>) {
        for (slot, pad) in pads.iter_mut().enumerate().take(MAX_PADS) {
            // SAFETY: XINPUT_STATE is plain old data; XInputGetState fills it.
            let mut state: XINPUT_STATE = unsafe { std::mem::zeroed() };
            let res = unsafe { XInputGetState(slot as u32, &mut state) };

            if res == 0 {
                if !pad.connected {
                    let meta = DeviceMeta {
                        bus: Some("xinput".to_owned()),
                        path: Some(format!("xinput:{slot}")),
                        ..DeviceMeta::default()
                    };
                    pad.attach(
                        &format!("XInput Controller {slot}"),
                        0,
                        0,
                        BUTTON_COUNT,
                        AXIS_COUNT,
                        meta,
                    );
                    log::info!("[pad {slot}] XInput controller attached");
                    events.push(HotplugEvent::connected(slot));
                }
                write_gamepad(pad, &state.Gamepad);
            } else if pad.connected {
                log::info!("[pad {slot}] XInput controller removed");
                pad.detach();
                events.push(HotplugEvent::disconnected(slot));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadzone_rescales_sticks() {
        assert_eq!(apply_deadzone(7000, LEFT_THUMB_DEADZONE), 0.0);
        assert_eq!(apply_deadzone(32767, LEFT_THUMB_DEADZONE), 1.0);
        assert_eq!(apply_deadzone(-32768, LEFT_THUMB_DEADZONE), -1.0);
        assert!(apply_deadzone(20000, RIGHT_THUMB_DEADZONE) > 0.0);
    }

    #[test]
    fn triggers_rescale_above_threshold() {
        assert_eq!(normalize_trigger(30, TRIGGER_THRESHOLD), 0.0);
        assert_eq!(normalize_trigger(255, TRIGGER_THRESHOLD), 1.0);
    }

    #[test]
    fn dpad_sets_buttons_and_hat() {
        let mut pad = PadState::default();
        pad.attach("XInput Controller 0", 0, 0, BUTTON_COUNT, AXIS_COUNT, DeviceMeta::default());
        let mut gp: XINPUT_GAMEPAD = unsafe { std::mem::zeroed() };
        gp.wButtons = XINPUT_GAMEPAD_A | XINPUT_GAMEPAD_DPAD_UP | XINPUT_GAMEPAD_DPAD_RIGHT;
        write_gamepad(&mut pad, &gp);
        assert!(pad.button(0));
        assert!(pad.button(10));
        assert!(pad.button(13));
        assert!(!pad.button(11));
        assert_eq!((pad.hat_x, pad.hat_y), (1.0, -1.0));
    }
}
