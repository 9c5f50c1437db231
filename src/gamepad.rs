//! Standardized gamepad vocabulary.
//!
//! Applications query against these ids; raw layouts vary per device and are
//! translated *into* this set by a [`PadMapping`](crate::gamedb::PadMapping).
//!
//! The ordering is stable and doubles as the index into mapping tables and
//! snapshots.

use serde::{Deserialize, Serialize};

/// Standardized gamepad buttons.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadButton {
    /// Also Cross.
    A = 0,
    /// Also Circle.
    B,
    /// Also Square.
    X,
    /// Also Triangle.
    Y,
    LeftBumper,
    RightBumper,
    Back,
    Start,
    Guide,
    LeftThumb,
    RightThumb,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl GamepadButton {
    /// Number of standardized buttons.
    pub const COUNT: usize = 15;

    /// All buttons in index order.
    pub const ALL: [GamepadButton; Self::COUNT] = [
        GamepadButton::A,
        GamepadButton::B,
        GamepadButton::X,
        GamepadButton::Y,
        GamepadButton::LeftBumper,
        GamepadButton::RightBumper,
        GamepadButton::Back,
        GamepadButton::Start,
        GamepadButton::Guide,
        GamepadButton::LeftThumb,
        GamepadButton::RightThumb,
        GamepadButton::DpadUp,
        GamepadButton::DpadDown,
        GamepadButton::DpadLeft,
        GamepadButton::DpadRight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Button for a table index, `None` when out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Field name used by the mapping database (`leftshoulder`, `dpup`, ...).
    pub fn db_name(self) -> &'static str {
        match self {
            GamepadButton::A => "a",
            GamepadButton::B => "b",
            GamepadButton::X => "x",
            GamepadButton::Y => "y",
            GamepadButton::LeftBumper => "leftshoulder",
            GamepadButton::RightBumper => "rightshoulder",
            GamepadButton::Back => "back",
            GamepadButton::Start => "start",
            GamepadButton::Guide => "guide",
            GamepadButton::LeftThumb => "leftstick",
            GamepadButton::RightThumb => "rightstick",
            GamepadButton::DpadUp => "dpup",
            GamepadButton::DpadDown => "dpdown",
            GamepadButton::DpadLeft => "dpleft",
            GamepadButton::DpadRight => "dpright",
        }
    }
}

/// Standardized gamepad axes.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadAxis {
    LeftX = 0,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

impl GamepadAxis {
    /// Number of standardized axes.
    pub const COUNT: usize = 6;

    /// All axes in index order.
    pub const ALL: [GamepadAxis; Self::COUNT] = [
        GamepadAxis::LeftX,
        GamepadAxis::LeftY,
        GamepadAxis::RightX,
        GamepadAxis::RightY,
        GamepadAxis::LeftTrigger,
        GamepadAxis::RightTrigger,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Field name used by the mapping database (`leftx`, `lefttrigger`, ...).
    pub fn db_name(self) -> &'static str {
        match self {
            GamepadAxis::LeftX => "leftx",
            GamepadAxis::LeftY => "lefty",
            GamepadAxis::RightX => "rightx",
            GamepadAxis::RightY => "righty",
            GamepadAxis::LeftTrigger => "lefttrigger",
            GamepadAxis::RightTrigger => "righttrigger",
        }
    }
}

/// The left-hand side of a `target:source` database field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Button(GamepadButton),
    Axis(GamepadAxis),
}

impl Target {
    /// Resolve a database field name to a standardized id.
    ///
    /// Unknown names (including `platform`, `hint` and half-axis targets such
    /// as `+leftx`) return `None`; callers skip the field.
    pub fn from_name(name: &str) -> Option<Target> {
        if let Some(button) = GamepadButton::ALL.iter().find(|b| b.db_name() == name) {
            return Some(Target::Button(*button));
        }
        GamepadAxis::ALL
            .iter()
            .find(|a| a.db_name() == name)
            .map(|a| Target::Axis(*a))
    }

    pub fn is_axis(self) -> bool {
        matches!(self, Target::Axis(_))
    }
}
