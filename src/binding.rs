//! Source bindings and the resolution engine.
//!
//! A [`Binding`] is the right-hand side of a `target:source` database field: it
//! says which raw button, axis or hat bit feeds one standardized input. Parsing is
//! forgiving; anything malformed becomes [`Binding::None`], which reads as
//! released / `0.0`.
//!
//! ## Source grammar
//! ```text
//! source := sign? ( 'b' int | 'a' int '~'? | 'h' int '.' mask )
//! sign   := '+' | '-'
//! ```
//! - `-` inverts only axis sources; on buttons and hats it is accepted and ignored.
//! - A trailing `~` on an axis toggles inversion.
//! - `mask` is a hat bitmask: 1 = up, 2 = right, 4 = down, 8 = left.
//!
//! ## Resolution
//! Digital reads of analog sources and hat components use a fixed `0.5`
//! threshold ([`DIGITAL_THRESHOLD`]).

use crate::pad::PadState;

/// Magnitude above which an analog value counts as pressed.
pub const DIGITAL_THRESHOLD: f32 = 0.5;

/// Longest accepted source token, in bytes. Longer fields are skipped.
pub const MAX_TOKEN_LEN: usize = 31;

/// Hat direction bitmask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HatMask(pub u8);

impl HatMask {
    pub const UP: HatMask = HatMask(1);
    pub const RIGHT: HatMask = HatMask(2);
    pub const DOWN: HatMask = HatMask(4);
    pub const LEFT: HatMask = HatMask(8);

    /// Current direction bits of a pad's hat.
    pub fn from_hat(hat_x: f32, hat_y: f32) -> HatMask {
        let mut bits = 0;
        if hat_y < -DIGITAL_THRESHOLD {
            bits |= Self::UP.0;
        }
        if hat_x > DIGITAL_THRESHOLD {
            bits |= Self::RIGHT.0;
        }
        if hat_y > DIGITAL_THRESHOLD {
            bits |= Self::DOWN.0;
        }
        if hat_x < -DIGITAL_THRESHOLD {
            bits |= Self::LEFT.0;
        }
        HatMask(bits)
    }

    #[inline]
    pub fn intersects(self, other: HatMask) -> bool {
        self.0 & other.0 != 0
    }
}

/// Kind of raw source a binding reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    None,
    Button,
    Axis,
    Hat,
}

/// One standardized input's raw source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Unbound or malformed. Always released / `0.0`.
    #[default]
    None,
    /// Raw button index.
    Button(u8),
    /// Raw axis index, optionally negated.
    Axis { index: u8, invert: bool },
    /// Hat index and direction mask.
    Hat { hat: u8, mask: HatMask },
}

/// Why a source token was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceError {
    Empty,
    TooLong,
    UnknownKind(u8),
    MissingIndex,
    MissingHatMask,
    BadHatMask,
    Trailing(u8),
}

impl Binding {
    pub fn kind(&self) -> SourceKind {
        match self {
            Binding::None => SourceKind::None,
            Binding::Button(_) => SourceKind::Button,
            Binding::Axis { .. } => SourceKind::Axis,
            Binding::Hat { .. } => SourceKind::Hat,
        }
    }

    /// Parse a source token, e.g. `b0`, `a2`, `-a3`, `h0.4`.
    ///
    /// Never fails: malformed tokens yield [`Binding::None`].
    pub fn parse(token: &str) -> Binding {
        match Self::try_parse(token) {
            Ok(binding) => binding,
            Err(err) => {
                log::trace!("ignoring mapping source {token:?}: {err:?}");
                Binding::None
            }
        }
    }

    /// Strict variant of [`Binding::parse`] that reports why a token was rejected.
    pub fn try_parse(token: &str) -> Result<Binding, SourceError> {
        let bytes = token.as_bytes();
        if bytes.is_empty() {
            return Err(SourceError::Empty);
        }
        if bytes.len() > MAX_TOKEN_LEN {
            return Err(SourceError::TooLong);
        }

        let mut cur = Cursor::new(bytes);
        let mut invert = match cur.peek() {
            Some(b'+') => {
                cur.bump();
                false
            }
            Some(b'-') => {
                cur.bump();
                true
            }
            _ => false,
        };

        let kind = cur.bump().ok_or(SourceError::Empty)?;
        let binding = match kind {
            b'b' => Binding::Button(cur.number().ok_or(SourceError::MissingIndex)?),
            b'a' => {
                let index = cur.number().ok_or(SourceError::MissingIndex)?;
                if cur.peek() == Some(b'~') {
                    cur.bump();
                    invert = !invert;
                }
                Binding::Axis { index, invert }
            }
            b'h' => {
                let hat = cur.number().ok_or(SourceError::MissingIndex)?;
                if cur.bump() != Some(b'.') {
                    return Err(SourceError::MissingHatMask);
                }
                let mask = cur.number().ok_or(SourceError::MissingHatMask)?;
                if mask == 0 || mask > 0x0f {
                    return Err(SourceError::BadHatMask);
                }
                Binding::Hat {
                    hat,
                    mask: HatMask(mask),
                }
            }
            other => return Err(SourceError::UnknownKind(other)),
        };

        match cur.peek() {
            None => Ok(binding),
            Some(b) => Err(SourceError::Trailing(b)),
        }
    }

    /// Digital level of this source on `pad`.
    pub fn read_button(&self, pad: &PadState) -> bool {
        match *self {
            Binding::None => false,
            Binding::Button(index) => pad.button(index as usize),
            Binding::Axis { index, .. } => pad.axis(index as usize).abs() > DIGITAL_THRESHOLD,
            // Single hat per pad; the hat index is not consulted.
            Binding::Hat { mask, .. } => HatMask::from_hat(pad.hat_x, pad.hat_y).intersects(mask),
        }
    }

    /// Press edge of this source on `pad`.
    ///
    /// Only button sources carry edge state; axis and hat sources never report a
    /// press edge.
    pub fn read_button_pressed(&self, pad: &PadState) -> bool {
        match *self {
            Binding::Button(index) => pad.button_pressed(index as usize),
            _ => false,
        }
    }

    /// Analog value of this source on `pad`.
    ///
    /// Button sources read `1.0` / `0.0` (digital triggers). Hat sources read `0.0`.
    pub fn read_axis(&self, pad: &PadState) -> f32 {
        match *self {
            Binding::Axis { index, invert } => {
                let v = pad.axis(index as usize);
                if invert {
                    -v
                } else {
                    v
                }
            }
            Binding::Button(index) => {
                if pad.button(index as usize) {
                    1.0
                } else {
                    0.0
                }
            }
            Binding::None | Binding::Hat { .. } => 0.0,
        }
    }
}

/// Bounded byte cursor over a single token.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Decimal number fitting in a `u8`. `None` if no digits or overflow.
    fn number(&mut self) -> Option<u8> {
        let start = self.pos;
        let mut value: u8 = 0;
        while let Some(b) = self.peek().filter(u8::is_ascii_digit) {
            value = value.checked_mul(10)?.checked_add(b - b'0')?;
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }
}
