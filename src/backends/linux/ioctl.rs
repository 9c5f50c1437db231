//! evdev ioctl request encoding (`linux/input.h`), as const fns.

use std::mem::size_of;

const NRBITS: u32 = 8;
const TYPEBITS: u32 = 8;
const READ: u32 = 2;

#[cfg(any(target_arch = "mips", target_arch = "mips64", target_arch = "powerpc", target_arch = "powerpc64"))]
mod consts {
    pub const SIZEBITS: u32 = 13;
}

#[cfg(not(any(target_arch = "mips", target_arch = "mips64", target_arch = "powerpc", target_arch = "powerpc64")))]
mod consts {
    pub const SIZEBITS: u32 = 14;
}

use consts::SIZEBITS;

const NRSHIFT: u32 = 0;
const TYPESHIFT: u32 = NRSHIFT + NRBITS;
const SIZESHIFT: u32 = TYPESHIFT + TYPEBITS;
const DIRSHIFT: u32 = SIZESHIFT + SIZEBITS;

const fn ioc(dir: u32, ty: u8, nr: u32, size: usize) -> u64 {
    ((dir << DIRSHIFT) | ((ty as u32) << TYPESHIFT) | (nr << NRSHIFT) | ((size as u32) << SIZESHIFT))
        as u64
}

/// `EVIOCGID`: bus type, vendor, product, version.
pub const fn eviocgid() -> u64 {
    ioc(READ, b'E', 0x02, size_of::<libc::input_id>())
}

/// `EVIOCGNAME(len)`: device name into a `len`-byte buffer.
pub const fn eviocgname(len: usize) -> u64 {
    ioc(READ, b'E', 0x06, len)
}

/// `EVIOCGBIT(ev, len)`: capability bitmap for event type `ev` (0 = event types).
pub const fn eviocgbit(ev: u16, len: usize) -> u64 {
    ioc(READ, b'E', 0x20 + ev as u32, len)
}

/// `EVIOCGABS(abs)`: calibration of one absolute axis.
pub const fn eviocgabs(abs: u16) -> u64 {
    ioc(READ, b'E', 0x40 + abs as u32, size_of::<libc::input_absinfo>())
}
