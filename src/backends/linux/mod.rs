//! Linux raw device layer: evdev nodes plus inotify hotplug.
//!
//! Every `event*` node under the input directory is probed once; gamepads are
//! opened non-blocking into the first free slot. Each poll:
//!
//! 1. drains the inotify watch (create → open + arm rescans, delete → teardown),
//! 2. rescans the directory while the rescan countdown is armed (udev may still
//!    be fixing permissions on a freshly created node),
//! 3. drains every open node until `EAGAIN`.
//!
//! A read error other than would-block tears the slot down and reports a
//! disconnect. There is no retry for that device instance.

mod codes;
mod ioctl;
mod node;

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::mem::{size_of, size_of_val};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use self::codes::{ABS_CNT, EV_ABS, EV_CNT, EV_KEY, KEY_CNT};
use self::node::{bitmap_len, is_gamepad, AxisInfo, NodeLayout};
use crate::device::{Backend, RawLayout};
use crate::event::HotplugEvent;
use crate::gamedb::Platform;
use crate::metadata::DeviceMeta;
use crate::pad::PadState;
use crate::{MAX_PADS, NAME_LEN};

pub use crate::config::{DEFAULT_INPUT_DIR as INPUT_DIR, DEFAULT_RESCAN_TICKS as RESCAN_TICKS};

const FALLBACK_NAME: &str = "Unknown Gamepad";

/// One opened node bound to a pad slot.
struct EvdevNode {
    file: File,
    path: PathBuf,
    layout: NodeLayout,
}

/// evdev + inotify backend.
pub struct EvdevBackend {
    input_dir: PathBuf,
    rescan_ticks: u32,
    nodes: [Option<EvdevNode>; MAX_PADS],
    watch: Option<OwnedFd>,
    rescan_countdown: u32,
    initial_scan: bool,
}

impl EvdevBackend {
    /// Backend over `/dev/input` with the default rescan window.
    pub fn new() -> Self {
        Self::with_dir(INPUT_DIR, RESCAN_TICKS)
    }

    /// Backend over an arbitrary node directory.
    ///
    /// The directory is scanned on the first poll so that the initial connects
    /// are reported like any later one.
    pub fn with_dir(input_dir: impl Into<PathBuf>, rescan_ticks: u32) -> Self {
        let input_dir = input_dir.into();
        let watch = watch_dir(&input_dir);
        if watch.is_none() {
            log::warn!(
                "no hotplug watch on {}, only devices present at startup are seen",
                input_dir.display()
            );
        }
        Self {
            input_dir,
            rescan_ticks,
            nodes: Default::default(),
            watch,
            rescan_countdown: 0,
            initial_scan: true,
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    fn find_by_path(&self, path: &Path) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.as_ref().map_or(false, |n| n.path == path))
    }

    fn scan(&mut self, pads: &mut [PadState], events: &mut Vec<HotplugEvent>) {
        let entries = match std::fs::read_dir(&self.input_dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::debug!("cannot scan {}: {err}", self.input_dir.display());
                return;
            }
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|e| is_event_node(e.file_name().as_bytes()))
            .map(|e| e.path())
            .collect();
        paths.sort();
        for path in paths {
            self.try_open(&path, pads, events);
        }
    }

    fn try_open(&mut self, path: &Path, pads: &mut [PadState], events: &mut Vec<HotplugEvent>) {
        if self.find_by_path(path).is_some() {
            return;
        }
        let Some(slot) = (0..MAX_PADS.min(pads.len()))
            .find(|&i| self.nodes[i].is_none() && !pads[i].connected)
        else {
            return;
        };
        let file = match OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK | libc::O_CLOEXEC)
            .open(path)
        {
            Ok(file) => file,
            Err(err) => {
                log::trace!("skipping {}: {err}", path.display());
                return;
            }
        };
        let Some(probe) = probe(&file) else {
            log::trace!("{} is not a gamepad", path.display());
            return;
        };

        let meta = DeviceMeta {
            bus: Some("evdev".to_owned()),
            bustype: probe.id.bustype,
            version: probe.id.version,
            path: Some(path.display().to_string()),
        };
        pads[slot].attach(
            &probe.name,
            probe.id.vendor,
            probe.id.product,
            probe.layout.buttons.len(),
            probe.layout.axes.len(),
            meta,
        );
        log::info!(
            "[pad {slot}] {} ({:04x}:{:04x}) on {}, {} buttons, {} axes",
            pads[slot].name,
            probe.id.vendor,
            probe.id.product,
            path.display(),
            probe.layout.buttons.len(),
            probe.layout.axes.len()
        );
        self.nodes[slot] = Some(EvdevNode {
            file,
            path: path.to_path_buf(),
            layout: probe.layout,
        });
        events.push(HotplugEvent::connected(slot));
    }

    fn close(&mut self, slot: usize, pads: &mut [PadState], events: &mut Vec<HotplugEvent>) {
        if self.nodes[slot].take().is_some() {
            pads[slot].detach();
            events.push(HotplugEvent::disconnected(slot));
        }
    }

    fn check_hotplug(&mut self, pads: &mut [PadState], events: &mut Vec<HotplugEvent>) {
        let Some(watch) = &self.watch else {
            return;
        };
        let mut buf = [0u8; 4096];
        let len = unsafe {
            libc::read(
                watch.as_raw_fd(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
            )
        };
        if len <= 0 {
            return;
        }
        for (mask, name) in parse_inotify(&buf[..len as usize]) {
            if !is_event_node(&name) {
                continue;
            }
            let path = self.input_dir.join(std::ffi::OsStr::from_bytes(&name));
            if mask & libc::IN_CREATE != 0 {
                log::debug!("{} created", path.display());
                self.try_open(&path, pads, events);
                self.rescan_countdown = self.rescan_ticks;
            } else if mask & libc::IN_DELETE != 0 {
                if let Some(slot) = self.find_by_path(&path) {
                    log::info!("[pad {slot}] {} removed", path.display());
                    self.close(slot, pads, events);
                }
            }
        }
    }

    fn drain(&mut self, slot: usize, pad: &mut PadState) -> io::Result<()> {
        let Some(node) = self.nodes[slot].as_mut() else {
            return Ok(());
        };
        const BATCH: usize = 32;
        let event_size = size_of::<libc::input_event>();
        let mut buf = [0u8; BATCH * size_of::<libc::input_event>()];
        loop {
            let n = match node.file.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            for chunk in buf[..n].chunks_exact(event_size) {
                // SAFETY: `chunk` is exactly one `input_event`; read_unaligned
                // tolerates the byte buffer's alignment.
                let ev: libc::input_event =
                    unsafe { std::ptr::read_unaligned(chunk.as_ptr() as *const libc::input_event) };
                log::trace!(
                    "[pad {slot}] type={:#x} code={:#x} value={}",
                    ev.type_,
                    ev.code,
                    ev.value
                );
                if let Some(kind) = node.layout.translate(ev.type_, ev.code, ev.value) {
                    pad.apply(kind);
                }
            }
        }
    }
}

impl Default for EvdevBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for EvdevBackend {
    fn name(&self) -> &'static str {
        "evdev"
    }

    fn layout(&self) -> RawLayout {
        RawLayout::DeviceSpecific
    }

    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn poll(&mut self, pads: &mut [PadState], events: &mut Vec<HotplugEvent>) {
        if self.initial_scan {
            self.initial_scan = false;
            self.scan(pads, events);
        }

        self.check_hotplug(pads, events);

        if self.rescan_countdown > 0 {
            self.rescan_countdown -= 1;
            self.scan(pads, events);
        }

        for slot in 0..MAX_PADS.min(pads.len()) {
            if let Err(err) = self.drain(slot, &mut pads[slot]) {
                log::warn!("[pad {slot}] read failed, closing device: {err}");
                self.close(slot, pads, events);
            }
        }
    }
}

fn is_event_node(name: &[u8]) -> bool {
    name.starts_with(b"event")
}

/// Non-blocking create/delete watch on `dir`.
fn watch_dir(dir: &Path) -> Option<OwnedFd> {
    let c_dir = CString::new(dir.as_os_str().as_bytes()).ok()?;
    let fd = unsafe { libc::inotify_init1(libc::IN_NONBLOCK | libc::IN_CLOEXEC) };
    if fd < 0 {
        return None;
    }
    // SAFETY: `fd` was just returned by inotify_init1 and is owned by nobody else.
    let owned = unsafe { OwnedFd::from_raw_fd(fd) };
    let wd = unsafe {
        libc::inotify_add_watch(
            owned.as_raw_fd(),
            c_dir.as_ptr(),
            libc::IN_CREATE | libc::IN_DELETE,
        )
    };
    (wd >= 0).then_some(owned)
}

/// Split a buffer of `struct inotify_event` records into `(mask, name)` pairs.
fn parse_inotify(buf: &[u8]) -> Vec<(u32, Vec<u8>)> {
    const HEADER: usize = 16;
    let mut out = Vec::new();
    let mut pos = 0;
    while pos + HEADER <= buf.len() {
        let word = |at: usize| u32::from_ne_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
        let mask = word(pos + 4);
        let len = word(pos + 12) as usize;
        let start = pos + HEADER;
        let end = (start + len).min(buf.len());
        let name: Vec<u8> = buf[start..end]
            .iter()
            .copied()
            .take_while(|&b| b != 0)
            .collect();
        if !name.is_empty() {
            out.push((mask, name));
        }
        pos = start + len;
    }
    out
}

struct Probe {
    name: String,
    id: libc::input_id,
    layout: NodeLayout,
}

/// Query capabilities, identity and calibration. `None` if not a gamepad.
fn probe(file: &File) -> Option<Probe> {
    let fd = file.as_raw_fd();
    let mut ev_bits: [libc::c_ulong; bitmap_len(EV_CNT)] = [0; bitmap_len(EV_CNT)];
    let mut key_bits: [libc::c_ulong; bitmap_len(KEY_CNT)] = [0; bitmap_len(KEY_CNT)];
    let mut abs_bits: [libc::c_ulong; bitmap_len(ABS_CNT)] = [0; bitmap_len(ABS_CNT)];

    // SAFETY: each request's encoded size matches the buffer it writes into.
    unsafe {
        if libc::ioctl(fd, ioctl::eviocgbit(0, size_of_val(&ev_bits)) as _, ev_bits.as_mut_ptr()) < 0
            || libc::ioctl(
                fd,
                ioctl::eviocgbit(EV_KEY, size_of_val(&key_bits)) as _,
                key_bits.as_mut_ptr(),
            ) < 0
            || libc::ioctl(
                fd,
                ioctl::eviocgbit(EV_ABS, size_of_val(&abs_bits)) as _,
                abs_bits.as_mut_ptr(),
            ) < 0
        {
            return None;
        }
    }
    if !is_gamepad(&ev_bits, &key_bits) {
        return None;
    }

    let mut name_buf = [0u8; NAME_LEN];
    let name = unsafe {
        if libc::ioctl(fd, ioctl::eviocgname(NAME_LEN) as _, name_buf.as_mut_ptr()) >= 0 {
            let end = name_buf.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
            String::from_utf8_lossy(&name_buf[..end]).into_owned()
        } else {
            FALLBACK_NAME.to_owned()
        }
    };

    // SAFETY: input_id is plain old data.
    let mut id: libc::input_id = unsafe { std::mem::zeroed() };
    if unsafe { libc::ioctl(fd, ioctl::eviocgid() as _, &mut id as *mut libc::input_id) } < 0 {
        id = unsafe { std::mem::zeroed() };
    }

    let layout = NodeLayout::probe(&abs_bits, &key_bits, |code| {
        let mut abs: libc::input_absinfo = unsafe { std::mem::zeroed() };
        let rc = unsafe {
            libc::ioctl(
                fd,
                ioctl::eviocgabs(code) as _,
                &mut abs as *mut libc::input_absinfo,
            )
        };
        (rc == 0).then_some(AxisInfo {
            code,
            minimum: abs.minimum,
            maximum: abs.maximum,
        })
    });

    Some(Probe { name, id, layout })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(mask: u32, name: &[u8], padded: usize) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&1i32.to_ne_bytes());
        out.extend_from_slice(&mask.to_ne_bytes());
        out.extend_from_slice(&0u32.to_ne_bytes());
        out.extend_from_slice(&(padded as u32).to_ne_bytes());
        let mut name = name.to_vec();
        name.resize(padded, 0);
        out.extend_from_slice(&name);
        out
    }

    #[test]
    fn parses_inotify_records() {
        let mut buf = record(libc::IN_CREATE, b"event7", 16);
        buf.extend(record(libc::IN_DELETE, b"js0", 16));
        let parsed = parse_inotify(&buf);
        assert_eq!(
            parsed,
            vec![
                (libc::IN_CREATE, b"event7".to_vec()),
                (libc::IN_DELETE, b"js0".to_vec())
            ]
        );
        assert!(is_event_node(&parsed[0].1));
        assert!(!is_event_node(&parsed[1].1));
    }

    #[test]
    fn missing_directory_yields_no_pads() {
        let mut backend = EvdevBackend::with_dir("/nonexistent/padmap-input", 2);
        let mut pads: [PadState; MAX_PADS] = Default::default();
        let mut events = Vec::new();
        backend.poll(&mut pads, &mut events);
        backend.poll(&mut pads, &mut events);
        assert!(events.is_empty());
        assert!(pads.iter().all(|p| !p.connected));
    }

    #[test]
    fn create_arms_bounded_rescan() {
        let dir = std::env::temp_dir().join(format!("padmap-evdev-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let ticks = 3;
        let mut backend = EvdevBackend::with_dir(&dir, ticks);
        assert!(backend.watch.is_some(), "inotify watch on {}", dir.display());
        let mut pads: [PadState; MAX_PADS] = Default::default();
        let mut events = Vec::new();

        backend.poll(&mut pads, &mut events);
        assert_eq!(backend.rescan_countdown, 0);

        // A regular file opens fine but fails the capability ioctls.
        let node = dir.join("event9");
        std::fs::write(&node, b"").unwrap();
        backend.poll(&mut pads, &mut events);
        assert_eq!(backend.rescan_countdown, ticks - 1);

        for _ in 0..ticks {
            backend.poll(&mut pads, &mut events);
        }
        assert_eq!(backend.rescan_countdown, 0);
        backend.poll(&mut pads, &mut events);
        assert_eq!(backend.rescan_countdown, 0);

        // Deleting a node that was never opened is silent.
        std::fs::remove_file(&node).unwrap();
        backend.poll(&mut pads, &mut events);
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(events.is_empty());
        assert!(backend.nodes.iter().all(Option::is_none));
        assert!(pads.iter().all(|p| !p.connected));
    }
}
