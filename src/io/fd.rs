//! Writer over inherited, numbered file descriptors.
//!
//! Descriptors 1 and 2 map to the standard streams. Higher numbers are
//! resolved through `/proc/self/fd`, checked against the configured
//! trust rules, and reopened for each write. Descriptors that fail the
//! rules bind to a discard sink instead of producing errors.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

#[cfg(unix)]
use std::fs::File;
#[cfg(unix)]
use std::mem::ManuallyDrop;
#[cfg(unix)]
use std::os::fd::FromRawFd;
#[cfg(unix)]
use std::sync::LazyLock;

#[cfg(target_os = "linux")]
use std::fs::{self, OpenOptions};
#[cfg(target_os = "linux")]
use std::io::{BufRead, BufReader};
#[cfg(target_os = "linux")]
use std::path::Path;

#[cfg(target_os = "linux")]
use log::{debug, warn};
use regex::Regex;

use crate::config::{FileDescriptorConfig, WriterConfig};
use crate::error::{Stage, WriteError};

#[cfg(unix)]
use super::force_contents;
use super::writer::{Kind, ReadyWriter};

#[cfg(target_os = "linux")]
const LIMITS_PATH: &str = "/proc/self/limits";
#[cfg(target_os = "linux")]
const SELF_FD_DIR: &str = "/proc/self/fd";
#[cfg(target_os = "linux")]
const FALLBACK_SOFT_LIMIT: u64 = 1023;

/// Process-wide handle for descriptor 1.
#[cfg(unix)]
static OUT_CHANNEL: LazyLock<ManuallyDrop<File>> = LazyLock::new(|| {
    // SAFETY: descriptor 1 stays open for the process lifetime and the
    // static is never dropped, so the handle never closes it.
    ManuallyDrop::new(unsafe { File::from_raw_fd(1) })
});

/// Process-wide handle for descriptor 2.
#[cfg(unix)]
static ERR_CHANNEL: LazyLock<ManuallyDrop<File>> = LazyLock::new(|| {
    // SAFETY: descriptor 2 stays open for the process lifetime and the
    // static is never dropped, so the handle never closes it.
    ManuallyDrop::new(unsafe { File::from_raw_fd(2) })
});

/// Highest descriptor number (exclusive) a writer will duplicate.
#[cfg(target_os = "linux")]
static SOFT_LIMIT: LazyLock<u64> = LazyLock::new(|| {
    let parsed = File::open(LIMITS_PATH)
        .ok()
        .and_then(|file| soft_limit_row(BufReader::new(file)));
    match parsed {
        Some(limit) => {
            debug!("max open files: {limit}");
            limit.saturating_sub(1)
        }
        None => {
            warn!("unreadable soft limit in {LIMITS_PATH}, assuming {FALLBACK_SOFT_LIMIT}");
            FALLBACK_SOFT_LIMIT
        }
    }
});

#[cfg(target_os = "linux")]
static PROC_FD_AVAILABLE: LazyLock<bool> = LazyLock::new(|| Path::new(SELF_FD_DIR).is_dir());

/// Extract the soft "Max open files" value from a limits table.
#[cfg(target_os = "linux")]
pub(crate) fn soft_limit_row(reader: impl BufRead) -> Option<u64> {
    reader
        .lines()
        .map_while(Result::ok)
        .find(|line| line.starts_with("Max open files"))
        .and_then(|line| line.split_whitespace().find_map(|field| field.parse().ok()))
}

/// Resolve the name a descriptor link points at.
///
/// A link whose target was deleted no longer resolves; the entry name
/// of the link itself, the descriptor number, stands in as the
/// candidate name.
#[cfg(target_os = "linux")]
pub(crate) fn candidate_name(fd_path: &Path) -> io::Result<String> {
    match fd_path.canonicalize() {
        Ok(resolved) => Ok(entry_name(&resolved)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(entry_name(fd_path)),
        Err(e) => Err(e),
    }
}

#[cfg(target_os = "linux")]
fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Whether the pattern covers the whole candidate, not a substring.
#[cfg(target_os = "linux")]
fn full_match(pattern: &Regex, text: &str) -> bool {
    pattern
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}

#[cfg(target_os = "linux")]
fn is_writable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated path for the duration
    // of the call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

fn fd_target(fd_number: i32) -> String {
    format!("fd {fd_number}")
}

/// Check a descriptor link against the trust rules.
///
/// Returns `Ok(false)` on rejection and `Err` only when the link
/// itself cannot be inspected.
#[cfg(target_os = "linux")]
fn admissible(fd_number: i32, fd_path: &Path, file_name: &Regex) -> io::Result<bool> {
    let candidate = candidate_name(fd_path)?;
    let directory = fs::metadata(fd_path).map(|m| m.is_dir()).unwrap_or(false);
    let accepted = !directory && is_writable(fd_path) && full_match(file_name, &candidate);
    if accepted {
        debug!("accepted fd {fd_number} -> {candidate}");
    } else {
        warn!("rejected fd {fd_number} -> {candidate}");
    }
    Ok(accepted)
}

#[cfg(target_os = "linux")]
fn duplicate(fd_number: i32, file_name: &Regex) -> Result<Channel, WriteError> {
    if fd_number < 3 || fd_number as u64 >= *SOFT_LIMIT {
        return Ok(Channel::Discard);
    }
    let fd_path = Path::new(SELF_FD_DIR).join(fd_number.to_string());
    let admitted = admissible(fd_number, &fd_path, file_name)
        .map_err(|e| WriteError::new(Stage::Bind, fd_target(fd_number), e))?;
    if !admitted {
        return Ok(Channel::Discard);
    }
    OpenOptions::new()
        .append(true)
        .open(&fd_path)
        .map(Channel::Duplicated)
        .map_err(|e| WriteError::new(Stage::Open, fd_target(fd_number), e))
}

#[cfg(target_os = "linux")]
fn bind(fd_number: i32, file_name: &Regex) -> Result<Channel, WriteError> {
    if fd_number > 2 && *PROC_FD_AVAILABLE {
        duplicate(fd_number, file_name)
    } else {
        Ok(standard_channel(fd_number))
    }
}

#[cfg(not(target_os = "linux"))]
fn bind(fd_number: i32, _file_name: &Regex) -> Result<Channel, WriteError> {
    Ok(standard_channel(fd_number))
}

fn standard_channel(fd_number: i32) -> Channel {
    if fd_number > 1 {
        Channel::Stderr
    } else {
        Channel::Stdout
    }
}

#[cfg(unix)]
fn write_standard(channel: &'static LazyLock<ManuallyDrop<File>>, buffer: &[u8]) -> io::Result<()> {
    let mut file: &File = channel;
    file.write_all(buffer)
}

/// The sink a write call resolved its descriptor to.
#[derive(Debug)]
enum Channel {
    Stdout,
    Stderr,
    #[cfg(target_os = "linux")]
    Duplicated(File),
    #[cfg(target_os = "linux")]
    Discard,
}

impl Channel {
    fn transmit(&mut self, buffer: &[u8]) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Channel::Stdout => write_standard(&OUT_CHANNEL, buffer),
            #[cfg(unix)]
            Channel::Stderr => write_standard(&ERR_CHANNEL, buffer),
            #[cfg(not(unix))]
            Channel::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(buffer)?;
                out.flush()
            }
            #[cfg(not(unix))]
            Channel::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(buffer)?;
                err.flush()
            }
            #[cfg(target_os = "linux")]
            Channel::Duplicated(file) => file.write_all(buffer),
            #[cfg(target_os = "linux")]
            Channel::Discard => Ok(()),
        }
    }

    fn force(&self, target: &str) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Channel::Stdout => force_contents(&OUT_CHANNEL, target),
            #[cfg(unix)]
            Channel::Stderr => force_contents(&ERR_CHANNEL, target),
            #[cfg(not(unix))]
            Channel::Stdout | Channel::Stderr => Ok(()),
            #[cfg(target_os = "linux")]
            Channel::Duplicated(file) => force_contents(file, target),
            #[cfg(target_os = "linux")]
            Channel::Discard => Ok(()),
        }
    }
}

/// Writer over an inherited, numbered file descriptor.
///
/// Descriptors 1 and 2 write through shared process-wide handles.
/// Higher descriptors are checked against `/proc/self/fd` and reopened
/// on every write, so a descriptor retargeted between writes is picked
/// up. A descriptor that fails the trust rules binds to a discard sink
/// and writes to it succeed without producing output.
#[derive(Debug)]
pub struct FileDescriptorWriter {
    lock: Mutex<()>,
    config: FileDescriptorConfig,
}

impl FileDescriptorWriter {
    pub fn new(config: FileDescriptorConfig) -> Self {
        Self {
            lock: Mutex::new(()),
            config,
        }
    }

    pub fn config(&self) -> &FileDescriptorConfig {
        &self.config
    }

    fn target(&self) -> String {
        fd_target(self.config.fd_number())
    }

    fn do_write(&self, message: &str, force: bool) -> Result<(), WriteError> {
        let buffer = self
            .config
            .encoding()
            .encode(message, self.config.byte_order());
        // The guard only orders calls; there is no state to poison.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut channel = bind(self.config.fd_number(), self.config.file_name())?;
        channel
            .transmit(&buffer)
            .map_err(|e| WriteError::new(Stage::Transmit, self.target(), e))?;
        if force {
            channel
                .force(&self.target())
                .map_err(|e| WriteError::new(Stage::Force, self.target(), e))?;
        }
        Ok(())
    }
}

impl Default for FileDescriptorWriter {
    fn default() -> Self {
        Self::new(FileDescriptorConfig::default())
    }
}

impl ReadyWriter for FileDescriptorWriter {
    fn write(&self, message: &str) -> Result<(), WriteError> {
        self.do_write(message, false)
    }

    fn write_and_force(&self, message: &str) -> Result<(), WriteError> {
        self.do_write(message, true)
    }

    fn kind(&self) -> Kind {
        Kind::FileDescriptor
    }

    fn accept(&self, config: &WriterConfig) -> Option<Box<dyn ReadyWriter>> {
        match config.visit(self)? {
            WriterConfig::FileDescriptor(config) => Some(Box::new(Self::new(config.clone()))),
            _ => None,
        }
    }
}
