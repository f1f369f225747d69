//! Writer implementations and the trait they share.
//!
//! This module provides:
//! - `ReadyWriter`: Trait for message sinks
//! - `Kind`: Classification used during reconfiguration
//! - `FileDescriptorWriter`: Sink over an inherited descriptor
//! - `PathWriter`: Sink over a locked filesystem path

use std::fs::File;
use std::io;

use log::debug;

mod fd;
mod path;
mod writer;

pub use fd::FileDescriptorWriter;
pub use path::PathWriter;
pub use writer::{Kind, ReadyWriter};

#[cfg(all(test, target_os = "linux"))]
pub(crate) use fd::{candidate_name, soft_limit_row};

/// Force written data to the storage device, tolerating sinks that
/// cannot be synchronized.
pub(crate) fn force_contents(file: &File, target: &str) -> io::Result<()> {
    match file.sync_data() {
        Ok(()) => Ok(()),
        Err(e) => {
            // fsync(3): EINVAL for pipes, sockets, FIFOs.
            let regular = file.metadata().map(|m| m.is_file()).unwrap_or(true);
            if regular {
                Err(e)
            } else {
                debug!("skipping force for non-regular sink {target}: {e}");
                Ok(())
            }
        }
    }
}
