//! Writer over a filesystem path.

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::sync::{Mutex, PoisonError};

use crate::config::{PathConfig, WriterConfig};
use crate::error::{Stage, WriteError};

use super::force_contents;
use super::writer::{Kind, ReadyWriter};

/// Writer that opens its target path anew for every message.
///
/// Appendable writers add each message to the end of the target;
/// non-appendable writers replace the contents. Every write holds an
/// exclusive advisory lock on the target while it runs, so concurrent
/// writers in this or other processes interleave whole messages
/// instead of bytes. Files the writer creates get `0640` permissions
/// on Unix.
#[derive(Debug)]
pub struct PathWriter {
    lock: Mutex<()>,
    config: PathConfig,
}

impl PathWriter {
    pub fn new(config: PathConfig) -> Self {
        Self {
            lock: Mutex::new(()),
            config,
        }
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    fn target(&self) -> String {
        self.config.path().display().to_string()
    }

    fn open_channel(&self) -> io::Result<File> {
        let mut options = OpenOptions::new();
        if self.config.appendable() {
            options.create(true).append(true);
        } else {
            options.create(true).write(true).truncate(true);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            // Applied only when the call creates the file.
            options.mode(0o640);
        }
        options.open(self.config.path())
    }

    fn do_write(&self, message: &str, force: bool) -> Result<(), WriteError> {
        let buffer = self
            .config
            .encoding()
            .encode(message, self.config.byte_order());
        // The guard only orders calls; there is no state to poison.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut channel = self
            .open_channel()
            .map_err(|e| WriteError::new(Stage::Open, self.target(), e))?;
        channel
            .lock()
            .map_err(|e| WriteError::new(Stage::Lock, self.target(), e))?;
        if !self.config.appendable() {
            rewind(&mut channel).map_err(|e| WriteError::new(Stage::Seek, self.target(), e))?;
        }
        channel
            .write_all(&buffer)
            .map_err(|e| WriteError::new(Stage::Transmit, self.target(), e))?;
        if force {
            force_contents(&channel, &self.target())
                .map_err(|e| WriteError::new(Stage::Force, self.target(), e))?;
        }
        // Dropping the channel releases the advisory lock.
        Ok(())
    }
}

impl Default for PathWriter {
    fn default() -> Self {
        Self::new(PathConfig::default())
    }
}

/// Reposition a replacing write at the start of the target.
fn rewind(channel: &mut File) -> io::Result<()> {
    match channel.seek(SeekFrom::Start(0)) {
        Ok(_) => Ok(()),
        Err(e) => {
            // lseek(3): ESPIPE when the sink is a pipe, socket, FIFO.
            let regular = channel.metadata().map(|m| m.is_file()).unwrap_or(true);
            if regular { Err(e) } else { Ok(()) }
        }
    }
}

impl ReadyWriter for PathWriter {
    fn write(&self, message: &str) -> Result<(), WriteError> {
        self.do_write(message, false)
    }

    fn write_and_force(&self, message: &str) -> Result<(), WriteError> {
        self.do_write(message, true)
    }

    fn kind(&self) -> Kind {
        Kind::Path
    }

    fn accept(&self, config: &WriterConfig) -> Option<Box<dyn ReadyWriter>> {
        match config.visit(self)? {
            WriterConfig::Path(config) => Some(Box::new(Self::new(config.clone()))),
            _ => None,
        }
    }
}
