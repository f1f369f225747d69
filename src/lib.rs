//! # readywriter
//!
//! Checked, contention-safe writers for inherited file descriptors and
//! filesystem paths.
//!
//! ## Overview
//!
//! readywriter provides:
//! - **One writer trait**: `ReadyWriter` delivers whole messages to a sink,
//!   whether that sink is a numbered descriptor or a path
//! - **Descriptor trust checks**: inherited descriptors are validated through
//!   `/proc/self/fd` before anything is written; untrusted descriptors
//!   silently discard instead of failing
//! - **Whole-message contention safety**: path writers hold an exclusive
//!   advisory lock per write, so concurrent messages never interleave
//! - **Reconfiguration**: kind-tagged `WriterConfig` envelopes rebuild a
//!   running writer with new settings
//! - **Encodings**: UTF-8, UTF-16, and UTF-32 in either byte order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use readywriter::{PathConfig, WriterConfig, default_registry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = default_registry();
//!     let config = WriterConfig::from(PathConfig::new("/tmp/greetings.msg", true));
//!     let writer = registry
//!         .ready_writer(Some(&config))
//!         .ok_or("no provider accepted the configuration")?;
//!
//!     writer.write("hello\n")?;
//!     writer.write_and_force("world\n")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `serde` - Serialization support for configurations
//! - `miette` - Pretty error reporting with miette
//! - `demo` - The `readywriter_demo` binary

// Core modules
pub mod config;
pub mod encoding;
pub mod error;
pub mod io;
pub mod lookup;

// Re-exports for convenience
pub use config::{FileDescriptorConfig, PathConfig, WriterConfig};
pub use encoding::{ByteOrder, Encoding};
pub use error::{Stage, WriteError};
pub use io::{FileDescriptorWriter, Kind, PathWriter, ReadyWriter};
pub use lookup::{Provider, Registry, default_registry};

/// Look up a writer from the default registry.
///
/// Shorthand for `default_registry().ready_writer(config)`.
pub fn ready_writer(config: Option<&WriterConfig>) -> Option<Box<dyn ReadyWriter>> {
    default_registry().ready_writer(config)
}

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::WriteDiagnostic;

// Internal test modules (see src/tests)
#[cfg(test)]
mod tests;
