//! The writer abstraction shared by every sink.

use std::fmt;

use crate::config::WriterConfig;
use crate::error::WriteError;

/// Broad classification of a writer's sink.
///
/// Kinds drive reconfiguration: a [`WriterConfig`] carries the kind it
/// describes, and [`ReadyWriter::accept`] only reacts when the kinds
/// line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Kind {
    /// A sink outside the built-in classification.
    Other,
    /// An inherited, numbered file descriptor.
    FileDescriptor,
    /// A filesystem path opened per write.
    Path,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Other => "other",
            Kind::FileDescriptor => "file-descriptor",
            Kind::Path => "path",
        };
        write!(f, "{name}")
    }
}

/// A message sink that is ready to transmit whole messages.
///
/// Implementations take `&self` and synchronize internally, so one
/// writer can be shared across threads. Each call delivers the entire
/// message or reports a [`WriteError`] naming the stage that failed.
pub trait ReadyWriter: Send + Sync + fmt::Debug {
    /// Transmit one message to the sink.
    fn write(&self, message: &str) -> Result<(), WriteError>;

    /// Transmit one message and force it to the storage device.
    fn write_and_force(&self, message: &str) -> Result<(), WriteError>;

    /// The kind of sink this writer feeds.
    fn kind(&self) -> Kind;

    /// Offer a configuration to this writer.
    ///
    /// When the configuration's kind matches and the writer can apply
    /// it, a fresh writer built from that configuration is returned.
    /// Otherwise the offer is ignored and `None` comes back.
    fn accept(&self, config: &WriterConfig) -> Option<Box<dyn ReadyWriter>>;
}
