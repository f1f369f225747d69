//! Error types for write operations.
//!
//! This module provides:
//! - `Stage`: Indicates where a write call failed
//! - `WriteError`: A single write failure with context

use std::fmt;
use std::io;

use thiserror::Error;

/// Stage of a write call at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Error while validating a descriptor binding
    Bind,
    /// Error while opening the sink
    Open,
    /// Error while acquiring the advisory file lock
    Lock,
    /// Error while positioning the sink
    Seek,
    /// Error while transmitting the encoded message
    Transmit,
    /// Error while forcing written bytes to stable storage
    Force,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Bind => write!(f, "Bind"),
            Stage::Open => write!(f, "Open"),
            Stage::Lock => write!(f, "Lock"),
            Stage::Seek => write!(f, "Seek"),
            Stage::Transmit => write!(f, "Transmit"),
            Stage::Force => write!(f, "Force"),
        }
    }
}

/// A failed write, carrying the stage and the sink that failed.
#[derive(Debug, Error)]
#[error("[{stage}] {target}: {source}")]
pub struct WriteError {
    /// Stage where the failure occurred
    pub stage: Stage,
    /// Identifier of the sink (a descriptor number or a file path)
    pub target: String,
    /// The underlying I/O error
    #[source]
    pub source: io::Error,
}

impl WriteError {
    /// Create a new write error.
    pub fn new(stage: Stage, target: impl Into<String>, source: io::Error) -> Self {
        Self {
            stage,
            target: target.into(),
            source,
        }
    }
}

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
