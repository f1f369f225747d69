//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::{Stage, WriteError};

/// A diagnostic wrapper for write errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct WriteDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<std::io::Error>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

impl From<WriteError> for WriteDiagnostic {
    fn from(e: WriteError) -> Self {
        let help = match e.stage {
            Stage::Bind => "Check that the descriptor is open and its target matches the name pattern",
            Stage::Open => "Check that the sink exists and is writable",
            Stage::Lock => "Another process may hold the advisory lock on this file",
            Stage::Seek | Stage::Transmit => "Check that the sink supports the requested operation",
            Stage::Force => "The sink may not support durability flushes",
        };
        WriteDiagnostic {
            message: format!("[{}] on '{}'", e.stage, e.target),
            source: Some(e.source),
            help: Some(help.into()),
            severity: Severity::Error,
        }
    }
}

impl From<WriteError> for miette::Report {
    fn from(e: WriteError) -> Self {
        miette::Report::new(WriteDiagnostic::from(e))
    }
}
