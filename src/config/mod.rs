//! Configuration types for writers.
//!
//! This module provides:
//! - `FileDescriptorConfig`: Settings for a descriptor-backed writer
//! - `PathConfig`: Settings for a path-backed writer
//! - `WriterConfig`: Kind-tagged envelope offered to running writers

mod spec;
mod tmpdir;

pub use spec::{FileDescriptorConfig, PathConfig, WriterConfig};

#[cfg(test)]
pub(crate) use tmpdir::generate_path;
