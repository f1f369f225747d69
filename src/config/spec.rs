//! Writer configurations and the kind-tagged envelope used to
//! reconfigure writers.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::encoding::{ByteOrder, Encoding};
use crate::io::{Kind, ReadyWriter};

use super::tmpdir;

/// Matches any single-line name without dots.
static NO_DOTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[^.]+$").expect("default file name pattern must compile")
});

/// Configuration for a [`FileDescriptorWriter`](crate::io::FileDescriptorWriter).
///
/// Descriptor numbers below one are coerced to one, so a default-built
/// configuration targets standard output.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileDescriptorConfig {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "coerce_fd"))]
    fd_number: i32,
    #[cfg_attr(feature = "serde", serde(with = "regex_pattern"))]
    file_name: Regex,
    #[cfg_attr(feature = "serde", serde(default))]
    encoding: Encoding,
    #[cfg_attr(feature = "serde", serde(default))]
    byte_order: ByteOrder,
}

impl FileDescriptorConfig {
    /// Create a configuration for the given descriptor number.
    ///
    /// The file name pattern starts out accepting any dot-free name,
    /// and messages encode as big-endian UTF-8.
    pub fn new(fd_number: i32) -> Self {
        Self {
            fd_number: fd_number.max(1),
            file_name: NO_DOTS.clone(),
            encoding: Encoding::default(),
            byte_order: ByteOrder::default(),
        }
    }

    /// Replace the pattern a duplicated descriptor's target name must match.
    pub fn with_file_name(mut self, file_name: Regex) -> Self {
        self.file_name = file_name;
        self
    }

    /// Replace the message encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Replace the byte order applied to wide encodings.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn fd_number(&self) -> i32 {
        self.fd_number
    }

    pub fn file_name(&self) -> &Regex {
        &self.file_name
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}

impl Default for FileDescriptorConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(feature = "serde")]
fn coerce_fd<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    i32::deserialize(deserializer).map(|n| n.max(1))
}

#[cfg(feature = "serde")]
mod regex_pattern {
    use regex::Regex;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Regex, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_str())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Regex, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pattern = String::deserialize(deserializer)?;
        Regex::new(&pattern).map_err(serde::de::Error::custom)
    }
}

/// Configuration for a [`PathWriter`](crate::io::PathWriter).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathConfig {
    path: PathBuf,
    appendable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    encoding: Encoding,
    #[cfg_attr(feature = "serde", serde(default))]
    byte_order: ByteOrder,
}

impl PathConfig {
    /// Create a configuration targeting the given path.
    ///
    /// Appendable writers add to the target; non-appendable writers
    /// truncate it on every write.
    pub fn new(path: impl Into<PathBuf>, appendable: bool) -> Self {
        Self {
            path: path.into(),
            appendable,
            encoding: Encoding::default(),
            byte_order: ByteOrder::default(),
        }
    }

    /// Create a configuration with a generated path under the message
    /// directory in the system temporary directory.
    pub fn generated(appendable: bool) -> Self {
        Self::new(tmpdir::generate_path(), appendable)
    }

    /// Replace the message encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Replace the byte order applied to wide encodings.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn appendable(&self) -> bool {
        self.appendable
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self::generated(true)
    }
}

/// Kind-tagged configuration envelope handed to [`ReadyWriter::accept`].
///
/// A writer only unpacks the variant matching its own kind, so an
/// envelope can be offered to a mixed collection of writers and lands
/// on the one able to use it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum WriterConfig {
    FileDescriptor(FileDescriptorConfig),
    Path(PathConfig),
}

impl WriterConfig {
    /// The writer kind this configuration describes.
    pub fn kind(&self) -> Kind {
        match self {
            WriterConfig::FileDescriptor(_) => Kind::FileDescriptor,
            WriterConfig::Path(_) => Kind::Path,
        }
    }

    /// Offer this configuration to a writer.
    ///
    /// Returns the envelope back when the writer's kind matches, and
    /// `None` when the writer should ignore it.
    pub fn visit(&self, writer: &dyn ReadyWriter) -> Option<&WriterConfig> {
        (writer.kind() == self.kind()).then_some(self)
    }
}

impl From<FileDescriptorConfig> for WriterConfig {
    fn from(config: FileDescriptorConfig) -> Self {
        WriterConfig::FileDescriptor(config)
    }
}

impl From<PathConfig> for WriterConfig {
    fn from(config: PathConfig) -> Self {
        WriterConfig::Path(config)
    }
}
