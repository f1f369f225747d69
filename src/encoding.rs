//! Message encodings and byte orders.
//!
//! This module provides:
//! - `Encoding`: The character encodings a writer can apply to a message
//! - `ByteOrder`: The endianness applied to multi-byte code units

use std::fmt;

/// Character encodings a writer can apply to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Encoding {
    /// UTF-8 (the default)
    #[default]
    Utf8,
    /// UTF-16, without a byte-order mark
    Utf16,
    /// UTF-32, without a byte-order mark
    Utf32,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "utf-8"),
            Encoding::Utf16 => write!(f, "utf-16"),
            Encoding::Utf32 => write!(f, "utf-32"),
        }
    }
}

impl Encoding {
    /// Encode `message`, laying out multi-byte code units in `order`.
    ///
    /// UTF-8 code units are single bytes, so `order` has no effect on
    /// them. No encoding emits a byte-order mark.
    pub fn encode(&self, message: &str, order: ByteOrder) -> Vec<u8> {
        match self {
            Encoding::Utf8 => message.as_bytes().to_vec(),
            Encoding::Utf16 => match order {
                ByteOrder::BigEndian => {
                    message.encode_utf16().flat_map(u16::to_be_bytes).collect()
                }
                ByteOrder::LittleEndian => {
                    message.encode_utf16().flat_map(u16::to_le_bytes).collect()
                }
            },
            Encoding::Utf32 => match order {
                ByteOrder::BigEndian => message
                    .chars()
                    .flat_map(|c| (c as u32).to_be_bytes())
                    .collect(),
                ByteOrder::LittleEndian => message
                    .chars()
                    .flat_map(|c| (c as u32).to_le_bytes())
                    .collect(),
            },
        }
    }
}

/// Endianness applied to multi-byte code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ByteOrder {
    /// Most significant byte first (the default)
    #[default]
    BigEndian,
    /// Least significant byte first
    LittleEndian,
}

impl ByteOrder {
    /// The byte order of the host platform.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::BigEndian => write!(f, "big-endian"),
            ByteOrder::LittleEndian => write!(f, "little-endian"),
        }
    }
}
