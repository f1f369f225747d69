//! Tests for writer configurations and the reconfiguration envelope.

use std::path::Path;

use regex::Regex;

use crate::{ByteOrder, Encoding, FileDescriptorConfig, Kind, PathConfig, PathWriter, WriterConfig};

#[test]
fn fd_config_defaults_to_stdout_and_utf8() {
    let config = FileDescriptorConfig::default();

    assert_eq!(config.fd_number(), 1);
    assert_eq!(config.file_name().as_str(), r"(?m)^[^.]+$");
    assert_eq!(config.encoding(), Encoding::Utf8);
    assert_eq!(config.byte_order(), ByteOrder::BigEndian);
}

#[test]
fn fd_numbers_below_one_are_coerced() {
    assert_eq!(FileDescriptorConfig::new(0).fd_number(), 1);
    assert_eq!(FileDescriptorConfig::new(-7).fd_number(), 1);
    assert_eq!(FileDescriptorConfig::new(5).fd_number(), 5);
}

#[test]
fn fd_config_builders_replace_fields() {
    let config = FileDescriptorConfig::new(3)
        .with_file_name(Regex::new("^out$").unwrap())
        .with_encoding(Encoding::Utf16)
        .with_byte_order(ByteOrder::LittleEndian);

    assert_eq!(config.fd_number(), 3);
    assert_eq!(config.file_name().as_str(), "^out$");
    assert_eq!(config.encoding(), Encoding::Utf16);
    assert_eq!(config.byte_order(), ByteOrder::LittleEndian);
}

#[test]
fn path_config_holds_target_and_mode() {
    let config = PathConfig::new("/tmp/out.msg", false);

    assert_eq!(config.path(), Path::new("/tmp/out.msg"));
    assert!(!config.appendable());
    assert_eq!(config.encoding(), Encoding::Utf8);
}

#[test]
fn generated_path_config_lands_in_the_message_dir() {
    let config = PathConfig::generated(true);

    assert!(config.appendable());
    let name = config.path().file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("rw_"), "unexpected name: {name}");
    assert!(name.ends_with(".msg"), "unexpected name: {name}");
}

#[test]
fn default_path_config_is_appendable() {
    assert!(PathConfig::default().appendable());
}

#[test]
fn envelope_reports_the_kind_of_its_payload() {
    let fd: WriterConfig = FileDescriptorConfig::new(4).into();
    let path: WriterConfig = PathConfig::new("/tmp/x.msg", true).into();

    assert_eq!(fd.kind(), Kind::FileDescriptor);
    assert_eq!(path.kind(), Kind::Path);
}

#[test]
fn visit_answers_only_the_matching_writer() {
    let writer = PathWriter::default();
    let matching: WriterConfig = PathConfig::new("/tmp/x.msg", true).into();
    let other: WriterConfig = FileDescriptorConfig::new(4).into();

    assert!(matching.visit(&writer).is_some());
    assert!(other.visit(&writer).is_none());
}

#[cfg(feature = "serde")]
#[test]
fn fd_config_round_trips_through_json() {
    let config = FileDescriptorConfig::new(4)
        .with_encoding(Encoding::Utf16)
        .with_byte_order(ByteOrder::LittleEndian);

    let json = serde_json::to_string(&config).unwrap();
    let back: FileDescriptorConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(back.fd_number(), 4);
    assert_eq!(back.file_name().as_str(), r"(?m)^[^.]+$");
    assert_eq!(back.encoding(), Encoding::Utf16);
    assert_eq!(back.byte_order(), ByteOrder::LittleEndian);
}

#[cfg(feature = "serde")]
#[test]
fn deserialized_fd_numbers_are_coerced() {
    let config: FileDescriptorConfig =
        serde_json::from_str(r#"{"fd_number":0,"file_name":"^out$"}"#).unwrap();

    assert_eq!(config.fd_number(), 1);
    assert_eq!(config.file_name().as_str(), "^out$");
    assert_eq!(config.encoding(), Encoding::Utf8);
}

#[cfg(feature = "serde")]
#[test]
fn invalid_patterns_fail_deserialization() {
    let result: Result<FileDescriptorConfig, _> =
        serde_json::from_str(r#"{"fd_number":4,"file_name":"("}"#);

    assert!(result.is_err());
}

#[cfg(feature = "serde")]
#[test]
fn envelope_serializes_with_a_kind_tag() {
    let envelope: WriterConfig = PathConfig::new("/tmp/out.msg", true).into();

    let json = serde_json::to_string(&envelope).unwrap();
    assert!(json.starts_with(r#"{"path":"#), "unexpected json: {json}");

    let back: WriterConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.kind(), Kind::Path);
}
