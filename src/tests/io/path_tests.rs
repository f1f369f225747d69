//! Tests for the path writer.

use std::fs;
use std::sync::Arc;
use std::thread;

use crate::config::PathConfig;
use crate::io::{PathWriter, ReadyWriter};
use crate::{ByteOrder, Encoding, Stage};

const MESSAGE: &str = "foo bar\nbaz quux\n";

#[test]
fn append_writer_accumulates_messages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.msg");
    let writer = PathWriter::new(PathConfig::new(&path, true));

    writer.write(MESSAGE).unwrap();
    writer.write(MESSAGE).unwrap();

    assert_eq!(
        fs::read(&path).unwrap(),
        [MESSAGE.as_bytes(), MESSAGE.as_bytes()].concat()
    );
}

#[test]
fn replacing_writer_keeps_only_the_last_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latest.msg");
    let writer = PathWriter::new(PathConfig::new(&path, false));

    writer.write("superseded contents\n").unwrap();
    writer.write(MESSAGE).unwrap();

    assert_eq!(fs::read(&path).unwrap(), MESSAGE.as_bytes().to_vec());
}

#[test]
fn write_and_force_persists_the_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forced.msg");
    let writer = PathWriter::new(PathConfig::new(&path, true));

    writer.write_and_force(MESSAGE).unwrap();

    assert_eq!(fs::read(&path).unwrap(), MESSAGE.as_bytes().to_vec());
}

#[test]
fn configured_encoding_reaches_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.msg");
    let config = PathConfig::new(&path, true)
        .with_encoding(Encoding::Utf16)
        .with_byte_order(ByteOrder::LittleEndian);

    PathWriter::new(config).write("hi").unwrap();

    assert_eq!(fs::read(&path).unwrap(), vec![0x68, 0x00, 0x69, 0x00]);
}

#[cfg(unix)]
#[test]
fn created_files_are_no_wider_than_0640() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perm.msg");
    PathWriter::new(PathConfig::new(&path, true))
        .write(MESSAGE)
        .unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode & 0o137, 0, "mode too permissive: {mode:o}");
}

#[test]
fn unreachable_targets_report_the_open_stage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent").join("out.msg");

    let err = PathWriter::new(PathConfig::new(&path, true))
        .write(MESSAGE)
        .unwrap_err();

    assert_eq!(err.stage, Stage::Open);
    assert!(err.target.ends_with("out.msg"), "target: {}", err.target);
}

#[test]
fn contended_appends_keep_messages_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contended.msg");
    let writer = Arc::new(PathWriter::new(PathConfig::new(&path, true)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || writer.write(MESSAGE).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let contents = fs::read(&path).unwrap();
    assert_eq!(contents.len(), MESSAGE.len() * 8);
    for chunk in contents.chunks(MESSAGE.len()) {
        assert_eq!(chunk, MESSAGE.as_bytes());
    }
}

#[test]
fn independent_writers_serialize_through_the_advisory_lock() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.msg");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let config = PathConfig::new(&path, true);
            thread::spawn(move || PathWriter::new(config).write(MESSAGE).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let contents = fs::read(&path).unwrap();
    assert_eq!(contents.len(), MESSAGE.len() * 8);
    for chunk in contents.chunks(MESSAGE.len()) {
        assert_eq!(chunk, MESSAGE.as_bytes());
    }
}

#[test]
fn contended_replacing_writers_leave_exactly_one_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replaced.msg");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let config = PathConfig::new(&path, false);
            thread::spawn(move || PathWriter::new(config).write(MESSAGE).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(fs::read(&path).unwrap(), MESSAGE.as_bytes().to_vec());
}

#[test]
fn default_writer_targets_a_generated_path() {
    let writer = PathWriter::default();

    assert!(writer.config().appendable());
    let name = writer
        .config()
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    assert!(name.starts_with("rw_"), "unexpected name: {name}");
    assert!(name.ends_with(".msg"), "unexpected name: {name}");
}
