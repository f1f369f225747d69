//! Tests for generated message paths.

use regex::Regex;

use crate::config::generate_path;

#[test]
fn generated_names_follow_the_naming_scheme() {
    let path = generate_path();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();

    let scheme = Regex::new(&format!(r"^rw_{}_[0-9a-f]{{10}}\.msg$", std::process::id())).unwrap();
    assert!(scheme.is_match(&name), "unexpected name: {name}");
}

#[test]
fn generated_paths_are_distinct() {
    assert_ne!(generate_path(), generate_path());
}

#[test]
fn generated_paths_share_one_directory() {
    let a = generate_path();
    let b = generate_path();

    assert_eq!(a.parent(), b.parent());
    assert!(a.parent().unwrap().is_dir());
}
