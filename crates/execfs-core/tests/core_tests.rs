use std::fs;
use std::path::PathBuf;

use execfs_core::{ExtensionConfig, PathPolicy, Workspace, WorkspaceError};

#[test]
fn test_round_trip_arbitrary_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("workspace"));

    let payload: Vec<u8> = (0u8..=255).chain([0, 0, b'\n', 0xff]).collect();
    ws.write("blob.bin", &payload).unwrap();

    assert_eq!(ws.read("blob.bin").unwrap(), payload);
    assert_eq!(fs::read(ws.root().join("blob.bin")).unwrap(), payload);
}

#[test]
fn test_write_creates_workspace_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested/workspace");
    let ws = Workspace::new(&root);

    assert!(!root.exists());
    ws.write("hello.txt", b"hi").unwrap();
    assert_eq!(fs::read(root.join("hello.txt")).unwrap(), b"hi");
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("workspace"));

    let err = ws.read("does-not-exist").unwrap_err();
    assert!(matches!(err, WorkspaceError::Open { .. }));
    assert!(!err.script_message().is_empty());
}

#[test]
fn test_resolve_is_deterministic() {
    let ws = Workspace::new("workspace");
    for name in ["a.txt", "logs/today.txt", "./x"] {
        let first = ws.resolve(name).unwrap();
        let second = ws.resolve(name).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("workspace"));
    }
}

#[test]
fn test_confined_policy_blocks_escape() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("workspace"));

    let err = ws.write("../outside.txt", b"x").unwrap_err();
    assert!(matches!(err, WorkspaceError::InvalidName { .. }));
    assert!(!dir.path().join("outside.txt").exists());

    assert!(matches!(
        ws.read("/etc/hostname"),
        Err(WorkspaceError::InvalidName { .. })
    ));
}

#[test]
fn test_prefix_policy_concatenates() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("workspace");
    let ws = Workspace::new(&root).with_policy(PathPolicy::Prefix);

    // An absolute-looking name still lands under the root.
    ws.write("/rooted.txt", b"abc").unwrap();
    assert_eq!(fs::read(root.join("rooted.txt")).unwrap(), b"abc");
    assert_eq!(ws.read("/rooted.txt").unwrap(), b"abc");
}

// macOS file systems refuse names that are not UTF-8.
#[cfg(target_os = "linux")]
#[test]
fn test_byte_names_map_to_distinct_files() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("workspace")).with_policy(PathPolicy::Prefix);

    let ff = execfs_core::name_from_bytes(b"\xff").unwrap();
    let fe = execfs_core::name_from_bytes(b"\xfe").unwrap();
    ws.write(ff, b"first").unwrap();
    ws.write(fe, b"second").unwrap();

    assert_eq!(ws.read(ff).unwrap(), b"first");
    assert_eq!(ws.read(fe).unwrap(), b"second");
    assert_eq!(fs::read_dir(ws.root()).unwrap().count(), 2);
}

#[test]
fn test_subdirectories_are_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("workspace"));

    let err = ws.write("missing/file.txt", b"x").unwrap_err();
    assert!(matches!(err, WorkspaceError::Open { .. }));

    fs::create_dir_all(ws.root().join("present")).unwrap();
    ws.write("present/file.txt", b"x").unwrap();
    assert_eq!(ws.read("present/file.txt").unwrap(), b"x");
}

#[test]
fn test_unavailable_workspace_surfaces_on_every_op() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("workspace");
    fs::write(&root, b"occupied").unwrap();
    let ws = Workspace::new(&root);

    assert!(matches!(
        ws.read("a"),
        Err(WorkspaceError::Unavailable { .. })
    ));
    assert!(matches!(
        ws.write("a", b""),
        Err(WorkspaceError::Unavailable { .. })
    ));
}

#[test]
fn test_config_workspace() {
    let config = ExtensionConfig::builder()
        .workspace_dir("scratch")
        .path_policy(PathPolicy::Prefix)
        .build()
        .unwrap();

    let ws = config.workspace();
    assert_eq!(ws.root(), PathBuf::from("scratch"));
    assert_eq!(ws.policy(), PathPolicy::Prefix);
}
