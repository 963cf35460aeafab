#![forbid(unsafe_code)]

use ds_core::ids::UserId;
use ds_core::paths::DavPath;
use ds_storage::{PropertyStore, StoreError};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("ds_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn reopen_preserves_rows() {
    let dir = temp_dir("reopen_preserves_rows");
    let owner = UserId::try_new("dummy_user_42").expect("user id");
    let target = DavPath::try_new("foo_bar_path_1337").expect("dav path");

    {
        let mut store = PropertyStore::open(&dir).expect("open store");
        store
            .set(&owner, &target, "{DAV:}displayname", "kept")
            .expect("set");
    }

    let store = PropertyStore::open(&dir).expect("reopen store");
    let props = store.get_all(&owner, &target).expect("get all");
    assert_eq!(
        props.get("{DAV:}displayname").map(String::as_str),
        Some("kept")
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn preflight_rejects_foreign_schema_version() {
    let dir = temp_dir("preflight_rejects_foreign_schema_version");

    {
        let _ = PropertyStore::open(&dir).expect("open store");
    }

    // Simulate a database written by a later release.
    {
        let conn = rusqlite::Connection::open(dir.join("davstore.db")).expect("raw open");
        conn.execute("UPDATE properties_state SET schema_version=99 WHERE singleton=1", [])
            .expect("bump version");
    }

    match PropertyStore::open(&dir) {
        Err(StoreError::InvalidInput(message)) => {
            assert!(message.contains("RESET_REQUIRED"), "message: {message}");
        }
        other => panic!("expected RESET_REQUIRED, got {other:?}"),
    }

    let _ = std::fs::remove_dir_all(&dir);
}
