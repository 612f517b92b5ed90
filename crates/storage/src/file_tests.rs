// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn missing_file_is_an_empty_store() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path().join("store.json")).unwrap();

    assert!(store.read("main_project", "").unwrap_err().is_not_found());
}

#[test]
fn writes_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/store.json");

    let store = FileStore::open(&path).unwrap();
    store.write("name", "demo", "projects/p1").unwrap();
    store.write("next", "", "projects/p1/services/api").unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.read("name", "projects/p1").unwrap(), "demo");
    assert!(reopened
        .list("next", "projects/p1/services/api")
        .unwrap()
        .is_empty());
}

#[test]
fn two_handles_see_each_other() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let a = FileStore::open(&path).unwrap();
    let b = FileStore::open(&path).unwrap();

    a.write("running", "true", "projects/p1").unwrap();
    b.write("running", "false", "projects/p1").unwrap();

    assert_eq!(a.read("running", "projects/p1").unwrap(), "false");
}

#[test]
fn failed_mutation_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();
    store.write("a", "v", "").unwrap();

    let before = std::fs::read_to_string(&path).unwrap();
    assert!(store.write("b", "w", "a").is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn addr_is_the_file_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.addr(), path.display().to_string());
}
