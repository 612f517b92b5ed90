//! CLI help and version specs

use crate::prelude::*;

#[test]
fn version_prints_name_and_version() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["version"])
        .passes()
        .stdout_has(&format!("pipes {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_every_command() {
    let temp = Workspace::empty();
    let output = temp.pipes().args(&["--help"]).passes();
    for command in ["init", "build", "run", "query", "rm", "register", "version"] {
        assert!(output.stdout().contains(command), "missing {command}");
    }
}

#[test]
fn version_does_not_create_a_store() {
    let temp = Workspace::empty();
    temp.pipes().args(&["version"]).passes();
    assert!(!temp.store().exists());
}
