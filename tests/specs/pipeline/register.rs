//! Service registry specs

use crate::prelude::*;

#[test]
fn register_confirms_name_and_mode() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["register", "upper", "tr a-z A-Z"])
        .passes()
        .stdout_has("Registered: upper (stdin)");
    temp.pipes()
        .args(&["register", "say", "echo", "--mode", "args"])
        .passes()
        .stdout_has("Registered: say (args)");
}

#[test]
fn register_writes_the_store_file() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");
    let store = std::fs::read_to_string(temp.store()).unwrap();
    assert!(store.contains("tr a-z A-Z"));
}

#[test]
fn register_rejects_blank_command() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["register", "upper", "  "])
        .fails()
        .stderr_has("invalid service upper");
}

#[test]
fn reregistering_replaces_the_command() {
    let temp = Workspace::empty();
    temp.register("shout", "tr a-z A-Z");
    temp.register("shout", "rev");
    temp.pipes()
        .args(&["run", "shout abc"])
        .passes()
        .stdout_has("cba");
}

#[test]
fn init_prepares_the_store_once() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["init"])
        .passes()
        .stdout_has("Store initialized: ");
    assert!(temp.store().exists());

    temp.pipes()
        .args(&["init"])
        .fails()
        .stderr_has("store already initialized");
}

#[test]
fn build_names_services_after_the_executable() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["build", "/bin/echo:args", "rev"])
        .passes()
        .stdout_has("service_name: echo")
        .stdout_has("input_mode: args")
        .stdout_has("service_name: rev")
        .stdout_has("input_mode: stdin");

    temp.pipes()
        .args(&["run", "echo abc | rev"])
        .passes()
        .stdout_has("cba");
}

#[test]
fn build_rejects_unknown_mode() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["build", "cat:socket"])
        .fails()
        .stderr_has("invalid service cat");
}
