//! CLI error specs
//!
//! Failures exit non-zero and explain themselves on stderr.

use crate::prelude::*;

#[test]
fn run_without_workflow_fails() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["run"])
        .fails()
        .stderr_has("you need to provide a workflow")
        .stderr_has("suggestions:");
}

#[test]
fn run_with_empty_stage_fails() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");
    temp.pipes()
        .args(&["run", "upper hi | | upper"])
        .fails()
        .stderr_has("empty service");
}

#[test]
fn run_with_unregistered_service_suggests_register() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["run", "ghost hello"])
        .fails()
        .stderr_has("service not registered: ghost")
        .stderr_has("pipes register ghost");
}

#[test]
fn run_with_nested_project_name_fails() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");
    temp.pipes()
        .args(&["run", "--name", "a/b", "upper hi"])
        .fails()
        .stderr_has("invalid project name \"a/b\"");
}

#[test]
fn query_without_any_project_fails() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["query", "hello"])
        .fails()
        .stderr_has("project does not exist");
}

#[test]
fn rm_unknown_project_fails() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["rm", "nobody"])
        .fails()
        .stderr_has("project does not exist: nobody");
}

#[test]
fn register_rejects_unknown_mode() {
    let temp = Workspace::empty();
    temp.pipes()
        .args(&["register", "upper", "tr a-z A-Z", "--mode", "pipe"])
        .fails()
        .stderr_has("pipe");
}
