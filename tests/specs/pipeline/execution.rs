//! Pipeline execution specs
//!
//! A foreground run launches every stage, submits the words after the
//! first service as the query, prints the result and stops the project.

use crate::prelude::*;

#[test]
fn single_stage_answers_the_query() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");

    temp.pipes()
        .args(&["run", "upper hello world"])
        .passes()
        .stdout_has("Waiting results ...")
        .stdout_has("HELLO WORLD");
}

#[test]
fn stages_chain_in_order() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");
    temp.register("rev", "rev");

    temp.pipes()
        .args(&["run", "upper hello world | rev"])
        .passes()
        .stdout_has("DLROW OLLEH");
}

#[test]
fn workflow_may_span_several_arguments() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");
    temp.register("rev", "rev");

    temp.pipes()
        .args(&["run", "upper", "abc", "|", "rev"])
        .passes()
        .stdout_has("CBA");
}

#[test]
fn args_mode_appends_the_input() {
    let temp = Workspace::empty();
    temp.register_args("say", "echo said:");

    temp.pipes()
        .args(&["run", "say hi there"])
        .passes()
        .stdout_has("said: hi there");
}

#[test]
fn failing_command_reports_a_job_error() {
    let temp = Workspace::empty();
    temp.register("boom", "false");

    temp.pipes()
        .args(&["run", "boom hello"])
        .passes()
        .stdout_has("Job error:");
}

#[test]
fn failure_midway_stops_the_chain() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");
    temp.register("boom", "false");
    temp.register("rev", "rev");

    temp.pipes()
        .args(&["run", "upper abc | boom | rev"])
        .passes()
        .stdout_has("Job error:")
        .stdout_lacks("CBA");
}

#[test]
fn workflow_without_query_just_starts_and_stops() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");

    temp.pipes()
        .args(&["run", "upper"])
        .passes()
        .stdout_lacks("Waiting results");
}

#[test]
fn foreground_run_leaves_the_project_stopped() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");
    temp.pipes()
        .args(&["run", "--name", "once", "upper hi"])
        .passes();

    temp.pipes()
        .args(&["query", "--name", "once", "again"])
        .fails()
        .stderr_has("project is not running");
}
