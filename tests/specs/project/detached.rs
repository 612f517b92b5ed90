//! Detached project specs
//!
//! `run -d` keeps serving until `rm` marks the project stopped.

use crate::prelude::*;
use std::io::{BufRead, BufReader};
use std::process::{Child, Stdio};
use std::time::{Duration, Instant};

/// A `pipes run -d` process, killed if a spec leaves it behind
struct Detached {
    child: Child,
    lines: Vec<String>,
}

impl Detached {
    fn start(temp: &Workspace, name: &str, workflow: &str) -> Self {
        let mut child = temp
            .command()
            .args(["run", "-d", "--name", name, workflow])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let stdout = child.stdout.take().unwrap();
        let lines: Vec<String> = BufReader::new(stdout)
            .lines()
            .take(2)
            .map(|line| line.unwrap())
            .collect();
        Self { child, lines }
    }

    fn wait_exit(&mut self, within: Duration) -> bool {
        let deadline = Instant::now() + within;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait().unwrap() {
                return status.success();
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        false
    }
}

impl Drop for Detached {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn detached_run_prints_project_and_api_address() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");

    let run = Detached::start(&temp, "demo", "upper");
    assert!(run.lines[0].starts_with("Project "), "{:?}", run.lines);
    assert!(run.lines[0].ends_with("(demo)"), "{:?}", run.lines);
    assert!(
        run.lines[1].starts_with("API listening on: http://127.0.0.1:"),
        "{:?}",
        run.lines
    );
}

#[test]
fn detached_project_answers_queries_until_removed() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");
    temp.register("rev", "rev");
    let mut run = Detached::start(&temp, "demo", "upper | rev");

    temp.pipes()
        .args(&["query", "--name", "demo", "abc", "def"])
        .passes()
        .stdout_has("Waiting results ...")
        .stdout_has("FED CBA");
    temp.pipes()
        .args(&["query", "--name", "demo", "xyz"])
        .passes()
        .stdout_has("ZYX");

    temp.pipes()
        .args(&["rm", "demo"])
        .passes()
        .stdout_has("Project deleted: ");
    assert!(run.wait_exit(Duration::from_secs(10)));

    temp.pipes()
        .args(&["query", "--name", "demo", "abc"])
        .fails()
        .stderr_has("project is not running");
}

#[test]
fn query_and_rm_default_to_the_last_project() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");
    let mut run = Detached::start(&temp, "main", "upper");

    temp.pipes()
        .args(&["query", "quiet"])
        .passes()
        .stdout_has("QUIET");
    temp.pipes().args(&["rm"]).passes();
    assert!(run.wait_exit(Duration::from_secs(10)));
}

#[test]
fn project_name_cannot_be_reused_while_known() {
    let temp = Workspace::empty();
    temp.register("upper", "tr a-z A-Z");
    let _run = Detached::start(&temp, "taken", "upper");

    temp.pipes()
        .args(&["run", "--name", "taken", "upper hi"])
        .fails()
        .stderr_has("project already exists: taken");
}
