// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn spec(command: &str) -> CommandSpec {
    CommandSpec::parse(command).unwrap()
}

#[parameterized(
    stdin = { "stdin", InputMode::Stdin },
    args = { "args", InputMode::Args },
    padded = { " args\n", InputMode::Args },
)]
fn input_mode_parses(text: &str, expected: InputMode) {
    assert_eq!(text.parse::<InputMode>().unwrap(), expected);
}

#[test]
fn unknown_input_mode_is_rejected() {
    let err = "pipe".parse::<InputMode>().unwrap_err();
    assert!(err.to_string().contains("pipe"));
}

#[test]
fn command_splits_program_and_args() {
    let cmd = spec("tr  a-z A-Z");
    assert_eq!(cmd.program, "tr");
    assert_eq!(cmd.args, vec!["a-z", "A-Z"]);
    assert_eq!(cmd.to_string(), "tr a-z A-Z");
}

#[test]
fn blank_command_is_rejected() {
    assert!(matches!(
        CommandSpec::parse("   "),
        Err(ExecError::EmptyCommand)
    ));
}

#[tokio::test]
async fn args_mode_appends_split_inputs() {
    let out = run(&spec("echo"), InputMode::Args, &["x y".to_string()])
        .await
        .unwrap();
    assert_eq!(out, "x y");
}

#[tokio::test]
async fn args_mode_keeps_fixed_arguments_first() {
    let out = run(
        &spec("echo -n start"),
        InputMode::Args,
        &["a".to_string(), "b  c".to_string()],
    )
    .await
    .unwrap();
    assert_eq!(out, "start a b c");
}

#[tokio::test]
async fn stdin_mode_writes_first_input() {
    let out = run(
        &spec("tr a-z A-Z"),
        InputMode::Stdin,
        &["hello".to_string(), "ignored".to_string()],
    )
    .await
    .unwrap();
    assert_eq!(out, "HELLO");
}

#[tokio::test]
async fn only_one_trailing_newline_is_stripped() {
    let out = run(&spec("cat"), InputMode::Stdin, &["line\n".to_string()])
        .await
        .unwrap();
    assert_eq!(out, "line\n");
}

#[tokio::test]
async fn stdin_mode_tolerates_commands_that_ignore_input() {
    let out = run(&spec("echo done"), InputMode::Stdin, &["x".to_string()])
        .await
        .unwrap();
    assert_eq!(out, "done");
}

#[tokio::test]
async fn stdin_mode_requires_an_input() {
    let err = run(&spec("cat"), InputMode::Stdin, &[]).await.unwrap_err();
    assert!(matches!(err, ExecError::MissingInput(_)));
}

#[tokio::test]
async fn nonzero_exit_is_an_error() {
    let err = run(&spec("false"), InputMode::Args, &[]).await.unwrap_err();
    assert!(matches!(err, ExecError::Failed { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let err = run(
        &spec("pipes-test-no-such-program"),
        InputMode::Args,
        &[],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ExecError::Spawn { .. }));
    assert!(err.to_string().contains("pipes-test-no-such-program"));
}
