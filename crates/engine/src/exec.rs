// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local command execution for a pipeline stage

use std::fmt;
use std::process::Stdio;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Errors that can occur while running a stage's command
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("empty command")]
    EmptyCommand,
    #[error("unknown input mode: {0} (expected stdin or args)")]
    UnknownMode(String),
    #[error("no input to write to stdin of {0}")]
    MissingInput(String),
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o error with {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// How a stage passes its input to the command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// First input written to stdin, newline-terminated
    #[default]
    Stdin,
    /// Inputs appended to the command line, split on whitespace
    Args,
}

impl InputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Stdin => "stdin",
            InputMode::Args => "args",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputMode {
    type Err = ExecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stdin" => Ok(InputMode::Stdin),
            "args" => Ok(InputMode::Args),
            other => Err(ExecError::UnknownMode(other.to_string())),
        }
    }
}

/// A command line split into program and fixed arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn parse(command: &str) -> Result<Self, ExecError> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next().ok_or(ExecError::EmptyCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Run a command to completion and return its stdout
///
/// Exactly one trailing newline is stripped from the output. A non-zero
/// exit status is an error in both modes.
pub async fn run(spec: &CommandSpec, mode: InputMode, inputs: &[String]) -> Result<String, ExecError> {
    tracing::debug!(cmd = %spec, %mode, inputs = ?inputs, "executing");

    let output = match mode {
        InputMode::Args => run_with_args(spec, inputs).await?,
        InputMode::Stdin => run_with_stdin(spec, inputs).await?,
    };

    if !output.status.success() {
        return Err(ExecError::Failed {
            program: spec.program.clone(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let result = stdout.strip_suffix('\n').unwrap_or(&stdout).to_string();
    tracing::debug!(result, "executed");
    Ok(result)
}

async fn run_with_args(
    spec: &CommandSpec,
    inputs: &[String],
) -> Result<std::process::Output, ExecError> {
    let extra = inputs.iter().flat_map(|input| input.split_whitespace());
    Command::new(&spec.program)
        .args(&spec.args)
        .args(extra)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ExecError::Spawn {
            program: spec.program.clone(),
            source,
        })
}

async fn run_with_stdin(
    spec: &CommandSpec,
    inputs: &[String],
) -> Result<std::process::Output, ExecError> {
    let input = inputs
        .first()
        .ok_or_else(|| ExecError::MissingInput(spec.program.clone()))?;

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

    let mut stdin = child.stdin.take().ok_or_else(|| ExecError::Io {
        program: spec.program.clone(),
        source: std::io::Error::other("stdin not captured"),
    })?;
    let payload = format!("{}\n", input);
    let write = async move {
        let result = stdin.write_all(payload.as_bytes()).await;
        drop(stdin);
        result
    };

    // Write and read concurrently so a chatty child cannot fill its stdout pipe
    let (written, output) = tokio::join!(write, child.wait_with_output());
    match written {
        Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
            return Err(ExecError::Io {
                program: spec.program.clone(),
                source: e,
            })
        }
        _ => {}
    }
    output.map_err(|source| ExecError::Io {
        program: spec.program.clone(),
        source,
    })
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
