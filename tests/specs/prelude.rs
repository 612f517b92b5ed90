//! Shared helpers for the CLI specs

use assert_cmd::assert::Assert;
use assert_cmd::cargo::CommandCargoExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;

pub use predicates::prelude::*;

/// Every spec command is killed after this long
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// A temporary directory holding one store file
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> PathBuf {
        self.dir.path().join("store.json")
    }

    /// `pipes` with `--store` pointing into this workspace
    pub fn pipes(&self) -> Cli {
        Cli {
            cmd: self.command(),
        }
    }

    /// A plain `std::process::Command` for processes that outlive one call
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("pipes").unwrap();
        cmd.env_remove("PIPES_STORE")
            .env_remove("RUST_LOG")
            .current_dir(self.path())
            .arg("--store")
            .arg(self.store());
        cmd
    }

    /// Register a service, failing the spec if that does not work
    pub fn register(&self, name: &str, command: &str) -> &Self {
        self.pipes().args(&["register", name, command]).passes();
        self
    }

    pub fn register_args(&self, name: &str, command: &str) -> &Self {
        self.pipes()
            .args(&["register", name, command, "--mode", "args"])
            .passes();
        self
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(self) -> Output {
        Output {
            assert: self.assert().success(),
        }
    }

    pub fn fails(self) -> Output {
        Output {
            assert: self.assert().failure(),
        }
    }

    fn assert(self) -> Assert {
        let mut cmd = assert_cmd::Command::from_std(self.cmd);
        cmd.timeout(COMMAND_TIMEOUT);
        cmd.assert()
    }
}

pub struct Output {
    assert: Assert,
}

impl Output {
    pub fn stdout_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stdout(predicate::str::contains(expected)),
        }
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        Self {
            assert: self
                .assert
                .stdout(predicate::str::contains(unexpected).not()),
        }
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stderr(predicate::str::contains(expected)),
        }
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).into_owned()
    }
}
