// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster-level service registry
//!
//! Every runnable service has a command line and an input mode recorded
//! under `services/<name>`. Stage workers read their entry at startup.

use crate::exec::{CommandSpec, ExecError, InputMode};
use pipes_core::consts::DEFAULT_INPUT_MODE;
use pipes_core::paths::{service_dir, NAMES_DIR};
use pipes_storage::{KvStore, StoreError};
use thiserror::Error;

const SERVICES_DIR: &str = "services";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("service not registered: {0}")]
    NotRegistered(String),
    #[error("invalid service {name}: {source}")]
    Invalid {
        name: String,
        #[source]
        source: ExecError,
    },
    #[error("store already initialized: {0}")]
    AlreadyInitialized(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A registered service: what to run and how to feed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub command: CommandSpec,
    pub mode: InputMode,
}

/// Record a service's command and input mode
pub fn register_service<S: KvStore>(
    store: &S,
    name: &str,
    command: &str,
    mode: InputMode,
) -> Result<(), RegistryError> {
    CommandSpec::parse(command).map_err(|source| RegistryError::Invalid {
        name: name.to_string(),
        source,
    })?;
    let dir = service_dir(name);
    store.write("command", command.trim(), &dir)?;
    store.write("input_mode", mode.as_str(), &dir)?;
    tracing::info!(service = name, command, %mode, "service registered");
    Ok(())
}

/// Load a service's registry entry
///
/// A missing `input_mode` falls back to stdin; an unknown one is an error.
pub fn load_service<S: KvStore>(store: &S, name: &str) -> Result<ServiceSpec, RegistryError> {
    let dir = service_dir(name);
    let command = match store.read("command", &dir) {
        Ok(command) => command,
        Err(e) if e.is_not_found() => return Err(RegistryError::NotRegistered(name.to_string())),
        Err(e) => return Err(e.into()),
    };
    let mode = match store.read("input_mode", &dir) {
        Ok(mode) => mode,
        Err(e) if e.is_not_found() => DEFAULT_INPUT_MODE.to_string(),
        Err(e) => return Err(e.into()),
    };

    let invalid = |source| RegistryError::Invalid {
        name: name.to_string(),
        source,
    };
    Ok(ServiceSpec {
        command: CommandSpec::parse(&command).map_err(invalid)?,
        mode: mode.parse().map_err(invalid)?,
    })
}

/// Create the cluster-level directories of an empty store
pub fn init_store<S: KvStore>(store: &S) -> Result<(), RegistryError> {
    match store.list(SERVICES_DIR, "") {
        Ok(_) => return Err(RegistryError::AlreadyInitialized(store.addr())),
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
    }
    store.write(SERVICES_DIR, "", "")?;
    store.write(NAMES_DIR, "", "")?;
    tracing::info!(addr = %store.addr(), "store initialized");
    Ok(())
}

/// A `path[:mode]` build target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// File name of the executable
    pub name: String,
    pub command: String,
    pub mode: InputMode,
}

impl BuildTarget {
    pub fn parse(target: &str) -> Result<Self, RegistryError> {
        let (path, mode) = match target.split_once(':') {
            Some((path, mode)) => (path.trim(), Some(mode)),
            None => (target.trim(), None),
        };
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        let invalid = |source| RegistryError::Invalid {
            name: name.clone(),
            source,
        };
        if name.is_empty() {
            return Err(invalid(ExecError::EmptyCommand));
        }
        let mode = match mode {
            Some(mode) => mode.parse().map_err(invalid)?,
            None => InputMode::default(),
        };
        Ok(Self {
            name,
            command: path.to_string(),
            mode,
        })
    }
}

/// Register the executable at a `path[:mode]` target under its file name
pub fn build_service<S: KvStore>(store: &S, target: &str) -> Result<BuildTarget, RegistryError> {
    let target = BuildTarget::parse(target)?;
    register_service(store, &target.name, &target.command, target.mode)?;
    Ok(target)
}

/// Load the registry entry behind a stage name
///
/// A stage such as `upper.2` runs the `upper` service: while the full name
/// is not registered, trailing `.suffix` parts are dropped one at a time.
pub fn resolve_service<S: KvStore>(store: &S, stage: &str) -> Result<ServiceSpec, RegistryError> {
    let mut name = stage;
    loop {
        match load_service(store, name) {
            Err(RegistryError::NotRegistered(_)) => match name.rsplit_once('.') {
                Some((shorter, _)) if !shorter.is_empty() => name = shorter,
                _ => return Err(RegistryError::NotRegistered(stage.to_string())),
            },
            found => {
                if name != stage {
                    tracing::debug!(stage, service = name, "stage resolved to service");
                }
                return found;
            }
        }
    }
}

/// Names of every registered service
pub fn registered_services<S: KvStore>(store: &S) -> Result<Vec<String>, RegistryError> {
    match store.list(SERVICES_DIR, "") {
        Ok(names) => Ok(names),
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
