// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Pipeline orchestration runtime

pub mod actions;
pub mod api;
mod controller;
mod error;
pub mod exec;
mod job;
mod local;
mod project;
pub mod registry;
mod wrapper;

pub use actions::{parse_workflow, Deployment, RunOutcome, RunRequest, Workflow};
pub use controller::{Controller, ControllerError};
pub use error::{ActionError, ProjectError};
pub use exec::{CommandSpec, ExecError, InputMode};
pub use job::{Job, Successor};
pub use local::LocalOrchestrator;
pub use project::{Project, QueryOutcome, Topology};
pub use registry::{RegistryError, ServiceSpec};
pub use wrapper::{Wrapper, WrapperConfig, WrapperError};
