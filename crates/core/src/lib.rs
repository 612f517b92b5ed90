// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pipes-core: pure types shared by every pipes crate
//!
//! This crate provides:
//! - The job status state machine and job identifiers
//! - The `Response` tagged union carried over the RPC bus
//! - Container and image descriptors consumed by orchestrators
//! - Store path layout and fixed runtime constants

pub mod consts;
pub mod container;
pub mod id;
pub mod names;
pub mod paths;
pub mod response;
pub mod status;

pub use container::{Container, Image, PortMapping};
pub use id::{IdGen, JobIdGen, SequentialIdGen, UuidIdGen};
pub use response::{Invocation, Kwargs, Reply, Response};
pub use status::{JobId, JobStatus};
