// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod build;
pub mod init;
pub mod query;
pub mod register;
pub mod rm;
pub mod run;
