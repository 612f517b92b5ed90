// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status state machine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one fan-out/fan-in round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(JobId)
    }
}

/// Status of a job
///
/// ```text
/// NotStarted -> Started -> Success
///                       -> Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Constructed, no calls issued
    NotStarted,
    /// Calls dispatched, awaiting responses
    Started,
    /// Every response arrived and none is a failure
    Success,
    /// Every response arrived and at least one is a failure
    Error,
}

impl JobStatus {
    /// Human-readable label used by the status endpoint
    pub fn message(self) -> &'static str {
        match self {
            JobStatus::NotStarted => "Not started",
            JobStatus::Started => "Started",
            JobStatus::Success => "Success",
            JobStatus::Error => "Error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Error)
    }

    /// Parse the label produced by [`JobStatus::message`]
    pub fn from_message(message: &str) -> Option<Self> {
        match message.trim() {
            "Not started" => Some(JobStatus::NotStarted),
            "Started" => Some(JobStatus::Started),
            "Success" => Some(JobStatus::Success),
            "Error" => Some(JobStatus::Error),
            _ => None,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
