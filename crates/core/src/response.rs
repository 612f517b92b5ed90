// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payloads carried over the RPC bus

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Keyed arguments of a call or reply
pub type Kwargs = BTreeMap<String, String>;

/// Outcome produced by one stage
///
/// Failures travel as data: a stage whose command failed still answers its
/// caller successfully, with a `Failure` in its reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Value(String),
    Failure(String),
}

impl Response {
    pub fn is_failure(&self) -> bool {
        matches!(self, Response::Failure(_))
    }

    /// The value or the failure message
    pub fn text(&self) -> &str {
        match self {
            Response::Value(v) | Response::Failure(v) => v,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A call to a registered procedure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub args: Vec<String>,
    #[serde(default)]
    pub kwargs: Kwargs,
}

impl Invocation {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            kwargs: Kwargs::new(),
        }
    }
}

/// The answer of a registered procedure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub args: Vec<Response>,
    #[serde(default)]
    pub kwargs: Kwargs,
}

impl Reply {
    pub fn new(args: Vec<Response>) -> Self {
        Self {
            args,
            kwargs: Kwargs::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(vec![Response::Failure(message.into())])
    }

    /// The response a caller records for this reply: its first positional
    /// argument, or a failure when the reply is empty.
    pub fn first(&self) -> Response {
        self.args
            .first()
            .cloned()
            .unwrap_or_else(|| Response::Failure("empty reply".to_string()))
    }
}
