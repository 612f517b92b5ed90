// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Every command returns `anyhow::Result`; on failure `main` turns the error
//! into a [`PipesError`] that says:
//! - what went wrong (message)
//! - why it might have happened (context)
//! - how to fix it (suggestions)

use pipes_adapters::OrchError;
use pipes_engine::{ActionError, ControllerError, ProjectError, RegistryError};
use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct PipesError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl PipesError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn project_not_found(name: &str) -> Self {
        PipesError::new(format!("project does not exist: {}", name))
            .with_context("No project with that name or ID was ever run against this store")
            .with_suggestion("Start one: pipes run -d \"service1 | service2\"")
            .with_suggestion("Check --store (or PIPES_STORE) points at the right file")
    }

    pub fn project_not_running(id: &str) -> Self {
        PipesError::new(format!("project is not running: {}", id))
            .with_context("The project was removed or its `run -d` process exited")
            .with_suggestion("Start it again: pipes run -d --name <name> \"<workflow>\"")
    }

    pub fn service_not_registered(service: &str) -> Self {
        PipesError::new(format!("service not registered: {}", service))
            .with_context("Every stage of a workflow needs a command in the registry")
            .with_suggestion(format!("Register it: pipes register {} \"<command>\"", service))
    }

    pub fn empty_workflow(message: String) -> Self {
        PipesError::new(message).with_suggestion("Example: pipes run \"upper hello | rev\"")
    }

    /// Build a friendly error from whatever a command returned
    pub fn explain(err: &anyhow::Error) -> Self {
        if let Some(action) = err.downcast_ref::<ActionError>() {
            return Self::from_action(action);
        }
        if let Some(RegistryError::NotRegistered(service)) = err.downcast_ref::<RegistryError>() {
            return Self::service_not_registered(service);
        }
        Self::with_causes(PipesError::new(err.to_string()), err.chain().skip(1))
    }

    fn from_action(err: &ActionError) -> Self {
        match err {
            ActionError::EmptyWorkflow => Self::empty_workflow(err.to_string()),
            ActionError::Project(ProjectError::NotFound(name)) => Self::project_not_found(name),
            ActionError::Project(ProjectError::NotRunning(id)) => Self::project_not_running(id),
            ActionError::Controller(ControllerError::Launch {
                service,
                source: OrchError::ImageNotFound(_),
            }) => Self::service_not_registered(service),
            ActionError::Controller(ControllerError::Project(ProjectError::NotFound(name))) => {
                Self::project_not_found(name)
            }
            other => {
                let mut causes = Vec::new();
                let mut source = std::error::Error::source(other);
                while let Some(cause) = source {
                    causes.push(cause);
                    source = cause.source();
                }
                Self::with_causes(PipesError::new(other.to_string()), causes.into_iter())
            }
        }
    }

    fn with_causes<'a>(
        mut err: Self,
        causes: impl Iterator<Item = &'a (dyn std::error::Error + 'static)>,
    ) -> Self {
        for cause in causes {
            let cause = cause.to_string();
            if !err.message.contains(&cause) {
                err = err.with_context(cause);
            }
        }
        err
    }
}

impl fmt::Display for PipesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for PipesError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
