// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level actions: run a workflow, query a project, remove a project
//!
//! Actions write their user-facing lines to `out`; logging goes through
//! `tracing`.

use crate::controller::Controller;
use crate::error::{ActionError, ProjectError};
use crate::project::{Project, QueryOutcome};
use pipes_adapters::Orchestrator;
use pipes_core::Container;
use pipes_storage::KvStore;
use std::io::Write;

/// A parsed workflow: `svcA words | svcB | svcC`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub services: Vec<String>,
    /// Words after the first service, submitted as the initial query
    pub query: Option<String>,
}

pub fn parse_workflow(workflow: &str) -> Result<Workflow, ActionError> {
    if workflow.trim().is_empty() {
        return Err(ActionError::EmptyWorkflow);
    }

    let mut services = Vec::new();
    let mut query = None;
    for (i, segment) in workflow.split('|').enumerate() {
        let mut words = segment.split_whitespace();
        let service = words
            .next()
            .ok_or_else(|| ActionError::EmptyService(workflow.to_string()))?;
        let rest: Vec<&str> = words.collect();
        if i == 0 {
            if !rest.is_empty() {
                query = Some(rest.join(" "));
            }
        } else if !rest.is_empty() {
            tracing::warn!(service, ignored = ?rest, "arguments after a later stage are ignored");
        }
        services.push(service.to_string());
    }
    Ok(Workflow { services, query })
}

#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub workflow: String,
    /// Project name; random when `None`
    pub name: Option<String>,
    /// Keep the pipeline running instead of querying and stopping it
    pub detach: bool,
}

/// A project left running by a detached run
pub struct Deployment<O, S> {
    pub controller: Controller<O, S>,
    pub containers: Vec<(String, Container)>,
}

impl<O: Orchestrator, S: KvStore> Deployment<O, S> {
    /// Whether the project is still marked running
    pub fn running(&self) -> bool {
        self.controller.project().running()
    }

    /// Stop the project and its containers
    pub async fn shutdown(self) -> Result<(), ActionError> {
        self.controller.stop()?;
        self.controller.teardown(&self.containers).await?;
        Ok(())
    }
}

pub enum RunOutcome<O, S> {
    /// The project keeps running
    Detached(Deployment<O, S>),
    /// The workflow was queried (when it had a query) and stopped
    Completed(Option<QueryOutcome>),
}

/// Create a project for the workflow and launch every stage
pub async fn run<O, S, W>(
    orch: O,
    store: S,
    request: &RunRequest,
    out: &mut W,
) -> Result<RunOutcome<O, S>, ActionError>
where
    O: Orchestrator,
    S: KvStore,
    W: Write + Send,
{
    let workflow = parse_workflow(&request.workflow)?;
    tracing::debug!(services = ?workflow.services, detach = request.detach, "running workflow");

    let mut project = Project::new(request.name.as_deref().unwrap_or(""), store)?;
    project.set_services(&workflow.services)?;
    tracing::debug!(project_id = %project.id(), name = %project.name(), "project ready");
    if request.detach {
        writeln!(out, "Project {} ({})", project.id(), project.name())?;
    }

    let controller = Controller::new(orch, project);
    let containers = match controller.launch_all().await {
        Ok(containers) => containers,
        Err(e) => {
            if let Err(stop_err) = controller.stop() {
                tracing::warn!(error = %stop_err, "project not marked stopped");
            }
            return Err(e.into());
        }
    };
    let api_addr = containers
        .first()
        .map(|(_, api)| api.addr())
        .unwrap_or_default();
    tracing::debug!(addr = %api_addr, "API listening");

    let deployment = Deployment {
        controller,
        containers,
    };
    if request.detach {
        writeln!(out, "API listening on: http://{}", api_addr)?;
        return Ok(RunOutcome::Detached(deployment));
    }

    let outcome = match &workflow.query {
        Some(query) => {
            let outcome = ask(deployment.controller.project(), query, out).await;
            match outcome {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    deployment.shutdown().await?;
                    return Err(e);
                }
            }
        }
        None => None,
    };
    deployment.shutdown().await?;
    Ok(RunOutcome::Completed(outcome))
}

/// Query a running project by name, or the main project
pub async fn query<S, W>(
    store: S,
    name: Option<&str>,
    text: &str,
    out: &mut W,
) -> Result<QueryOutcome, ActionError>
where
    S: KvStore,
    W: Write + Send,
{
    let project = Project::lookup(name, store)?;
    tracing::info!(project_id = %project.id(), query = text, "query");
    ask(&project, text, out).await
}

/// Mark a running project as stopped
pub fn remove<O, S, W>(
    orch: O,
    store: S,
    name_or_id: Option<&str>,
    out: &mut W,
) -> Result<String, ActionError>
where
    O: Orchestrator,
    S: KvStore,
    W: Write,
{
    let project = Project::lookup(name_or_id, store)?;
    let id = project.id().to_string();
    Controller::new(orch, project).stop()?;
    writeln!(out, "Project deleted: {}", id)?;
    Ok(id)
}

async fn ask<S, W>(
    project: &Project<S>,
    text: &str,
    out: &mut W,
) -> Result<QueryOutcome, ActionError>
where
    S: KvStore,
    W: Write + Send,
{
    if !project.running() {
        return Err(ProjectError::NotRunning(project.id().to_string()).into());
    }
    writeln!(out, "Waiting results ...")?;
    let outcome = project.query(text).await?;
    writeln!(out, "{}", outcome)?;
    Ok(outcome)
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
