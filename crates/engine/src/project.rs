// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Projects and their pipeline topology
//!
//! A project owns everything under `projects/<id>` in the store. Its
//! pipeline is kept twice: as one `next` edge per stage, which stage
//! workers read to find their successors, and as a JSON snapshot of the
//! ordered stage list, which is how the topology is loaded back.

use crate::api;
use crate::error::ProjectError;
use pipes_core::consts::{API_SERVICE, QUERY_POLL_INTERVAL, QUERY_TIMEOUT};
use pipes_core::paths::{
    containers_dir, next_dir, project_dir, stage_dir, stages_dir, MAIN_PROJECT_KEY, NAMES_DIR,
};
use pipes_core::{names, Container, IdGen, JobId, JobStatus, UuidIdGen};
use pipes_storage::{KvStore, StoreError};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

const TOPOLOGY_KEY: &str = "topology";

/// Random names tried before giving up on an unnamed project
const NAME_ATTEMPTS: usize = 16;

/// Why `name` cannot be a store path segment, if it cannot
fn bad_name(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("empty name")
    } else if name.contains('/') || name.chars().any(char::is_whitespace) {
        Some("must not contain '/' or whitespace")
    } else {
        None
    }
}

/// Ordered pipeline stages, starting with the front door
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    stages: Vec<String>,
}

impl Topology {
    /// Build the topology of `services`, prepending the front door
    pub fn new(services: &[String]) -> Result<Self, ProjectError> {
        let mut seen = HashSet::new();
        for name in services {
            let reason = if let reason @ Some(_) = bad_name(name) {
                reason
            } else if name == API_SERVICE {
                Some("reserved for the front door")
            } else if !seen.insert(name.as_str()) {
                Some("appears twice in the pipeline")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(ProjectError::InvalidStage {
                    name: name.clone(),
                    reason,
                });
            }
        }

        let mut stages = Vec::with_capacity(services.len() + 1);
        stages.push(API_SERVICE.to_string());
        stages.extend(services.iter().cloned());
        Ok(Self { stages })
    }

    fn from_stages(stages: Vec<String>) -> Result<Self, ProjectError> {
        match stages.split_first() {
            Some((first, rest)) if first == API_SERVICE => Self::new(rest),
            _ => Self::new(&stages),
        }
    }

    /// Every stage, front door first
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Stages after the front door
    pub fn services(&self) -> &[String] {
        &self.stages[1..]
    }

    /// Immediate successors of `stage`; empty for the terminus or an unknown stage
    pub fn successors(&self, stage: &str) -> &[String] {
        match self.stages.iter().position(|s| s == stage) {
            Some(i) if i + 1 < self.stages.len() => &self.stages[i + 1..i + 2],
            _ => &[],
        }
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            stages: vec![API_SERVICE.to_string()],
        }
    }
}

/// Final state observed by a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The pipeline answered with this output
    Result(String),
    /// A stage failed with this message
    Failed(String),
    /// No terminal status within the query timeout
    Timeout,
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutcome::Result(output) => f.write_str(output),
            QueryOutcome::Failed(message) => write!(f, "Job error: {}", message),
            QueryOutcome::Timeout => f.write_str("Timeout"),
        }
    }
}

/// A pipeline project backed by a store
#[derive(Clone)]
pub struct Project<S> {
    id: String,
    name: String,
    store: S,
    topology: Topology,
}

impl<S: KvStore> Project<S> {
    /// Create a project; an empty name gets a random one
    pub fn new(name: &str, store: S) -> Result<Self, ProjectError> {
        Self::with_id_gen(name, store, &UuidIdGen)
    }

    pub fn with_id_gen(name: &str, store: S, ids: &impl IdGen) -> Result<Self, ProjectError> {
        let name = if name.is_empty() {
            Self::free_random_name(&store)?
        } else if let Some(reason) = bad_name(name) {
            return Err(ProjectError::InvalidName {
                name: name.to_string(),
                reason,
            });
        } else if Self::name_taken(&store, name)? {
            return Err(ProjectError::AlreadyExists(name.to_string()));
        } else {
            name.to_string()
        };
        let id = ids.next();

        let dir = project_dir(&id);
        store.write("name", &name, &dir)?;
        store.write("running", "true", &dir)?;
        store.write("services", "", &dir)?;
        store.write(&name, &id, NAMES_DIR)?;
        store.write(MAIN_PROJECT_KEY, &id, "")?;

        tracing::info!(project_id = %id, name, "project created");
        Ok(Self {
            id,
            name,
            store,
            topology: Topology::default(),
        })
    }

    fn name_taken(store: &S, name: &str) -> Result<bool, ProjectError> {
        match store.read(name, NAMES_DIR) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn free_random_name(store: &S) -> Result<String, ProjectError> {
        let mut name = names::random_name();
        for _ in 1..NAME_ATTEMPTS {
            if !Self::name_taken(store, &name)? {
                return Ok(name);
            }
            name = names::random_name();
        }
        Err(ProjectError::AlreadyExists(name))
    }

    /// Reload a project by ID
    pub fn get(id: &str, store: S) -> Result<Self, ProjectError> {
        let dir = project_dir(id);
        let name = match store.read("name", &dir) {
            Ok(name) => name,
            Err(e) if e.is_not_found() => return Err(ProjectError::NotFound(id.to_string())),
            Err(e) => return Err(e.into()),
        };

        let mut project = Self {
            id: id.to_string(),
            name,
            store,
            topology: Topology::default(),
        };
        project.topology = match project.store.read(TOPOLOGY_KEY, &dir) {
            Ok(snapshot) => Topology::from_stages(serde_json::from_str(&snapshot)?)?,
            Err(e) if e.is_not_found() => Topology::new(&project.pipes()?)?,
            Err(e) => return Err(e.into()),
        };
        Ok(project)
    }

    /// Find a running project by name or ID, or the main project when `None`
    pub fn lookup(name_or_id: Option<&str>, store: S) -> Result<Self, ProjectError> {
        let id = match name_or_id {
            None => match store.read(MAIN_PROJECT_KEY, "") {
                Ok(id) => id,
                Err(e) if e.is_not_found() => {
                    return Err(ProjectError::NotFound(MAIN_PROJECT_KEY.to_string()))
                }
                Err(e) => return Err(e.into()),
            },
            Some(key) => match store.read(key, NAMES_DIR) {
                Ok(id) => id,
                Err(e) if e.is_not_found() => key.to_string(),
                Err(e) => return Err(e.into()),
            },
        };

        let project = Self::get(&id, store)?;
        if !project.running() {
            return Err(ProjectError::NotRunning(project.id));
        }
        tracing::debug!(project_id = %project.id, "project found");
        Ok(project)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Services of the pipeline, front door excluded
    pub fn services(&self) -> &[String] {
        self.topology.services()
    }

    /// Author the pipeline graph for `services`
    pub fn set_services(&mut self, services: &[String]) -> Result<(), ProjectError> {
        let topology = Topology::new(services)?;
        let stages = topology.stages();

        let dir = stages_dir(&self.id);
        for (i, stage) in stages.iter().enumerate() {
            self.store.write(stage, "", &dir)?;
            self.store.write("next", "", &stage_dir(&self.id, stage))?;
            if let Some(next) = stages.get(i + 1) {
                self.store.write(next, "", &next_dir(&self.id, stage))?;
            }
        }
        self.store.write(
            TOPOLOGY_KEY,
            &serde_json::to_string(stages)?,
            &project_dir(&self.id),
        )?;

        tracing::info!(project_id = %self.id, stages = ?stages, "topology written");
        self.topology = topology;
        Ok(())
    }

    /// Successor names recorded under `stage`
    pub fn successors(&self, stage: &str) -> Result<Vec<String>, StoreError> {
        self.store.list("next", &stage_dir(&self.id, stage))
    }

    /// Walk the recorded edges from the front door
    ///
    /// Returns the chain without the front door; a project whose pipeline
    /// was never written has an empty chain.
    pub fn pipes(&self) -> Result<Vec<String>, ProjectError> {
        let mut chain: Vec<String> = Vec::new();
        let mut stage = API_SERVICE.to_string();
        loop {
            let next = match self.successors(&stage) {
                Ok(next) => next,
                Err(e) if e.is_not_found() && stage == API_SERVICE => return Ok(chain),
                Err(e) => return Err(e.into()),
            };
            match next.into_iter().next() {
                Some(n) if n != API_SERVICE && !chain.contains(&n) => {
                    chain.push(n.clone());
                    stage = n;
                }
                _ => return Ok(chain),
            }
        }
    }

    /// Record a running container of `service`
    pub fn set_container(&self, service: &str, container: &Container) -> Result<(), ProjectError> {
        self.store
            .write(&container.id, &container.ip, &containers_dir(&self.id, service))?;
        Ok(())
    }

    /// First recorded container of `service`
    pub fn get_container(&self, service: &str) -> Result<Container, ProjectError> {
        let dir = containers_dir(&self.id, service);
        let ids = match self.store.list("", &dir) {
            Ok(ids) => ids,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let id = ids
            .into_iter()
            .next()
            .ok_or_else(|| ProjectError::NoContainer(service.to_string()))?;
        let ip = self.store.read(&id, &dir)?;
        Ok(Container {
            id,
            ip,
            ..Container::default()
        })
    }

    pub fn remove_container(&self, service: &str, container: &Container) -> Result<(), ProjectError> {
        self.store
            .delete(&container.id, &containers_dir(&self.id, service))?;
        Ok(())
    }

    /// Record the network address of `stage`
    pub fn set_addr(&self, stage: &str, addr: &str) -> Result<(), ProjectError> {
        self.store.write("addr", addr, &stage_dir(&self.id, stage))?;
        Ok(())
    }

    pub fn addr(&self, stage: &str) -> Result<String, ProjectError> {
        Ok(self.store.read("addr", &stage_dir(&self.id, stage))?)
    }

    /// Whether the project is running; unreadable state counts as stopped
    pub fn running(&self) -> bool {
        self.store
            .read("running", &project_dir(&self.id))
            .ok()
            .and_then(|value| value.trim().parse::<bool>().ok())
            .unwrap_or(false)
    }

    pub fn stop(&self) -> Result<(), ProjectError> {
        self.store
            .write("running", "false", &project_dir(&self.id))?;
        tracing::info!(project_id = %self.id, "project stopped");
        Ok(())
    }

    /// Submit `text` to the front door and poll until the job settles
    pub async fn query(&self, text: &str) -> Result<QueryOutcome, ProjectError> {
        self.query_with(text, QUERY_POLL_INTERVAL, QUERY_TIMEOUT).await
    }

    pub(crate) async fn query_with(
        &self,
        text: &str,
        interval: Duration,
        timeout: Duration,
    ) -> Result<QueryOutcome, ProjectError> {
        if !self.running() {
            return Err(ProjectError::NotRunning(self.id.clone()));
        }
        let api = self.addr(API_SERVICE)?;
        // The front door is always reached directly
        let client = reqwest::Client::builder().no_proxy().build()?;

        let response = client
            .post(format!("http://{}/", api))
            .form(&[("query", text)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProjectError::Api(format!("{} submitting query", status)));
        }
        let job: JobId = body
            .trim()
            .strip_prefix("Job ID: ")
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| ProjectError::Api(format!("unexpected response: {:?}", body)))?;
        tracing::info!(project_id = %self.id, job_id = %job, "query submitted");

        let tries = (timeout.as_millis() / interval.as_millis().max(1)).max(1);
        for _ in 0..tries {
            tokio::time::sleep(interval).await;
            let response = client
                .get(format!("http://{}/jobs/{}/", api, job))
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(ProjectError::Api(format!("{} polling job {}", status, job)));
            }
            let (job_status, detail) = api::parse_report(&body)
                .ok_or_else(|| ProjectError::Api(format!("unexpected job report: {:?}", body)))?;
            tracing::debug!(job_id = %job, status = %job_status, "polled");
            match job_status {
                JobStatus::Success => return Ok(QueryOutcome::Result(detail)),
                JobStatus::Error => return Ok(QueryOutcome::Failed(detail)),
                JobStatus::NotStarted | JobStatus::Started => {}
            }
        }
        tracing::warn!(job_id = %job, timeout_ms = timeout.as_millis() as u64, "query timed out");
        Ok(QueryOutcome::Timeout)
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
