// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service wrapper: one running stage of a pipeline

use crate::exec;
use crate::job::{Job, Successor};
use crate::project::Project;
use crate::registry::{self, RegistryError, ServiceSpec};
use async_trait::async_trait;
use pipes_adapters::{BusError, Procedure, RpcBus};
use pipes_core::paths::stage_uri;
use pipes_core::{Invocation, JobId, JobIdGen, Reply, Response};
use pipes_storage::{KvStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WrapperError {
    #[error("no services following {0}")]
    Topology(String),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("bus error: {0}")]
    Bus(#[from] BusError),
}

/// Runtime settings of a wrapper
#[derive(Debug, Clone, Copy, Default)]
pub struct WrapperConfig {
    /// Deadline for a stage's successors to answer; unbounded when `None`
    pub job_timeout: Option<Duration>,
}

/// Runtime state of one stage
pub struct Wrapper<S, B> {
    name: String,
    project: Project<S>,
    bus: B,
    config: WrapperConfig,
    service: Option<ServiceSpec>,
    successors: Vec<Successor>,
    jobs: Mutex<HashMap<JobId, Arc<Job>>>,
    ids: JobIdGen,
}

impl<S: KvStore, B: RpcBus> Wrapper<S, B> {
    pub fn new(name: &str, project: Project<S>, bus: B) -> Self {
        Self {
            name: name.to_string(),
            project,
            bus,
            config: WrapperConfig::default(),
            service: None,
            successors: Vec::new(),
            jobs: Mutex::new(HashMap::new()),
            ids: JobIdGen::new(),
        }
    }

    pub fn with_config(mut self, config: WrapperConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a job ID counter with other wrappers of the process
    pub fn with_job_ids(mut self, ids: JobIdGen) -> Self {
        self.ids = ids;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bus address this stage answers on
    pub fn uri(&self) -> String {
        stage_uri(self.project.id(), &self.name)
    }

    pub fn successors(&self) -> &[Successor] {
        &self.successors
    }

    /// Load the command and input mode from the service registry
    ///
    /// A dotted stage name (`upper.2`) falls back to its base service.
    pub fn configure(&mut self) -> Result<(), WrapperError> {
        let service = registry::resolve_service(self.project.store(), &self.name)?;
        tracing::debug!(service = %self.name, command = %service.command, mode = %service.mode, "configured");
        self.service = Some(service);
        Ok(())
    }

    /// Discover successors from the recorded topology
    ///
    /// A missing `next` entry is an error; an empty one makes this stage a
    /// terminus.
    pub fn init(&mut self) -> Result<(), WrapperError> {
        let names = match self.project.successors(&self.name) {
            Ok(names) => names,
            Err(e) if e.is_not_found() => return Err(WrapperError::Topology(self.name.clone())),
            Err(e) => return Err(e.into()),
        };
        self.successors = names
            .into_iter()
            .map(|name| Successor {
                uri: stage_uri(self.project.id(), &name),
                name,
            })
            .collect();
        tracing::debug!(service = %self.name, successors = ?self.successors, "initialized");
        Ok(())
    }

    /// Bind this stage's procedure on the bus
    pub async fn register(self: &Arc<Self>) -> Result<(), WrapperError> {
        let procedure: Arc<dyn Procedure> = Arc::clone(self) as Arc<dyn Procedure>;
        self.bus.register(&self.uri(), procedure).await?;
        tracing::info!(service = %self.name, uri = %self.uri(), "registered");
        Ok(())
    }

    /// Open a job over the successors and dispatch `args` without waiting
    pub fn handle(&self, args: Vec<String>) -> Arc<Job> {
        let job = Job::new(self.ids.next(), self.successors.clone());
        self.jobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(job.id(), Arc::clone(&job));
        job.call(&self.bus, Invocation::new(args));
        tracing::info!(service = %self.name, job_id = %job.id(), "job launched");
        job
    }

    /// A job launched by `handle` that is still tracked
    pub fn job(&self, id: JobId) -> Option<Arc<Job>> {
        self.jobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    fn forget(&self, id: JobId) {
        self.jobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }

    /// Run the local command on `invocation`, then fan its output out
    ///
    /// A failed command answers with a `Failure` and calls no successor.
    /// With successors the reply carries their responses; a terminus
    /// answers with its own output.
    pub async fn procedure(&self, invocation: Invocation) -> Reply {
        tracing::info!(service = %self.name, args = ?invocation.args, "call received");

        let Some(service) = &self.service else {
            return Reply::failure(format!("service {} has no command configured", self.name));
        };
        let output = match exec::run(&service.command, service.mode, &invocation.args).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(service = %self.name, error = %e, "command failed");
                return Reply::failure(e.to_string());
            }
        };

        let job = self.handle(vec![output.clone()]);
        let reply = if job.successors().is_empty() {
            Reply::new(vec![Response::Value(output)])
        } else {
            job.wait(self.config.job_timeout).await;
            Reply::new(job.responses())
        };
        job.finalize();
        self.forget(job.id());
        reply
    }
}

#[async_trait]
impl<S: KvStore, B: RpcBus> Procedure for Wrapper<S, B> {
    async fn invoke(&self, invocation: Invocation) -> Reply {
        self.procedure(invocation).await
    }
}

#[cfg(test)]
#[path = "wrapper_tests.rs"]
mod tests;
