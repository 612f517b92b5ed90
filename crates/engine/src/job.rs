// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out/fan-in over a stage's successors
//!
//! A job dispatches one invocation to every successor concurrently and
//! aggregates the first response of each reply. It reaches a terminal
//! status exactly once: when the last expected response arrives, when its
//! deadline expires, or when its owner finalizes a job without successors.

use pipes_adapters::RpcBus;
use pipes_core::{Invocation, JobId, JobStatus, Response};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// A successor stage and the bus address it is registered at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Successor {
    pub name: String,
    pub uri: String,
}

#[derive(Debug)]
struct JobState {
    status: JobStatus,
    responses: Vec<Response>,
}

/// One outstanding fan-out round
#[derive(Debug)]
pub struct Job {
    id: JobId,
    successors: Vec<Successor>,
    state: Mutex<JobState>,
    done: watch::Sender<bool>,
    cancel: CancellationToken,
}

impl Job {
    pub fn new(id: JobId, successors: Vec<Successor>) -> Arc<Self> {
        tracing::debug!(job_id = %id, successors = successors.len(), "job created");
        let (done, _) = watch::channel(false);
        Arc::new(Self {
            id,
            successors,
            state: Mutex::new(JobState {
                status: JobStatus::NotStarted,
                responses: Vec::new(),
            }),
            done,
            cancel: CancellationToken::new(),
        })
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn successors(&self) -> &[Successor] {
        &self.successors
    }

    pub fn status(&self) -> JobStatus {
        self.lock().status
    }

    /// Responses accumulated so far, in arrival order
    pub fn responses(&self) -> Vec<Response> {
        self.lock().responses.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Dispatch `invocation` to every successor on its own task
    pub fn call<B: RpcBus>(self: &Arc<Self>, bus: &B, invocation: Invocation) {
        {
            let mut state = self.lock();
            if state.status == JobStatus::NotStarted {
                state.status = JobStatus::Started;
            }
        }

        for successor in &self.successors {
            let job = Arc::clone(self);
            let bus = bus.clone();
            let successor = successor.clone();
            let invocation = invocation.clone();
            tokio::spawn(async move {
                let reply = tokio::select! {
                    _ = job.cancel.cancelled() => return,
                    reply = bus.call(&successor.uri, invocation) => reply,
                };
                let response = match reply {
                    Ok(reply) => reply.first(),
                    Err(e) => {
                        tracing::error!(job_id = %job.id, service = %successor.name, error = %e, "successor call failed");
                        Response::Failure(e.to_string())
                    }
                };
                job.result(response);
            });
        }
    }

    /// Record one successor response
    ///
    /// Once every successor has answered, the job becomes `Error` if any
    /// response is a failure and `Success` otherwise. Responses arriving
    /// after a terminal status are dropped.
    pub fn result(&self, response: Response) {
        let mut state = self.lock();
        if state.status.is_terminal() {
            tracing::warn!(job_id = %self.id, "response after job finished, dropped");
            return;
        }
        tracing::debug!(job_id = %self.id, %response, "result");
        state.responses.push(response);

        if state.responses.len() == self.successors.len() {
            state.status = if state.responses.iter().any(Response::is_failure) {
                JobStatus::Error
            } else {
                JobStatus::Success
            };
            tracing::info!(job_id = %self.id, status = %state.status, "job finished");
            drop(state);
            self.done.send_replace(true);
        }
    }

    /// Wait until the job reaches a terminal status
    ///
    /// With a deadline, outstanding calls are cancelled on expiry and the job
    /// finishes as `Error`. Cancelling a call drops it, which on
    /// [`LocalBus`](pipes_adapters::LocalBus) also aborts the callee. A job
    /// without successors is never waited on.
    pub async fn wait(&self, deadline: Option<Duration>) -> JobStatus {
        if self.successors.is_empty() {
            return self.status();
        }

        let finished = Self::finished(self.done.subscribe());
        match deadline {
            None => finished.await,
            Some(limit) => {
                if tokio::time::timeout(limit, finished).await.is_err() {
                    self.expire(limit);
                }
            }
        }
        self.status()
    }

    async fn finished(mut done: watch::Receiver<bool>) {
        while !*done.borrow_and_update() {
            if done.changed().await.is_err() {
                return;
            }
        }
    }

    fn expire(&self, limit: Duration) {
        self.cancel.cancel();
        let mut state = self.lock();
        if state.status.is_terminal() {
            return;
        }
        let message = format!("job {} timed out after {}ms", self.id, limit.as_millis());
        tracing::error!(job_id = %self.id, pending = self.successors.len() - state.responses.len(), "job timed out");
        state.responses.push(Response::Failure(message));
        state.status = JobStatus::Error;
        drop(state);
        self.done.send_replace(true);
    }

    /// Complete a job that has not reached a terminal status
    ///
    /// An aggregated `Error` is kept as is.
    pub fn finalize(&self) {
        let mut state = self.lock();
        if state.status.is_terminal() {
            return;
        }
        state.status = JobStatus::Success;
        drop(state);
        self.done.send_replace(true);
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
