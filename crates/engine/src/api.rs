// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface of the front-door stage
//!
//! - `POST /` with form field `query` submits a job: `Job ID: <n>`
//! - `GET /jobs/:id/` reports it: `Job ID`, `Job status` and, once settled,
//!   `Job result` or `Job error`

use crate::job::Job;
use crate::wrapper::Wrapper;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Form, Router};
use pipes_adapters::RpcBus;
use pipes_core::{JobId, JobStatus};
use pipes_storage::KvStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Build the front-door router around the `api` stage wrapper
pub fn router<S: KvStore, B: RpcBus>(wrapper: Arc<Wrapper<S, B>>) -> Router {
    Router::new()
        .route("/", post(submit::<S, B>))
        .route("/jobs/:id/", get(report::<S, B>))
        .with_state(wrapper)
}

/// Serve the front door until `shutdown` is cancelled
pub async fn serve<S: KvStore, B: RpcBus>(
    listener: TcpListener,
    wrapper: Arc<Wrapper<S, B>>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "serving API");
    }
    axum::serve(listener, router(wrapper))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

async fn submit<S: KvStore, B: RpcBus>(
    State(wrapper): State<Arc<Wrapper<S, B>>>,
    Form(fields): Form<Vec<(String, String)>>,
) -> String {
    let query: Vec<String> = fields
        .into_iter()
        .filter(|(key, _)| key == "query")
        .map(|(_, value)| value)
        .collect();
    tracing::debug!(?query, "query received");

    let job = wrapper.handle(query);
    if job.successors().is_empty() {
        job.finalize();
    }
    format!("Job ID: {}\n", job.id())
}

async fn report<S: KvStore, B: RpcBus>(
    State(wrapper): State<Arc<Wrapper<S, B>>>,
    Path(id): Path<String>,
) -> Result<String, StatusCode> {
    let id: JobId = id.parse().map_err(|_| StatusCode::NOT_FOUND)?;
    let job = wrapper.job(id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(render_report(&job))
}

/// Text report of a job as served on `/jobs/:id/`
pub fn render_report(job: &Job) -> String {
    let status = job.status();
    let mut report = format!("Job ID: {}\nJob status: {}\n", job.id(), status.message());
    let first = job.responses().into_iter().next();
    match status {
        JobStatus::Success => {
            let result = first.map(|r| r.to_string()).unwrap_or_default();
            report.push_str(&format!("Job result: {}\n", result));
        }
        JobStatus::Error => {
            let failure = job
                .responses()
                .into_iter()
                .find(|r| r.is_failure())
                .or(first)
                .map(|r| r.to_string())
                .unwrap_or_default();
            report.push_str(&format!("Job error: {}\n", failure));
        }
        JobStatus::NotStarted | JobStatus::Started => {}
    }
    report
}

/// Parse a job report into its status and result or error text
pub fn parse_report(body: &str) -> Option<(JobStatus, String)> {
    let body = body.strip_suffix('\n').unwrap_or(body);
    let mut lines = body.splitn(3, '\n');
    lines.next()?.strip_prefix("Job ID: ")?;
    let status = JobStatus::from_message(lines.next()?.strip_prefix("Job status: ")?)?;
    let rest = lines.next().unwrap_or("");
    let detail = rest
        .strip_prefix("Job result: ")
        .or_else(|| rest.strip_prefix("Job error: "))
        .unwrap_or(rest);
    Some((status, detail.to_string()))
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
