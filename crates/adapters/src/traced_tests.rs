// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::bus::LocalBus;
use crate::orch::FakeOrchestrator;
use pipes_core::Response;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn container(image: &str) -> Container {
    Container {
        name: "brave_turing3".to_string(),
        image: Image::named(image),
        ..Container::default()
    }
}

struct Echo;

#[async_trait]
impl Procedure for Echo {
    async fn invoke(&self, invocation: Invocation) -> Reply {
        Reply::new(invocation.args.into_iter().map(Response::Value).collect())
    }
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[tokio::test]
async fn traced_orch_rejects_container_without_image() {
    let fake = FakeOrchestrator::default();
    let traced = TracedOrchestrator::new(fake.clone());

    let mut c = container("");
    let err = traced.run(&mut c).await.unwrap_err();

    assert!(err.to_string().contains("no image set"), "got: {err}");
    assert!(fake.calls().is_empty());
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_orch_run_logs_entry_and_completion() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedOrchestrator::new(FakeOrchestrator::default());
        let mut c = container("pipes/api");
        traced.run(&mut c).await.map(|_| c)
    });

    let c = result.unwrap();
    assert!(c.active);
    assert!(logs.contains("orch.run"), "missing span: {logs}");
    assert!(logs.contains("starting"), "missing entry log: {logs}");
    assert!(logs.contains("container running"), "missing completion: {logs}");
    assert!(logs.contains("elapsed_ms"), "missing timing: {logs}");
}

#[test]
fn traced_orch_run_logs_failures() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeOrchestrator::default();
        fake.fail_runs_of("broken");
        let traced = TracedOrchestrator::new(fake);
        let mut c = container("broken");
        traced.run(&mut c).await
    });

    assert!(result.is_err());
    assert!(logs.contains("run failed"), "missing error log: {logs}");
}

#[test]
fn traced_bus_call_logs_timing() {
    let (logs, result) = with_tracing(|| async {
        let bus = TracedBus::new(LocalBus::new());
        bus.join("realm1").await.unwrap();
        bus.register("com.p.echo", Arc::new(Echo)).await.unwrap();
        bus.call("com.p.echo", Invocation::new(vec!["x".to_string()]))
            .await
    });

    let reply = result.unwrap();
    assert_eq!(reply.first(), Response::Value("x".to_string()));
    assert!(logs.contains("bus.register"), "missing register span: {logs}");
    assert!(logs.contains("bus.call"), "missing call span: {logs}");
    assert!(logs.contains("replied"), "missing reply log: {logs}");
}

#[test]
fn traced_bus_call_logs_missing_procedure() {
    let (logs, result) = with_tracing(|| async {
        let bus = TracedBus::new(LocalBus::new());
        bus.join("realm1").await.unwrap();
        bus.call("com.p.nowhere", Invocation::default()).await
    });

    assert!(result.is_err());
    assert!(logs.contains("call failed"), "missing error log: {logs}");
}
