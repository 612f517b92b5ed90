// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::controller::Controller;
use crate::exec::InputMode;
use crate::project::QueryOutcome;
use crate::registry::register_service;
use pipes_core::{Invocation, PortMapping, Response, SequentialIdGen};
use pipes_storage::MemoryStore;
use std::time::Duration;

fn project(store: &MemoryStore, services: &[&str]) -> Project<MemoryStore> {
    let mut project =
        Project::with_id_gen("demo", store.clone(), &SequentialIdGen::new("p")).unwrap();
    let services: Vec<String> = services.iter().map(|s| s.to_string()).collect();
    project.set_services(&services).unwrap();
    project
}

fn stage(service: &str) -> Container {
    Container {
        name: format!("demo_{}", service),
        image: Container::image_for_service(service),
        cmd: vec!["memory".into(), "p-1".into(), service.into()],
        ..Container::default()
    }
}

#[tokio::test]
async fn api_container_serves_http_on_loopback() {
    let store = MemoryStore::default();
    project(&store, &["upper"]);
    let orch = LocalOrchestrator::new(store);

    let mut api = Container {
        name: "demo_api".into(),
        image: Image::named(API_IMAGE),
        ports: vec![PortMapping {
            container: "8080".into(),
            host: String::new(),
        }],
        cmd: vec!["memory".into(), "p-1".into()],
        ..Container::default()
    };
    orch.run(&mut api).await.unwrap();

    assert_eq!(api.id, "local-1");
    assert!(api.active);
    assert!(api.addr().starts_with("127.0.0.1:"));
    let response = reqwest::get(format!("http://{}/jobs/1/", api.addr()))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    orch.remove(&api).await.unwrap();
    assert!(orch.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn stage_container_registers_on_the_bus() {
    let store = MemoryStore::default();
    project(&store, &["upper"]);
    register_service(&store, "upper", "tr a-z A-Z", InputMode::Stdin).unwrap();
    let orch = LocalOrchestrator::new(store);

    let mut upper = stage("upper");
    orch.run(&mut upper).await.unwrap();
    assert_eq!(orch.bus().registered(), vec!["com.p-1.upper".to_string()]);
    assert_eq!(upper.addr(), "127.0.0.1");

    orch.stop(&upper).await.unwrap();
    assert!(orch.bus().registered().is_empty());
    assert!(!orch.list().await.unwrap()[0].active);
}

#[tokio::test]
async fn unregistered_service_fails_to_run() {
    let store = MemoryStore::default();
    project(&store, &["ghost"]);
    let orch = LocalOrchestrator::new(store);

    let err = orch.run(&mut stage("ghost")).await.unwrap_err();
    assert!(matches!(err, OrchError::RunFailed { .. }));
    assert!(err.to_string().contains("ghost"));
}

#[tokio::test]
async fn container_of_unknown_project_fails_to_run() {
    let orch = LocalOrchestrator::new(MemoryStore::default());
    let err = orch.run(&mut stage("upper")).await.unwrap_err();
    assert!(err.to_string().contains("project does not exist"));
}

#[tokio::test]
async fn images_come_from_the_registry() {
    let store = MemoryStore::default();
    register_service(&store, "upper.py", "tr a-z A-Z", InputMode::Stdin).unwrap();
    let orch = LocalOrchestrator::new(store);

    assert_eq!(orch.get_image(API_IMAGE).await.unwrap().name, API_IMAGE);
    assert_eq!(orch.get_image("upper").await.unwrap().name, "upper");
    assert!(matches!(
        orch.pull_image("rev").await,
        Err(OrchError::ImageNotFound(_))
    ));
}

#[tokio::test]
async fn controller_materializes_a_queryable_pipeline() {
    let store = MemoryStore::default();
    register_service(&store, "upper", "tr a-z A-Z", InputMode::Stdin).unwrap();
    register_service(&store, "shout", "echo", InputMode::Args).unwrap();
    let project = project(&store, &["shout", "upper"]);
    let orch = LocalOrchestrator::new(store);
    let ctr = Controller::new(orch.clone(), project);

    let launched = ctr.launch_all().await.unwrap();
    let outcome = ctr
        .project()
        .query_with("hello there", Duration::from_millis(10), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(outcome, QueryOutcome::Result("HELLO THERE".to_string()));

    ctr.teardown(&launched).await.unwrap();
    assert!(orch.bus().registered().is_empty());
}

/// Log sink shared with a tracing subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn stage_to_stage_calls_are_traced() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let reply = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(async {
                let store = MemoryStore::default();
                project(&store, &["upper", "rev"]);
                register_service(&store, "upper", "tr a-z A-Z", InputMode::Stdin).unwrap();
                register_service(&store, "rev", "rev", InputMode::Stdin).unwrap();
                let orch = LocalOrchestrator::new(store);
                orch.run(&mut stage("upper")).await.unwrap();
                orch.run(&mut stage("rev")).await.unwrap();

                let client = orch.bus().connect();
                client.join(ROUTER_REALM).await.unwrap();
                client
                    .call("com.p-1.upper", Invocation::new(vec!["abc".into()]))
                    .await
                    .unwrap()
            })
    });

    assert_eq!(reply.first(), Response::Value("CBA".into()));
    let logs = String::from_utf8_lossy(&logs.0.lock().unwrap()).to_string();
    assert!(logs.contains("bus.register"), "{logs}");
    assert!(logs.contains("bus.call"), "{logs}");
    assert!(logs.contains("com.p-1.rev"), "{logs}");
    assert!(logs.contains("elapsed_ms"), "{logs}");
}
