// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process bus
//!
//! A single router shared by every session of the process. Each call runs
//! the target procedure on its own task, so a caller never executes a
//! callee's handler inline. Dropping the caller's future aborts that task.

use super::{BusError, Procedure, RpcBus};
use async_trait::async_trait;
use pipes_core::{Invocation, Reply};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

struct Registration {
    session: u64,
    procedure: Arc<dyn Procedure>,
}

#[derive(Default)]
struct Router {
    procedures: RwLock<HashMap<String, Registration>>,
    sessions: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Idle,
    Joined(String),
    Ended,
}

/// Aborts the callee task when the caller stops waiting on it
struct AbortOnDrop(tokio::task::JoinHandle<Reply>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Session on the in-process router; clones share the session
#[derive(Clone)]
pub struct LocalBus {
    router: Arc<Router>,
    session: u64,
    state: Arc<Mutex<SessionState>>,
}

impl LocalBus {
    /// Create a new router and a first session on it
    pub fn new() -> Self {
        let router = Arc::new(Router::default());
        Self::session_on(router)
    }

    /// Open another session on the same router
    pub fn connect(&self) -> Self {
        Self::session_on(Arc::clone(&self.router))
    }

    fn session_on(router: Arc<Router>) -> Self {
        let session = router.sessions.fetch_add(1, Ordering::SeqCst) + 1;
        Self {
            router,
            session,
            state: Arc::new(Mutex::new(SessionState::Idle)),
        }
    }

    /// URIs currently registered on the router
    pub fn registered(&self) -> Vec<String> {
        let mut uris: Vec<String> = self
            .router
            .procedures
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        uris.sort();
        uris
    }

    fn check_joined(&self) -> Result<(), BusError> {
        match &*self.state.lock().unwrap_or_else(|e| e.into_inner()) {
            SessionState::Joined(_) => Ok(()),
            SessionState::Idle => Err(BusError::NotJoined),
            SessionState::Ended => Err(BusError::Ended),
        }
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RpcBus for LocalBus {
    async fn join(&self, realm: &str) -> Result<(), BusError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state == SessionState::Ended {
            return Err(BusError::Ended);
        }
        *state = SessionState::Joined(realm.to_string());
        Ok(())
    }

    async fn register(&self, uri: &str, procedure: Arc<dyn Procedure>) -> Result<(), BusError> {
        self.check_joined()?;
        let mut procedures = self
            .router
            .procedures
            .write()
            .unwrap_or_else(|e| e.into_inner());
        if procedures.contains_key(uri) {
            return Err(BusError::AlreadyRegistered(uri.to_string()));
        }
        procedures.insert(
            uri.to_string(),
            Registration {
                session: self.session,
                procedure,
            },
        );
        Ok(())
    }

    async fn unregister(&self, uri: &str) -> Result<(), BusError> {
        let mut procedures = self
            .router
            .procedures
            .write()
            .unwrap_or_else(|e| e.into_inner());
        match procedures.get(uri) {
            Some(reg) if reg.session == self.session => {
                procedures.remove(uri);
                Ok(())
            }
            _ => Err(BusError::NoSuchProcedure(uri.to_string())),
        }
    }

    async fn call(&self, uri: &str, invocation: Invocation) -> Result<Reply, BusError> {
        self.check_joined()?;
        let procedure = self
            .router
            .procedures
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(uri)
            .map(|reg| Arc::clone(&reg.procedure))
            .ok_or_else(|| BusError::NoSuchProcedure(uri.to_string()))?;

        let mut callee = AbortOnDrop(tokio::spawn(async move {
            procedure.invoke(invocation).await
        }));
        (&mut callee.0).await.map_err(|e| BusError::CallFailed {
                uri: uri.to_string(),
                reason: e.to_string(),
            })
    }

    async fn end(&self) -> Result<(), BusError> {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = SessionState::Ended;
        self.router
            .procedures
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|_, reg| reg.session != self.session);
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
