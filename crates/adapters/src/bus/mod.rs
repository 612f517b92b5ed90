// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish/subscribe RPC bus adapters

mod local;

pub use local::LocalBus;

use async_trait::async_trait;
use pipes_core::{Invocation, Reply};
use std::sync::Arc;
use thiserror::Error;

/// Errors from bus operations
#[derive(Debug, Error)]
pub enum BusError {
    #[error("session has not joined a realm")]
    NotJoined,
    #[error("session already ended")]
    Ended,
    #[error("procedure already registered: {0}")]
    AlreadyRegistered(String),
    #[error("no such procedure: {0}")]
    NoSuchProcedure(String),
    #[error("call to {uri} failed: {reason}")]
    CallFailed { uri: String, reason: String },
}

/// A handler bound to a URI on the bus
#[async_trait]
pub trait Procedure: Send + Sync + 'static {
    async fn invoke(&self, invocation: Invocation) -> Reply;
}

/// Client session on a publish/subscribe RPC bus
#[async_trait]
pub trait RpcBus: Clone + Send + Sync + 'static {
    /// Join a realm; required before registering or calling
    async fn join(&self, realm: &str) -> Result<(), BusError>;

    /// Bind a procedure to `uri`
    async fn register(&self, uri: &str, procedure: Arc<dyn Procedure>) -> Result<(), BusError>;

    /// Remove a procedure previously registered by this session
    async fn unregister(&self, uri: &str) -> Result<(), BusError>;

    /// Invoke the procedure bound to `uri` and wait for its reply
    async fn call(&self, uri: &str, invocation: Invocation) -> Result<Reply, BusError>;

    /// Leave the realm, dropping every registration of this session
    async fn end(&self) -> Result<(), BusError>;
}
