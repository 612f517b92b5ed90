// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container and image descriptors consumed by orchestrators

use serde::{Deserialize, Serialize};

/// An image reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub name: String,
}

impl Image {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
        }
    }
}

/// A container port published on the host (empty host port = assigned at run)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    pub container: String,
    pub host: String,
}

/// Descriptor of a container
///
/// Orchestrators fill in `id`, `ip` and host ports when running it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub hostname: String,
    pub image: Image,
    pub ip: String,
    pub ports: Vec<PortMapping>,
    pub cmd: Vec<String>,
    pub env: Vec<String>,
    pub active: bool,
}

impl Container {
    /// Network address: `ip:hostPort` of the first mapping, or the bare IP
    pub fn addr(&self) -> String {
        match self.ports.first() {
            Some(port) => format!("{}:{}", self.ip, port.host),
            None => self.ip.clone(),
        }
    }

    /// Base name of a service image: the portion before the first `.`
    pub fn image_for_service(service: &str) -> Image {
        let base = service.split('.').next().unwrap_or(service);
        Image::named(base)
    }
}
