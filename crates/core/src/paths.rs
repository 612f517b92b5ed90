// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store path layout
//!
//! ```text
//! main_project                                  = <id>
//! names/<name>                                  = <id>
//! services/<service>/command                    = <command line>
//! services/<service>/input_mode                 = stdin | args
//! projects/<id>/name                            = <name>
//! projects/<id>/running                         = true | false
//! projects/<id>/topology                        = ["api", ...] (JSON)
//! projects/<id>/services/<stage>/next/<succ>    (directory)
//! projects/<id>/services/<stage>/addr           = <ip:port>
//! projects/<id>/services/<stage>/containers/<c> = <ip>
//! ```

/// Directory holding the `name -> ID` aliases
pub const NAMES_DIR: &str = "names";

/// Root key recording the most recently created project
pub const MAIN_PROJECT_KEY: &str = "main_project";

pub fn project_dir(project_id: &str) -> String {
    format!("projects/{}", project_id)
}

pub fn stages_dir(project_id: &str) -> String {
    format!("projects/{}/services", project_id)
}

pub fn stage_dir(project_id: &str, stage: &str) -> String {
    format!("projects/{}/services/{}", project_id, stage)
}

pub fn next_dir(project_id: &str, stage: &str) -> String {
    format!("projects/{}/services/{}/next", project_id, stage)
}

pub fn containers_dir(project_id: &str, stage: &str) -> String {
    format!("projects/{}/services/{}/containers", project_id, stage)
}

/// Cluster-level registry entry of a service
pub fn service_dir(service: &str) -> String {
    format!("services/{}", service)
}

/// RPC address of a stage
pub fn stage_uri(project_id: &str, stage: &str) -> String {
    format!("com.{}.{}", project_id, stage)
}
