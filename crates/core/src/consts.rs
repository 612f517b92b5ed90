// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed runtime constants

use std::time::Duration;

/// Name of the implicit front-door stage that starts every pipeline
pub const API_SERVICE: &str = "api";

/// Image used for the front-door stage
pub const API_IMAGE: &str = "pipes/api";

/// Port the front door listens on inside its container
pub const API_PORT: &str = "8080";

/// Realm every wrapper joins on the RPC bus
pub const ROUTER_REALM: &str = "realm1";

/// Interval between two status polls while waiting for a query result
pub const QUERY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Overall deadline for a query
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Input mode used when a service was registered without one
pub const DEFAULT_INPUT_MODE: &str = "stdin";
