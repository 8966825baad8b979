//! Host environment snapshot
//!
//! A read-only view of the process context at capture time. The host builds
//! one of these at startup (or at request dispatch) and hands it to the
//! capture pipeline; the pipeline never probes the host directly.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the current process was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Interactive or scripted command line
    Cli,
    /// Web request
    Web,
    /// Scheduled task
    Cron,
}

impl RuntimeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeMode::Cli => "cli",
            RuntimeMode::Web => "web",
            RuntimeMode::Cron => "cron",
        }
    }
}

/// Snapshot of the host environment at capture time
///
/// Every optional field has an explicit absence value; the renderer decides
/// on placeholders, not the host.
#[derive(Debug, Clone)]
pub struct EnvSnapshot {
    /// Current UTC time
    pub now: DateTime<Utc>,

    /// Execution mode of this process
    pub mode: RuntimeMode,

    /// Human-readable site/process identity
    pub site_name: String,

    /// Home/base URL of the site, if known
    pub home_url: Option<String>,

    /// Full request URL, if a request is in flight
    pub request_url: Option<String>,

    /// Request URI (path + query), if applicable
    pub request_uri: Option<String>,

    /// HTTP method, if applicable
    pub request_method: Option<String>,

    /// Remote client IP, if applicable
    pub remote_ip: Option<String>,

    /// Client user agent, if applicable
    pub user_agent: Option<String>,

    /// Authenticated user id; None = unknown/anonymous
    pub user_id: Option<u64>,

    /// True when the current context is an admin/back-office one
    pub is_admin_context: bool,

    /// Host-provided fallback recipient when none is configured
    pub fallback_admin_email: Option<String>,

    /// URL of the internal log viewer, if the host exposes one
    pub log_viewer_url: Option<String>,

    /// URL of the host's debug/health page, if it exposes one
    pub health_url: Option<String>,

    /// Path to the host's debug log, when debug logging is enabled
    pub debug_log_path: Option<PathBuf>,
}

impl EnvSnapshot {
    /// Minimal snapshot for a non-request context
    pub fn new(mode: RuntimeMode, site_name: &str) -> Self {
        Self {
            now: Utc::now(),
            mode,
            site_name: site_name.to_string(),
            home_url: None,
            request_url: None,
            request_uri: None,
            request_method: None,
            remote_ip: None,
            user_agent: None,
            user_id: None,
            is_admin_context: false,
            fallback_admin_email: None,
            log_viewer_url: None,
            health_url: None,
            debug_log_path: None,
        }
    }
}
