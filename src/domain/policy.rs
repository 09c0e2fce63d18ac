//! Policy domain types
//!
//! Health checks, traffic permissions and logging backends as handed over by the
//! resource layer. They arrive already validated; builders only read them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::dataplane::{Tags, SERVICE_TAG};

/// Health check policy applied to the clusters of one service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,

    pub mesh: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_checks: Option<ActiveChecks>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passive_checks: Option<PassiveChecks>,
}

impl HealthCheck {
    pub fn has_active_checks(&self) -> bool {
        self.active_checks.is_some()
    }

    pub fn has_passive_checks(&self) -> bool {
        self.passive_checks.is_some()
    }
}

/// Periodic TCP probing of upstream endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveChecks {
    #[serde(with = "crate::utils::duration_secs")]
    pub interval: Duration,

    #[serde(with = "crate::utils::duration_secs")]
    pub timeout: Duration,

    pub unhealthy_threshold: u32,

    pub healthy_threshold: u32,
}

/// Ejection of endpoints based on observed failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveChecks {
    #[serde(with = "crate::utils::duration_secs")]
    pub penalty_interval: Duration,

    pub unhealthy_threshold: u32,
}

/// Tag selector used by traffic permissions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    #[serde(rename = "match", default)]
    pub match_tags: Tags,
}

impl Selector {
    /// Selector matching a single service; `*` matches every service in the mesh
    pub fn service(service: impl Into<String>) -> Self {
        let mut match_tags = Tags::new();
        match_tags.insert(SERVICE_TAG.to_string(), service.into());
        Self { match_tags }
    }

    pub fn service_tag(&self) -> Option<&str> {
        self.match_tags.get(SERVICE_TAG).map(String::as_str)
    }
}

/// Permission for the selected sources to connect to the selected destinations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficPermission {
    pub name: String,

    pub mesh: String,

    #[serde(default)]
    pub sources: Vec<Selector>,

    #[serde(default)]
    pub destinations: Vec<Selector>,
}

/// Destination of access logs written by outbound listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingBackend {
    pub name: String,

    /// Envoy access log format; the mesh default is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(flatten)]
    pub kind: BackendKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendKind {
    /// Append to a file local to the proxy
    File { path: String },
    /// Stream to a TCP collector at `host:port`
    Tcp { address: String },
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::File { .. } => "file",
            BackendKind::Tcp { .. } => "tcp",
        }
    }
}
