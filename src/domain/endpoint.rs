//! Upstream targets resolved for a proxy

use serde::{Deserialize, Serialize};

use super::dataplane::Tags;

/// One upstream instance; tags become load balancer subset metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub target: String,
    pub port: u32,
    #[serde(default)]
    pub tags: Tags,
}

impl Endpoint {
    pub fn new(target: impl Into<String>, port: u32) -> Self {
        Self { target: target.into(), port, tags: Tags::new() }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Named upstream cluster with its share of outbound traffic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub name: String,
    /// Relative weight, only meaningful when traffic is split across clusters
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub tags: Tags,
}

impl ClusterInfo {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self { name: name.into(), weight, tags: Tags::new() }
    }
}
