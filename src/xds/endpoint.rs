//! Endpoint assembly
//!
//! Turns resolved upstream instances into `ClusterLoadAssignment`s. Every endpoint
//! lands in a single locality group; tags travel as load balancer metadata.

use envoy_types::pb::envoy::config::endpoint::v3::{
    lb_endpoint::HostIdentifier, ClusterLoadAssignment, Endpoint as EnvoyEndpoint, LbEndpoint,
    LocalityLbEndpoints,
};

use crate::domain::Endpoint;
use crate::xds::address::{lb_metadata, socket_address};

/// Load assignment for a cluster with many endpoints
pub fn build_load_assignment(cluster_name: &str, endpoints: &[Endpoint]) -> ClusterLoadAssignment {
    let lb_endpoints = endpoints
        .iter()
        .map(|endpoint| LbEndpoint {
            metadata: lb_metadata(&endpoint.tags),
            ..lb_endpoint(&endpoint.target, endpoint.port)
        })
        .collect();

    assignment(cluster_name, lb_endpoints)
}

/// Load assignment with exactly one endpoint and no metadata
pub fn build_static_endpoint(cluster_name: &str, address: &str, port: u32) -> ClusterLoadAssignment {
    assignment(cluster_name, vec![lb_endpoint(address, port)])
}

fn lb_endpoint(address: &str, port: u32) -> LbEndpoint {
    LbEndpoint {
        host_identifier: Some(HostIdentifier::Endpoint(EnvoyEndpoint {
            address: Some(socket_address(address, port)),
            ..Default::default()
        })),
        ..Default::default()
    }
}

fn assignment(cluster_name: &str, lb_endpoints: Vec<LbEndpoint>) -> ClusterLoadAssignment {
    ClusterLoadAssignment {
        cluster_name: cluster_name.to_string(),
        endpoints: vec![LocalityLbEndpoints { lb_endpoints, ..Default::default() }],
        ..Default::default()
    }
}
