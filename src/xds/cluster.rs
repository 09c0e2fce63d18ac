//! Cluster synthesis
//!
//! Three kinds of upstream clusters: a static cluster for the local workload, an
//! EDS cluster for mesh services (membership pushed over ADS) and an original
//! destination cluster for pass-through traffic.

use envoy_types::pb::envoy::config::cluster::v3::{
    cluster::{ClusterDiscoveryType, DiscoveryType, EdsClusterConfig, LbPolicy},
    Cluster, OutlierDetection,
};
use envoy_types::pb::envoy::config::core::v3::{
    config_source::ConfigSourceSpecifier,
    health_check::{HealthChecker, TcpHealthCheck},
    AggregatedConfigSource, ApiVersion, ConfigSource, HealthCheck as EnvoyHealthCheck,
};
use envoy_types::pb::google::protobuf::UInt32Value;
use tracing::debug;

use crate::domain::{DataplaneMetadata, HealthCheck};
use crate::errors::Result;
use crate::utils::proto_duration;
use crate::xds::constants::DEFAULT_CONNECT_TIMEOUT;
use crate::xds::context::SynthesisContext;
use crate::xds::endpoint::build_static_endpoint;
use crate::xds::tls::upstream_transport_socket;

/// Kind of upstream a cluster points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterKind {
    /// The workload next to the proxy
    Local { address: String, port: u32 },
    /// A mesh service resolved through EDS
    MeshRouted,
    /// Whatever the connection was originally destined to
    PassThrough,
}

/// Build a cluster of the given kind
pub fn build_cluster(
    ctx: &SynthesisContext,
    name: &str,
    kind: &ClusterKind,
    metadata: &DataplaneMetadata,
) -> Result<Cluster> {
    match kind {
        ClusterKind::Local { address, port } => Ok(create_local_cluster(name, address, *port)),
        ClusterKind::MeshRouted => create_eds_cluster(ctx, name, metadata),
        ClusterKind::PassThrough => Ok(create_pass_through_cluster(name)),
    }
}

pub fn create_local_cluster(name: &str, address: &str, port: u32) -> Cluster {
    Cluster {
        cluster_discovery_type: Some(ClusterDiscoveryType::Type(DiscoveryType::Static as i32)),
        load_assignment: Some(build_static_endpoint(name, address, port)),
        ..base_cluster(name)
    }
}

/// EDS cluster over ADS, with an upstream TLS context when mesh mTLS is on
pub fn create_eds_cluster(
    ctx: &SynthesisContext,
    name: &str,
    metadata: &DataplaneMetadata,
) -> Result<Cluster> {
    Ok(Cluster {
        cluster_discovery_type: Some(ClusterDiscoveryType::Type(DiscoveryType::Eds as i32)),
        eds_cluster_config: Some(EdsClusterConfig {
            eds_config: Some(ConfigSource {
                resource_api_version: ApiVersion::V3 as i32,
                config_source_specifier: Some(ConfigSourceSpecifier::Ads(
                    AggregatedConfigSource::default(),
                )),
                ..Default::default()
            }),
            ..Default::default()
        }),
        transport_socket: upstream_transport_socket(ctx, metadata)?,
        ..base_cluster(name)
    })
}

pub fn create_pass_through_cluster(name: &str) -> Cluster {
    Cluster {
        cluster_discovery_type: Some(ClusterDiscoveryType::Type(DiscoveryType::OriginalDst as i32)),
        lb_policy: LbPolicy::ClusterProvided as i32,
        ..base_cluster(name)
    }
}

/// Attach active and passive health checking from a health check policy.
///
/// Active checks append a TCP health check; passive checks set outlier detection
/// with the penalty interval as detection window and the threshold on consecutive
/// 5xx-equivalent failures. Either, both or neither may be present.
pub fn attach_health_policy(mut cluster: Cluster, health_check: Option<&HealthCheck>) -> Cluster {
    let Some(health_check) = health_check else {
        return cluster;
    };

    if let Some(active) = &health_check.active_checks {
        cluster.health_checks.push(EnvoyHealthCheck {
            health_checker: Some(HealthChecker::TcpHealthCheck(TcpHealthCheck::default())),
            interval: Some(proto_duration(active.interval)),
            timeout: Some(proto_duration(active.timeout)),
            unhealthy_threshold: Some(UInt32Value { value: active.unhealthy_threshold }),
            healthy_threshold: Some(UInt32Value { value: active.healthy_threshold }),
            ..Default::default()
        });
    }

    if let Some(passive) = &health_check.passive_checks {
        cluster.outlier_detection = Some(OutlierDetection {
            interval: Some(proto_duration(passive.penalty_interval)),
            consecutive_5xx: Some(UInt32Value { value: passive.unhealthy_threshold }),
            ..Default::default()
        });
    }

    debug!(
        cluster = %cluster.name,
        health_check = %health_check.name,
        active = health_check.has_active_checks(),
        passive = health_check.has_passive_checks(),
        "Attached health policy to cluster"
    );
    cluster
}

fn base_cluster(name: &str) -> Cluster {
    Cluster {
        name: name.to_string(),
        connect_timeout: Some(proto_duration(DEFAULT_CONNECT_TIMEOUT)),
        ..Default::default()
    }
}
