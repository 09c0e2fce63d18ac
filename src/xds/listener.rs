//! Listener synthesis
//!
//! Four listener shapes, each a single filter chain:
//! - outbound: TCP proxy to one cluster or a weighted set of clusters, optionally logging
//! - inbound: TCP proxy to the local workload, guarded by RBAC and mTLS when the mesh asks for it
//! - prometheus: HTTP connection manager rewriting scrapes to the admin stats endpoint
//! - catch-all: TCP proxy to a pass-through cluster for redirected connections
//!
//! Listeners are assembled from small layers (address, filter, filter chain) so that
//! the filter order of a chain is decided in one place.

use envoy_types::pb::envoy::config::core::v3::TransportSocket;
use envoy_types::pb::envoy::config::listener::v3::{filter::ConfigType, Filter, FilterChain, Listener};
use envoy_types::pb::envoy::config::route::v3::{
    route::Action, route_action::ClusterSpecifier as RouteClusterSpecifier,
    route_match::PathSpecifier, Route, RouteAction, RouteConfiguration, RouteMatch, VirtualHost,
};
use envoy_types::pb::envoy::extensions::filters::http::router::v3::Router;
use envoy_types::pb::envoy::extensions::filters::network::http_connection_manager::v3::{
    http_connection_manager::{CodecType, RouteSpecifier},
    http_filter, HttpConnectionManager, HttpFilter,
};
use envoy_types::pb::envoy::extensions::filters::network::tcp_proxy::v3::{
    tcp_proxy::{weighted_cluster::ClusterWeight, ClusterSpecifier, WeightedCluster},
    TcpProxy,
};
use envoy_types::pb::google::protobuf::BoolValue;
use prost::Message;
use tracing::debug;

use crate::domain::{ClusterInfo, DataplaneMetadata, LoggingBackend, Proxy, TrafficPermission};
use crate::errors::{Error, Result};
use crate::synthesis_span;
use crate::xds::access_log::convert_logging_backend;
use crate::xds::address::socket_address;
use crate::xds::constants::{
    ADMIN_VIRTUAL_HOST, HTTP_CONNECTION_MANAGER_FILTER, HTTP_CONNECTION_MANAGER_TYPE_URL,
    PROMETHEUS_STATS_PATH, ROUTER_FILTER, ROUTER_TYPE_URL, TCP_PROXY_FILTER, TCP_PROXY_TYPE_URL,
};
use crate::xds::context::SynthesisContext;
use crate::xds::rbac::build_rbac_filter;
use crate::xds::tls::downstream_transport_socket;
use crate::xds::typed::to_any;

/// Outbound listener towards one or more upstream clusters
#[derive(Debug, Clone)]
pub struct OutboundListenerSpec<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub port: u32,
    pub stat_prefix: &'a str,
    pub clusters: &'a [ClusterInfo],
    /// Reachable only through traffic redirection, never bound directly
    pub virtual_listener: bool,
    pub source_service: &'a str,
    pub destination_service: &'a str,
    pub logging_backend: Option<&'a LoggingBackend>,
    pub proxy: &'a Proxy,
}

/// Inbound listener in front of the local workload
#[derive(Debug, Clone)]
pub struct InboundListenerSpec<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub port: u32,
    pub cluster_name: &'a str,
    pub virtual_listener: bool,
    pub permissions: &'a [TrafficPermission],
    pub metadata: &'a DataplaneMetadata,
}

/// Metrics listener forwarding scrapes to the admin cluster
#[derive(Debug, Clone)]
pub struct PrometheusListenerSpec<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub port: u32,
    /// Path prefix scrapers request
    pub path: &'a str,
    pub cluster_name: &'a str,
    pub virtual_listener: bool,
}

/// Create an outbound listener.
///
/// A single cluster is addressed directly; two or more always use a weighted
/// specifier, in input order, even when the weights are equal. An access log is
/// attached when a logging backend is given and fails the whole listener if the
/// backend cannot be converted.
///
/// An empty `clusters` slice is rejected with [`Error::Validation`]; neither
/// specifier form can express it.
pub fn create_outbound_listener(spec: &OutboundListenerSpec<'_>) -> Result<Listener> {
    let _span = synthesis_span!("outbound_listener", spec.proxy.id, listener = %spec.name).entered();

    let access_log = spec
        .logging_backend
        .map(|backend| {
            convert_logging_backend(
                spec.source_service,
                spec.destination_service,
                backend,
                spec.proxy,
            )
        })
        .transpose()?;

    let tcp_proxy = TcpProxy {
        stat_prefix: spec.stat_prefix.to_string(),
        cluster_specifier: Some(cluster_specifier(spec.name, spec.clusters)?),
        access_log: access_log.into_iter().collect(),
        ..Default::default()
    };

    let chain = filter_chain(vec![tcp_proxy_filter(&tcp_proxy)?], None);
    let listener =
        with_bind_to_port(listener(spec.name, spec.address, spec.port, chain), spec.virtual_listener);
    log_built(&listener, "outbound");
    Ok(listener)
}

/// Create an inbound listener.
///
/// With mesh mTLS enabled the chain carries a downstream TLS context and starts with
/// the RBAC filter, so admission is decided before the TCP proxy forwards anything.
pub fn create_inbound_listener(
    ctx: &SynthesisContext,
    spec: &InboundListenerSpec<'_>,
) -> Result<Listener> {
    let mut filters = Vec::with_capacity(2);
    if ctx.mtls_enabled() {
        filters.push(build_rbac_filter(spec.name, spec.permissions)?);
    }
    filters.push(tcp_proxy_filter(&single_cluster_proxy(spec.cluster_name))?);

    let chain = filter_chain(filters, downstream_transport_socket(ctx, spec.metadata)?);
    let listener =
        with_bind_to_port(listener(spec.name, spec.address, spec.port, chain), spec.virtual_listener);
    log_built(&listener, "inbound");
    Ok(listener)
}

/// Create the metrics listener. Never carries TLS or RBAC.
pub fn create_prometheus_listener(spec: &PrometheusListenerSpec<'_>) -> Result<Listener> {
    #[allow(deprecated)]
    let route_action = RouteAction {
        cluster_specifier: Some(RouteClusterSpecifier::Cluster(spec.cluster_name.to_string())),
        prefix_rewrite: PROMETHEUS_STATS_PATH.to_string(),
        ..Default::default()
    };

    let route_config = RouteConfiguration {
        virtual_hosts: vec![VirtualHost {
            name: ADMIN_VIRTUAL_HOST.to_string(),
            domains: vec!["*".to_string()],
            routes: vec![Route {
                r#match: Some(RouteMatch {
                    path_specifier: Some(PathSpecifier::Prefix(spec.path.to_string())),
                    ..Default::default()
                }),
                action: Some(Action::Route(route_action)),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    };

    let hcm = HttpConnectionManager {
        stat_prefix: spec.name.to_string(),
        codec_type: CodecType::Auto as i32,
        http_filters: vec![HttpFilter {
            name: ROUTER_FILTER.to_string(),
            config_type: Some(http_filter::ConfigType::TypedConfig(to_any(
                ROUTER_TYPE_URL,
                &Router::default(),
            )?)),
            ..Default::default()
        }],
        route_specifier: Some(RouteSpecifier::RouteConfig(route_config)),
        ..Default::default()
    };

    let filter = typed_filter(HTTP_CONNECTION_MANAGER_FILTER, HTTP_CONNECTION_MANAGER_TYPE_URL, &hcm)?;
    let listener = with_bind_to_port(
        listener(spec.name, spec.address, spec.port, filter_chain(vec![filter], None)),
        spec.virtual_listener,
    );
    log_built(&listener, "prometheus");
    Ok(listener)
}

/// Create the catch-all listener that hands redirected connections to their
/// original destination through `cluster_name`
pub fn create_catch_all_listener(
    name: &str,
    address: &str,
    port: u32,
    cluster_name: &str,
) -> Result<Listener> {
    let chain = filter_chain(vec![tcp_proxy_filter(&single_cluster_proxy(cluster_name))?], None);
    let listener = Listener {
        use_original_dst: Some(BoolValue { value: true }),
        ..listener(name, address, port, chain)
    };
    log_built(&listener, "catch_all");
    Ok(listener)
}

fn cluster_specifier(listener_name: &str, clusters: &[ClusterInfo]) -> Result<ClusterSpecifier> {
    match clusters {
        [] => Err(Error::validation(format!(
            "outbound listener '{}' requires at least one cluster",
            listener_name
        ))),
        [single] => Ok(ClusterSpecifier::Cluster(single.name.clone())),
        many => Ok(ClusterSpecifier::WeightedClusters(WeightedCluster {
            clusters: many
                .iter()
                .map(|cluster| ClusterWeight {
                    name: cluster.name.clone(),
                    weight: cluster.weight,
                    ..Default::default()
                })
                .collect(),
        })),
    }
}

fn single_cluster_proxy(cluster_name: &str) -> TcpProxy {
    TcpProxy {
        stat_prefix: cluster_name.to_string(),
        cluster_specifier: Some(ClusterSpecifier::Cluster(cluster_name.to_string())),
        ..Default::default()
    }
}

fn tcp_proxy_filter(tcp_proxy: &TcpProxy) -> Result<Filter> {
    typed_filter(TCP_PROXY_FILTER, TCP_PROXY_TYPE_URL, tcp_proxy)
}

fn typed_filter<M: Message>(name: &str, type_url: &str, config: &M) -> Result<Filter> {
    Ok(Filter {
        name: name.to_string(),
        config_type: Some(ConfigType::TypedConfig(to_any(type_url, config)?)),
    })
}

fn filter_chain(filters: Vec<Filter>, transport_socket: Option<TransportSocket>) -> FilterChain {
    FilterChain { filters, transport_socket, ..Default::default() }
}

fn listener(name: &str, address: &str, port: u32, chain: FilterChain) -> Listener {
    Listener {
        name: name.to_string(),
        address: Some(socket_address(address, port)),
        filter_chains: vec![chain],
        ..Default::default()
    }
}

fn with_bind_to_port(listener: Listener, virtual_listener: bool) -> Listener {
    if !virtual_listener {
        return listener;
    }
    Listener { bind_to_port: Some(BoolValue { value: false }), ..listener }
}

fn log_built(listener: &Listener, kind: &str) {
    debug!(
        resource = %listener.name,
        kind,
        filters = listener.filter_chains.first().map_or(0, |chain| chain.filters.len()),
        encoded_size = listener.encoded_len(),
        "Built listener resource"
    );
}
