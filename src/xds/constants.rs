//! Well-known names shared by the cluster, listener and TLS builders.
//!
//! Proxies and the SDS server match on these strings, so they are part of the
//! contract with the data plane.

use std::time::Duration;

/// Connect timeout applied to every synthesized cluster
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// SDS resource holding the mesh CA bundle
pub const MESH_CA_RESOURCE: &str = "mesh_ca";
/// SDS resource holding the workload identity certificate
pub const IDENTITY_CERT_RESOURCE: &str = "identity_cert";

/// gRPC call credentials plugin that reads the dataplane token from a file
pub const FILE_BASED_METADATA_CREDENTIALS: &str = "envoy.grpc_credentials.file_based_metadata";

/// Admin API endpoint metrics requests are rewritten to
pub const PROMETHEUS_STATS_PATH: &str = "/stats/prometheus";

/// Metadata namespace consulted by Envoy's subset load balancer
pub const LB_METADATA_NAMESPACE: &str = "envoy.lb";

// Filter and extension names
pub const TCP_PROXY_FILTER: &str = "envoy.filters.network.tcp_proxy";
pub const HTTP_CONNECTION_MANAGER_FILTER: &str = "envoy.filters.network.http_connection_manager";
pub const NETWORK_RBAC_FILTER: &str = "envoy.filters.network.rbac";
pub const ROUTER_FILTER: &str = "envoy.filters.http.router";
pub const TLS_TRANSPORT_SOCKET: &str = "envoy.transport_sockets.tls";
pub const FILE_ACCESS_LOG: &str = "envoy.access_loggers.file";
pub const TCP_GRPC_ACCESS_LOG: &str = "envoy.access_loggers.tcp_grpc";

/// Cluster through which TCP access logs reach the control plane's collector
pub const ACCESS_LOG_SINK_CLUSTER: &str = "access_log_sink";

/// Virtual host of the metrics listener
pub const ADMIN_VIRTUAL_HOST: &str = "envoy_admin";

// Resource type URLs
pub const CLUSTER_TYPE_URL: &str = "type.googleapis.com/envoy.config.cluster.v3.Cluster";
pub const LISTENER_TYPE_URL: &str = "type.googleapis.com/envoy.config.listener.v3.Listener";
pub const ENDPOINT_TYPE_URL: &str =
    "type.googleapis.com/envoy.config.endpoint.v3.ClusterLoadAssignment";

// Typed config URLs
pub const TCP_PROXY_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.network.tcp_proxy.v3.TcpProxy";
pub const HTTP_CONNECTION_MANAGER_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager";
pub const NETWORK_RBAC_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.network.rbac.v3.RBAC";
pub const ROUTER_TYPE_URL: &str = "type.googleapis.com/envoy.extensions.filters.http.router.v3.Router";
pub const DOWNSTREAM_TLS_CONTEXT_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.transport_sockets.tls.v3.DownstreamTlsContext";
pub const UPSTREAM_TLS_CONTEXT_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.transport_sockets.tls.v3.UpstreamTlsContext";
pub const FILE_BASED_METADATA_CONFIG_TYPE_URL: &str =
    "type.googleapis.com/envoy.config.grpc_credential.v3.FileBasedMetadataConfig";
pub const FILE_ACCESS_LOG_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.access_loggers.file.v3.FileAccessLog";
pub const TCP_GRPC_ACCESS_LOG_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.access_loggers.grpc.v3.TcpGrpcAccessLogConfig";
