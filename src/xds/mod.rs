//! Envoy xDS resource synthesis
//!
//! Builds the listeners, clusters and load assignments a dataplane proxy needs:
//! - `endpoint`: load assignments with subset metadata
//! - `tls`: mTLS contexts backed by SDS secrets
//! - `cluster`: local, EDS and pass-through clusters plus health policy
//! - `listener`: outbound, inbound, metrics and catch-all listeners
//! - `resources`: typed encoding of the result for the discovery transport
//!
//! Every builder is a pure function of its inputs and a shared [`SynthesisContext`].

pub mod access_log;
pub mod address;
pub mod cluster;
pub mod constants;
pub mod context;
pub mod endpoint;
pub mod listener;
pub mod rbac;
pub mod resources;
pub mod tls;
pub mod typed;

pub use cluster::{
    attach_health_policy, build_cluster, create_eds_cluster, create_local_cluster,
    create_pass_through_cluster, ClusterKind,
};
pub use context::{ControlPlaneContext, MeshContext, SynthesisContext};
pub use endpoint::{build_load_assignment, build_static_endpoint};
pub use listener::{
    create_catch_all_listener, create_inbound_listener, create_outbound_listener,
    create_prometheus_listener, InboundListenerSpec, OutboundListenerSpec, PrometheusListenerSpec,
};
pub use resources::{BuiltResource, ResourceSet};
pub use tls::{
    create_common_tls_context, create_downstream_tls_context, create_upstream_tls_context,
};
