//! Domain layer
//!
//! Read-only inputs of a synthesis pass. The resource layer stores and validates
//! these objects; the synthesis core never mutates them.
//!
//! ## Module Organization
//!
//! - `mesh`: mesh-wide mTLS switch and logging backends
//! - `dataplane`: dataplanes, inbound interfaces, gateways and proxy metadata
//! - `policy`: health checks, traffic permissions and logging backends
//! - `endpoint`: upstream endpoints and weighted cluster targets

pub mod dataplane;
pub mod endpoint;
pub mod mesh;
pub mod policy;

pub use dataplane::{
    Dataplane, DataplaneMetadata, Gateway, Inbound, InboundInterface, Networking, Proxy, ProxyId,
    Tags, SERVICE_TAG,
};
pub use endpoint::{ClusterInfo, Endpoint};
pub use mesh::{LoggingSettings, Mesh, MtlsSettings};
pub use policy::{
    ActiveChecks, BackendKind, HealthCheck, LoggingBackend, PassiveChecks, Selector,
    TrafficPermission,
};
