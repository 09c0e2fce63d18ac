//! # Meshplane
//!
//! Configuration synthesis core of a service-mesh control plane. Given the state of
//! a mesh (dataplanes, health checks, traffic permissions, the mesh-wide mTLS switch)
//! it derives the Envoy listeners, clusters and load assignments pushed to each
//! dataplane proxy.
//!
//! ## Architecture
//!
//! ```text
//! Resource store → domain snapshot → identity → clusters / listeners / endpoints → xDS transport
//!                                       ↓
//!                               SDS secret references
//! ```
//!
//! ## Core Components
//!
//! - **Identity resolution** (`sds`): service identity of a dataplane
//! - **Endpoint assembly** (`xds::endpoint`): load assignments with subset metadata
//! - **TLS assembly** (`xds::tls`): mTLS contexts referencing SDS secrets
//! - **Cluster synthesis** (`xds::cluster`): local, EDS and pass-through clusters
//! - **Listener synthesis** (`xds::listener`): outbound, inbound, metrics and catch-all listeners
//!
//! Storage, the discovery transport and resynthesis scheduling live outside this crate.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use meshplane::domain::{DataplaneMetadata, Mesh};
//! use meshplane::xds::{create_inbound_listener, ControlPlaneContext, InboundListenerSpec, SynthesisContext};
//! use meshplane::{Result, Settings};
//!
//! fn main() -> Result<()> {
//!     let settings = Settings::load(None)?;
//!     let ctx = SynthesisContext::new(Mesh::new("default", true), ControlPlaneContext::load(&settings.sds)?);
//!
//!     let metadata = DataplaneMetadata::default();
//!     let listener = create_inbound_listener(
//!         &ctx,
//!         &InboundListenerSpec {
//!             name: "inbound:10.0.0.1:10001",
//!             address: "10.0.0.1",
//!             port: 10001,
//!             cluster_name: "localhost:8080",
//!             virtual_listener: false,
//!             permissions: &[],
//!             metadata: &metadata,
//!         },
//!     )?;
//!     println!("{}", listener.name);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod sds;
pub mod utils;
pub mod xds;

// Re-export commonly used types and traits
pub use config::{LoggingConfig, SdsServerConfig, Settings};
pub use errors::{Error, Result};
pub use observability::init_logging;
pub use sds::{resolve_identity, Identity};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "meshplane");
    }
}
