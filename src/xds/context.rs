//! Per-pass synthesis context.
//!
//! Built once per synthesis pass and shared read-only by every builder, possibly
//! from many threads at once.

use tracing::info;

use crate::config::SdsServerConfig;
use crate::domain::Mesh;
use crate::errors::Result;

/// Everything a builder needs besides its direct arguments
#[derive(Debug, Clone)]
pub struct SynthesisContext {
    pub mesh: MeshContext,
    pub control_plane: ControlPlaneContext,
}

impl SynthesisContext {
    pub fn new(mesh: Mesh, control_plane: ControlPlaneContext) -> Self {
        Self { mesh: MeshContext { resource: mesh }, control_plane }
    }

    /// Whether mutual TLS is enabled for the mesh being synthesized
    pub fn mtls_enabled(&self) -> bool {
        self.mesh.resource.mtls_enabled()
    }
}

/// The mesh the proxy belongs to
#[derive(Debug, Clone)]
pub struct MeshContext {
    pub resource: Mesh,
}

/// How proxies reach the control plane's SDS server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlPlaneContext {
    /// `host:port` of the SDS server
    pub sds_location: String,
    /// PEM root certificate of the SDS server, embedded inline
    pub sds_tls_cert: Vec<u8>,
}

impl ControlPlaneContext {
    pub fn new(sds_location: impl Into<String>, sds_tls_cert: impl Into<Vec<u8>>) -> Self {
        Self { sds_location: sds_location.into(), sds_tls_cert: sds_tls_cert.into() }
    }

    /// Read the SDS certificate from disk once; synthesis itself never does I/O
    pub fn load(config: &SdsServerConfig) -> Result<Self> {
        let sds_tls_cert = config.read_tls_cert()?;
        info!(
            sds_location = %config.location,
            cert_file = %config.tls_cert_file.display(),
            cert_bytes = sds_tls_cert.len(),
            "Loaded control plane SDS context"
        );
        Ok(Self { sds_location: config.location.clone(), sds_tls_cert })
    }
}
