//! Identity resolution for dataplanes.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Dataplane;
use crate::errors::{Error, Result};

pub const SPIFFE_SCHEME: &str = "spiffe://";

/// Service identity a dataplane's workload certificate is issued for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub mesh: String,
    pub service: String,
}

impl Identity {
    pub fn new(mesh: impl Into<String>, service: impl Into<String>) -> Self {
        Self { mesh: mesh.into(), service: service.into() }
    }

    /// SPIFFE id carried in the workload certificate's URI SAN
    pub fn spiffe_id(&self) -> String {
        format!("{}{}/{}", SPIFFE_SCHEME, self.mesh, self.service)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mesh, self.service)
    }
}

/// Resolve the identity of a dataplane.
///
/// The `service` tag of the first declared inbound wins, even when later inbounds
/// carry different services. Dataplanes without inbounds fall back to the gateway's
/// `service` tag. A missing tag on the chosen interface resolves to an empty service.
pub fn resolve_identity(dataplane: &Dataplane) -> Result<Identity> {
    let networking = &dataplane.networking;

    let service = if let Some(inbound) = networking.inbound.first() {
        inbound.service().unwrap_or_default()
    } else if let Some(gateway) = &networking.gateway {
        gateway.service().unwrap_or_default()
    } else {
        return Err(Error::NoServiceAssociated {
            mesh: dataplane.mesh.clone(),
            name: dataplane.name.clone(),
        });
    };

    let identity = Identity::new(dataplane.mesh.clone(), service);
    debug!(dataplane = %dataplane.name, identity = %identity, "Resolved dataplane identity");
    Ok(identity)
}
