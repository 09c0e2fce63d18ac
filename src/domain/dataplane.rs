//! Dataplane domain types
//!
//! A dataplane is one proxy instance registered with the mesh, described by the
//! inbound interfaces it serves and, for edge proxies, a gateway descriptor.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Tag carrying the service name of an inbound or gateway
pub const SERVICE_TAG: &str = "service";

/// Tag map attached to inbounds, gateways and endpoints
pub type Tags = BTreeMap<String, String>;

/// Dataplane as stored by the resource layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataplane {
    /// Owning mesh
    pub mesh: String,

    /// Dataplane name, unique within the mesh
    pub name: String,

    #[serde(default)]
    pub networking: Networking,
}

impl Dataplane {
    /// First declared inbound, if any
    pub fn first_inbound(&self) -> Option<&Inbound> {
        self.networking.inbound.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Networking {
    /// Inbound interfaces in declaration order
    #[serde(default)]
    pub inbound: Vec<Inbound>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<Gateway>,
}

/// One inbound interface of a dataplane
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbound {
    /// `<dataplane-ip>:<dataplane-port>:<workload-port>`
    pub interface: String,

    #[serde(default)]
    pub tags: Tags,
}

impl Inbound {
    pub fn service(&self) -> Option<&str> {
        self.tags.get(SERVICE_TAG).map(String::as_str)
    }

    pub fn parsed_interface(&self) -> Result<InboundInterface> {
        InboundInterface::parse(&self.interface)
    }
}

/// Gateway descriptor of an edge dataplane
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    #[serde(default)]
    pub tags: Tags,
}

impl Gateway {
    pub fn service(&self) -> Option<&str> {
        self.tags.get(SERVICE_TAG).map(String::as_str)
    }
}

/// Parsed form of an inbound interface string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundInterface {
    pub data_plane_address: String,
    pub data_plane_port: u32,
    pub workload_port: u32,
}

impl InboundInterface {
    /// Parse `<dataplane-ip>:<dataplane-port>:<workload-port>`.
    ///
    /// The address may be an IPv6 literal; the two ports are taken from the right.
    pub fn parse(interface: &str) -> Result<Self> {
        let invalid = || {
            Error::validation(format!(
                "invalid inbound interface '{}': expected <dataplane-ip>:<dataplane-port>:<workload-port>",
                interface
            ))
        };

        let (rest, workload_port) = interface.rsplit_once(':').ok_or_else(invalid)?;
        let (address, data_plane_port) = rest.rsplit_once(':').ok_or_else(invalid)?;
        let address = address.strip_prefix('[').and_then(|a| a.strip_suffix(']')).unwrap_or(address);
        if address.is_empty() {
            return Err(invalid());
        }

        let port = |value: &str| value.parse::<u16>().ok().filter(|p| *p != 0).map(u32::from);

        Ok(Self {
            data_plane_address: address.to_string(),
            data_plane_port: port(data_plane_port).ok_or_else(invalid)?,
            workload_port: port(workload_port).ok_or_else(invalid)?,
        })
    }
}

impl fmt::Display for InboundInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data_plane_address.contains(':') {
            write!(f, "[{}]", self.data_plane_address)?;
        } else {
            write!(f, "{}", self.data_plane_address)?;
        }
        write!(f, ":{}:{}", self.data_plane_port, self.workload_port)
    }
}

/// Per-proxy bootstrap metadata reported when the proxy connects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataplaneMetadata {
    /// Local path of the dataplane token used to authenticate against SDS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataplane_token_path: Option<String>,
}

impl DataplaneMetadata {
    pub fn with_token_path(path: impl Into<String>) -> Self {
        Self { dataplane_token_path: Some(path.into()) }
    }

    /// Token path, treating an empty string as absent
    pub fn token_path(&self) -> Option<&str> {
        self.dataplane_token_path.as_deref().filter(|path| !path.is_empty())
    }
}

/// Identifier of a connected proxy
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProxyId {
    pub mesh: String,
    pub name: String,
}

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.mesh, self.name)
    }
}

/// A connected proxy: its dataplane and bootstrap metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    pub id: ProxyId,
    pub dataplane: Dataplane,
    pub metadata: DataplaneMetadata,
}

impl Proxy {
    pub fn new(dataplane: Dataplane, metadata: DataplaneMetadata) -> Self {
        let id = ProxyId { mesh: dataplane.mesh.clone(), name: dataplane.name.clone() };
        Self { id, dataplane, metadata }
    }

    /// Address other proxies see this proxy connecting from.
    ///
    /// Taken from the first inbound interface; gateways without inbounds have none.
    pub fn source_address(&self) -> Option<String> {
        self.dataplane
            .first_inbound()
            .and_then(|inbound| inbound.parsed_interface().ok())
            .map(|interface| interface.data_plane_address)
    }
}
