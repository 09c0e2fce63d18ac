use envoy_types::pb::envoy::config::cluster::v3::Cluster;
use envoy_types::pb::envoy::config::endpoint::v3::ClusterLoadAssignment;
use envoy_types::pb::envoy::config::listener::v3::Listener;
use envoy_types::pb::google::protobuf::Any;
use tracing::debug;

use crate::errors::Result;
use crate::xds::constants::{CLUSTER_TYPE_URL, ENDPOINT_TYPE_URL, LISTENER_TYPE_URL};
use crate::xds::typed::to_any;

/// Wrapper for a built Envoy resource along with its name.
#[derive(Clone, Debug)]
pub struct BuiltResource {
    pub name: String,
    pub resource: Any,
}

impl BuiltResource {
    pub fn into_any(self) -> Any {
        self.resource
    }

    pub fn type_url(&self) -> &str {
        &self.resource.type_url
    }
}

/// Aggregate output of one synthesis pass for one proxy
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceSet {
    pub clusters: Vec<Cluster>,
    pub listeners: Vec<Listener>,
    pub endpoints: Vec<ClusterLoadAssignment>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cluster(&mut self, cluster: Cluster) -> &mut Self {
        self.clusters.push(cluster);
        self
    }

    pub fn add_listener(&mut self, listener: Listener) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    pub fn add_endpoints(&mut self, assignment: ClusterLoadAssignment) -> &mut Self {
        self.endpoints.push(assignment);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.listeners.is_empty() && self.endpoints.is_empty()
    }

    /// Encode every resource as a typed `Any` for the transport.
    ///
    /// Clusters come first, then endpoints, then listeners. Any encoding failure
    /// aborts the whole set; nothing is delivered partially.
    pub fn into_built_resources(self) -> Result<Vec<BuiltResource>> {
        let mut built =
            Vec::with_capacity(self.clusters.len() + self.endpoints.len() + self.listeners.len());

        for cluster in &self.clusters {
            built.push(encode(&cluster.name, "cluster", CLUSTER_TYPE_URL, cluster)?);
        }
        for assignment in &self.endpoints {
            built.push(encode(&assignment.cluster_name, "endpoint", ENDPOINT_TYPE_URL, assignment)?);
        }
        for listener in &self.listeners {
            built.push(encode(&listener.name, "listener", LISTENER_TYPE_URL, listener)?);
        }

        Ok(built)
    }
}

fn encode<M: prost::Message>(
    name: &str,
    kind: &str,
    type_url: &str,
    message: &M,
) -> Result<BuiltResource> {
    let resource = to_any(type_url, message)?;
    debug!(
        phase = "encode",
        resource = %name,
        kind,
        encoded_size = resource.value.len(),
        "Built {} resource",
        kind
    );
    Ok(BuiltResource { name: name.to_string(), resource })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xds::cluster::{create_local_cluster, create_pass_through_cluster};
    use crate::xds::endpoint::build_static_endpoint;
    use crate::xds::listener::create_catch_all_listener;
    use prost::Message;

    #[test]
    fn test_built_resources_carry_type_urls_in_order() {
        let mut set = ResourceSet::new();
        set.add_listener(create_catch_all_listener("catch_all", "0.0.0.0", 15001, "pass_through").unwrap())
            .add_cluster(create_pass_through_cluster("pass_through"))
            .add_cluster(create_local_cluster("localhost:8080", "127.0.0.1", 8080))
            .add_endpoints(build_static_endpoint("backend", "10.0.0.2", 80));

        let built = set.into_built_resources().unwrap();
        let summary: Vec<_> = built.iter().map(|r| (r.name.as_str(), r.type_url())).collect();
        assert_eq!(
            summary,
            vec![
                ("pass_through", CLUSTER_TYPE_URL),
                ("localhost:8080", CLUSTER_TYPE_URL),
                ("backend", ENDPOINT_TYPE_URL),
                ("catch_all", LISTENER_TYPE_URL),
            ]
        );

        let listener = Listener::decode(&built[3].clone().into_any().value[..]).unwrap();
        assert_eq!(listener.name, "catch_all");
    }

    #[test]
    fn test_empty_set_builds_nothing() {
        let set = ResourceSet::new();
        assert!(set.is_empty());
        assert!(set.into_built_resources().unwrap().is_empty());
    }
}
