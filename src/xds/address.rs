//! Address and metadata layers shared by endpoints and listeners.

use envoy_types::pb::envoy::config::core::v3::{
    address::Address as AddressType,
    socket_address::{PortSpecifier, Protocol},
    Address, Metadata, SocketAddress,
};
use envoy_types::pb::google::protobuf::{value::Kind, Struct, Value};

use crate::domain::Tags;
use crate::xds::constants::LB_METADATA_NAMESPACE;

/// TCP socket address
pub fn socket_address(address: &str, port: u32) -> Address {
    Address {
        address: Some(AddressType::SocketAddress(SocketAddress {
            protocol: Protocol::Tcp as i32,
            address: address.to_string(),
            port_specifier: Some(PortSpecifier::PortValue(port)),
            ..Default::default()
        })),
    }
}

/// Load balancer metadata for subset matching.
///
/// Returns `None` for an empty tag map: an empty metadata block would still
/// participate in subset selection.
pub fn lb_metadata(tags: &Tags) -> Option<Metadata> {
    if tags.is_empty() {
        return None;
    }

    let fields = tags
        .iter()
        .map(|(key, value)| (key.clone(), Value { kind: Some(Kind::StringValue(value.clone())) }))
        .collect();

    let mut metadata = Metadata::default();
    metadata.filter_metadata.insert(LB_METADATA_NAMESPACE.to_string(), Struct { fields });
    Some(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_address_is_tcp() {
        let address = socket_address("10.0.0.1", 9090);
        match address.address {
            Some(AddressType::SocketAddress(socket)) => {
                assert_eq!(socket.protocol, Protocol::Tcp as i32);
                assert_eq!(socket.address, "10.0.0.1");
                assert_eq!(socket.port_specifier, Some(PortSpecifier::PortValue(9090)));
            }
            _ => panic!("Expected socket address"),
        }
    }

    #[test]
    fn test_lb_metadata_for_empty_tags_is_absent() {
        assert!(lb_metadata(&Tags::new()).is_none());
    }

    #[test]
    fn test_lb_metadata_holds_tags_under_namespace() {
        let tags = Tags::from([
            ("service".to_string(), "backend".to_string()),
            ("version".to_string(), "v2".to_string()),
        ]);

        let metadata = lb_metadata(&tags).unwrap();
        assert_eq!(metadata.filter_metadata.len(), 1);

        let fields = &metadata.filter_metadata[LB_METADATA_NAMESPACE].fields;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["version"].kind, Some(Kind::StringValue("v2".into())));
    }
}
