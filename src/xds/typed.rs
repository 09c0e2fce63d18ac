//! Typed config encoding.

use envoy_types::pb::google::protobuf::Any;
use prost::Message;

use crate::errors::{Error, Result};

/// Encode a message into a `google.protobuf.Any` with the given type URL.
///
/// Encoding into a growable buffer only fails on a defect in the message itself;
/// that surfaces as the fatal [`Error::InternalSerialization`].
pub fn to_any<M: Message>(type_url: &str, message: &M) -> Result<Any> {
    let mut value = Vec::with_capacity(message.encoded_len());
    message.encode(&mut value).map_err(|source| Error::InternalSerialization {
        type_url: type_url.to_string(),
        source,
    })?;

    Ok(Any { type_url: type_url.to_string(), value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xds::constants::TCP_PROXY_TYPE_URL;
    use envoy_types::pb::envoy::extensions::filters::network::tcp_proxy::v3::TcpProxy;

    #[test]
    fn test_to_any_round_trips() {
        let proxy = TcpProxy { stat_prefix: "web".into(), ..Default::default() };

        let any = to_any(TCP_PROXY_TYPE_URL, &proxy).unwrap();
        assert_eq!(any.type_url, TCP_PROXY_TYPE_URL);

        let decoded = TcpProxy::decode(&any.value[..]).unwrap();
        assert_eq!(decoded.stat_prefix, "web");
    }
}
