//! TLS and SDS secret assembly
//!
//! Mutual TLS is switched on mesh-wide; when it is, every TLS context references two
//! SDS secrets (the mesh CA and the workload identity certificate) served by the
//! control plane. The SDS channel is authenticated with the control plane's root
//! certificate, inline, and optionally with the dataplane token as call credentials.

use envoy_types::pb::envoy::config::core::v3::{
    api_config_source::ApiType,
    config_source::ConfigSourceSpecifier,
    data_source::Specifier,
    grpc_service::{
        google_grpc::{
            call_credentials::{
                self, metadata_credentials_from_plugin, MetadataCredentialsFromPlugin,
            },
            channel_credentials, CallCredentials, ChannelCredentials, SslCredentials,
        },
        GoogleGrpc, TargetSpecifier,
    },
    transport_socket::ConfigType as TransportSocketConfigType,
    ApiConfigSource, ApiVersion, ConfigSource, DataSource, GrpcService, TransportSocket,
};
use envoy_types::pb::envoy::config::grpc_credential::v3::FileBasedMetadataConfig;
use envoy_types::pb::envoy::extensions::transport_sockets::tls::v3::{
    common_tls_context::ValidationContextType, CommonTlsContext, DownstreamTlsContext,
    SdsSecretConfig, UpstreamTlsContext,
};
use envoy_types::pb::google::protobuf::BoolValue;

use crate::domain::DataplaneMetadata;
use crate::errors::Result;
use crate::xds::constants::{
    DOWNSTREAM_TLS_CONTEXT_TYPE_URL, FILE_BASED_METADATA_CONFIG_TYPE_URL,
    FILE_BASED_METADATA_CREDENTIALS, IDENTITY_CERT_RESOURCE, MESH_CA_RESOURCE,
    TLS_TRANSPORT_SOCKET, UPSTREAM_TLS_CONTEXT_TYPE_URL,
};
use crate::xds::context::SynthesisContext;
use crate::xds::typed::to_any;

/// Server side context for inbound listeners; `None` when mesh mTLS is off
pub fn create_downstream_tls_context(
    ctx: &SynthesisContext,
    metadata: &DataplaneMetadata,
) -> Result<Option<DownstreamTlsContext>> {
    if !ctx.mtls_enabled() {
        return Ok(None);
    }

    Ok(Some(DownstreamTlsContext {
        common_tls_context: Some(create_common_tls_context(ctx, metadata)?),
        require_client_certificate: Some(BoolValue { value: true }),
        ..Default::default()
    }))
}

/// Client side context for mesh clusters; `None` when mesh mTLS is off
pub fn create_upstream_tls_context(
    ctx: &SynthesisContext,
    metadata: &DataplaneMetadata,
) -> Result<Option<UpstreamTlsContext>> {
    if !ctx.mtls_enabled() {
        return Ok(None);
    }

    Ok(Some(UpstreamTlsContext {
        common_tls_context: Some(create_common_tls_context(ctx, metadata)?),
        ..Default::default()
    }))
}

/// Common context referencing the mesh CA and identity certificate secrets
pub fn create_common_tls_context(
    ctx: &SynthesisContext,
    metadata: &DataplaneMetadata,
) -> Result<CommonTlsContext> {
    Ok(CommonTlsContext {
        validation_context_type: Some(ValidationContextType::ValidationContextSdsSecretConfig(
            sds_secret_config(ctx, MESH_CA_RESOURCE, metadata)?,
        )),
        tls_certificate_sds_secret_configs: vec![sds_secret_config(
            ctx,
            IDENTITY_CERT_RESOURCE,
            metadata,
        )?],
        ..Default::default()
    })
}

/// Transport socket wrapping the downstream context, if any
pub fn downstream_transport_socket(
    ctx: &SynthesisContext,
    metadata: &DataplaneMetadata,
) -> Result<Option<TransportSocket>> {
    create_downstream_tls_context(ctx, metadata)?
        .map(|tls| transport_socket(DOWNSTREAM_TLS_CONTEXT_TYPE_URL, &tls))
        .transpose()
}

/// Transport socket wrapping the upstream context, if any
pub fn upstream_transport_socket(
    ctx: &SynthesisContext,
    metadata: &DataplaneMetadata,
) -> Result<Option<TransportSocket>> {
    create_upstream_tls_context(ctx, metadata)?
        .map(|tls| transport_socket(UPSTREAM_TLS_CONTEXT_TYPE_URL, &tls))
        .transpose()
}

fn transport_socket<M: prost::Message>(type_url: &str, context: &M) -> Result<TransportSocket> {
    Ok(TransportSocket {
        name: TLS_TRANSPORT_SOCKET.to_string(),
        config_type: Some(TransportSocketConfigType::TypedConfig(to_any(type_url, context)?)),
    })
}

fn sds_secret_config(
    ctx: &SynthesisContext,
    name: &str,
    metadata: &DataplaneMetadata,
) -> Result<SdsSecretConfig> {
    let google_grpc = with_call_credentials(
        GoogleGrpc {
            target_uri: ctx.control_plane.sds_location.clone(),
            stat_prefix: format!("sds_{}", name),
            channel_credentials: Some(ChannelCredentials {
                credential_specifier: Some(channel_credentials::CredentialSpecifier::SslCredentials(
                    SslCredentials {
                        root_certs: Some(DataSource {
                            specifier: Some(Specifier::InlineBytes(
                                ctx.control_plane.sds_tls_cert.clone(),
                            )),
                            ..Default::default()
                        }),
                        ..Default::default()
                    },
                )),
            }),
            ..Default::default()
        },
        metadata,
    )?;

    Ok(SdsSecretConfig {
        name: name.to_string(),
        sds_config: Some(ConfigSource {
            resource_api_version: ApiVersion::V3 as i32,
            config_source_specifier: Some(ConfigSourceSpecifier::ApiConfigSource(
                ApiConfigSource {
                    api_type: ApiType::Grpc as i32,
                    transport_api_version: ApiVersion::V3 as i32,
                    grpc_services: vec![GrpcService {
                        target_specifier: Some(TargetSpecifier::GoogleGrpc(google_grpc)),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            )),
            ..Default::default()
        }),
    })
}

fn with_call_credentials(mut grpc: GoogleGrpc, metadata: &DataplaneMetadata) -> Result<GoogleGrpc> {
    let Some(token_path) = metadata.token_path() else {
        return Ok(grpc);
    };

    let config = FileBasedMetadataConfig {
        secret_data: Some(DataSource {
            specifier: Some(Specifier::Filename(token_path.to_string())),
            ..Default::default()
        }),
        ..Default::default()
    };

    grpc.call_credentials.push(CallCredentials {
        credential_specifier: Some(call_credentials::CredentialSpecifier::FromPlugin(
            MetadataCredentialsFromPlugin {
                name: FILE_BASED_METADATA_CREDENTIALS.to_string(),
                config_type: Some(metadata_credentials_from_plugin::ConfigType::TypedConfig(
                    to_any(FILE_BASED_METADATA_CONFIG_TYPE_URL, &config)?,
                )),
            },
        )),
    });
    grpc.credentials_factory_name = FILE_BASED_METADATA_CREDENTIALS.to_string();

    Ok(grpc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mesh;
    use crate::xds::context::ControlPlaneContext;
    use prost::Message;

    fn context(mtls: bool) -> SynthesisContext {
        SynthesisContext::new(
            Mesh::new("demo", mtls),
            ControlPlaneContext::new("control-plane:5677", b"CERTIFICATE".to_vec()),
        )
    }

    fn google_grpc(secret: &SdsSecretConfig) -> &GoogleGrpc {
        let Some(ConfigSourceSpecifier::ApiConfigSource(api)) =
            secret.sds_config.as_ref().and_then(|c| c.config_source_specifier.as_ref())
        else {
            panic!("Expected API config source");
        };
        assert_eq!(api.api_type, ApiType::Grpc as i32);
        assert_eq!(api.grpc_services.len(), 1);
        match &api.grpc_services[0].target_specifier {
            Some(TargetSpecifier::GoogleGrpc(grpc)) => grpc,
            _ => panic!("Expected Google gRPC target"),
        }
    }

    fn sds_configs(common: &CommonTlsContext) -> (&SdsSecretConfig, &SdsSecretConfig) {
        let validation = match &common.validation_context_type {
            Some(ValidationContextType::ValidationContextSdsSecretConfig(config)) => config,
            _ => panic!("Expected validation context SDS config"),
        };
        assert_eq!(common.tls_certificate_sds_secret_configs.len(), 1);
        (validation, &common.tls_certificate_sds_secret_configs[0])
    }

    #[test]
    fn test_no_tls_when_mtls_disabled() {
        let ctx = context(false);
        let metadata = DataplaneMetadata::with_token_path("/tmp/token");

        assert!(create_downstream_tls_context(&ctx, &metadata).unwrap().is_none());
        assert!(create_upstream_tls_context(&ctx, &metadata).unwrap().is_none());
        assert!(downstream_transport_socket(&ctx, &metadata).unwrap().is_none());
        assert!(upstream_transport_socket(&ctx, &metadata).unwrap().is_none());
    }

    #[test]
    fn test_downstream_requires_client_certificate() {
        let tls = create_downstream_tls_context(&context(true), &DataplaneMetadata::default())
            .unwrap()
            .unwrap();
        assert_eq!(tls.require_client_certificate, Some(BoolValue { value: true }));

        let common = tls.common_tls_context.unwrap();
        let (validation, certificate) = sds_configs(&common);
        assert_eq!(validation.name, MESH_CA_RESOURCE);
        assert_eq!(certificate.name, IDENTITY_CERT_RESOURCE);
    }

    #[test]
    fn test_sds_channel_without_token_has_only_channel_credentials() {
        let common = create_common_tls_context(&context(true), &DataplaneMetadata::default()).unwrap();
        let (validation, certificate) = sds_configs(&common);

        for (secret, stat_prefix) in [(validation, "sds_mesh_ca"), (certificate, "sds_identity_cert")] {
            let grpc = google_grpc(secret);
            assert_eq!(grpc.target_uri, "control-plane:5677");
            assert_eq!(grpc.stat_prefix, stat_prefix);
            assert!(grpc.call_credentials.is_empty());
            assert!(grpc.credentials_factory_name.is_empty());

            match grpc
                .channel_credentials
                .as_ref()
                .and_then(|c| c.credential_specifier.as_ref())
            {
                Some(channel_credentials::CredentialSpecifier::SslCredentials(ssl)) => {
                    let root = ssl.root_certs.as_ref().and_then(|r| r.specifier.as_ref());
                    assert_eq!(root, Some(&Specifier::InlineBytes(b"CERTIFICATE".to_vec())));
                }
                _ => panic!("Expected SSL channel credentials"),
            }
        }
    }

    #[test]
    fn test_sds_channel_with_token_has_call_credentials() {
        let metadata = DataplaneMetadata::with_token_path("/var/run/dataplane/token");
        let common = create_common_tls_context(&context(true), &metadata).unwrap();
        let (validation, certificate) = sds_configs(&common);

        for secret in [validation, certificate] {
            let grpc = google_grpc(secret);
            assert_eq!(grpc.credentials_factory_name, FILE_BASED_METADATA_CREDENTIALS);
            assert_eq!(grpc.call_credentials.len(), 1);

            let plugin = match &grpc.call_credentials[0].credential_specifier {
                Some(call_credentials::CredentialSpecifier::FromPlugin(plugin)) => plugin,
                _ => panic!("Expected plugin call credentials"),
            };
            assert_eq!(plugin.name, FILE_BASED_METADATA_CREDENTIALS);

            let any = match &plugin.config_type {
                Some(metadata_credentials_from_plugin::ConfigType::TypedConfig(any)) => any,
                _ => panic!("Expected typed plugin config"),
            };
            assert_eq!(any.type_url, FILE_BASED_METADATA_CONFIG_TYPE_URL);

            let config = FileBasedMetadataConfig::decode(&any.value[..]).unwrap();
            assert_eq!(
                config.secret_data.and_then(|d| d.specifier),
                Some(Specifier::Filename("/var/run/dataplane/token".into()))
            );
        }
    }

    #[test]
    fn test_upstream_transport_socket_wraps_context() {
        let socket = upstream_transport_socket(&context(true), &DataplaneMetadata::default())
            .unwrap()
            .unwrap();
        assert_eq!(socket.name, TLS_TRANSPORT_SOCKET);

        let Some(TransportSocketConfigType::TypedConfig(any)) = socket.config_type else {
            panic!("Expected typed transport socket config");
        };
        assert_eq!(any.type_url, UPSTREAM_TLS_CONTEXT_TYPE_URL);

        let tls = UpstreamTlsContext::decode(&any.value[..]).unwrap();
        assert!(tls.common_tls_context.is_some());
    }
}
