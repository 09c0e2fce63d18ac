//! Access log configuration for outbound listeners
//!
//! Converts a mesh logging backend into an Envoy `AccessLog` for a TCP proxy.
//! File backends write locally on the proxy; TCP backends stream log lines over
//! gRPC through the `access_log_sink` cluster, which forwards them to the
//! collector address carried in the log name.

use envoy_types::pb::envoy::config::{
    accesslog::v3::{access_log::ConfigType as AccessLogConfigType, AccessLog},
    core::v3::{
        grpc_service, substitution_format_string::Format, ApiVersion, GrpcService,
        SubstitutionFormatString,
    },
};
use envoy_types::pb::envoy::extensions::access_loggers::file::v3::{
    file_access_log::AccessLogFormat, FileAccessLog,
};
use envoy_types::pb::envoy::extensions::access_loggers::grpc::v3::{
    CommonGrpcAccessLogConfig, TcpGrpcAccessLogConfig,
};
use tracing::warn;

use crate::domain::{BackendKind, LoggingBackend, Proxy};
use crate::errors::{Error, Result};
use crate::utils::split_host_port;
use crate::xds::constants::{
    ACCESS_LOG_SINK_CLUSTER, FILE_ACCESS_LOG, FILE_ACCESS_LOG_TYPE_URL, TCP_GRPC_ACCESS_LOG,
    TCP_GRPC_ACCESS_LOG_TYPE_URL,
};
use crate::xds::typed::to_any;

/// Format used when a backend does not declare its own
pub const DEFAULT_ACCESS_LOG_FORMAT: &str = "[%START_TIME%] %SOURCE_ADDRESS%(%SOURCE_SERVICE%)->%UPSTREAM_HOST%(%DESTINATION_SERVICE%) took %DURATION%ms, sent %BYTES_SENT% bytes, received: %BYTES_RECEIVED% bytes\n";

const SOURCE_ADDRESS: &str = "%SOURCE_ADDRESS%";
const SOURCE_SERVICE: &str = "%SOURCE_SERVICE%";
const DESTINATION_SERVICE: &str = "%DESTINATION_SERVICE%";

/// Build the access log for traffic from `source_service` to `destination_service`
pub fn convert_logging_backend(
    source_service: &str,
    destination_service: &str,
    backend: &LoggingBackend,
    proxy: &Proxy,
) -> Result<AccessLog> {
    let format = interpolate_format(
        backend.format.as_deref().unwrap_or(DEFAULT_ACCESS_LOG_FORMAT),
        &proxy.source_address().unwrap_or_default(),
        source_service,
        destination_service,
    );

    let access_log = match &backend.kind {
        BackendKind::File { path } => file_access_log(&backend.name, path, format),
        BackendKind::Tcp { address } => tcp_access_log(&backend.name, address, &format),
    };

    if let Err(error) = &access_log {
        warn!(
            proxy_id = %proxy.id,
            backend = %backend.name,
            kind = backend.kind.as_str(),
            %error,
            "Failed to convert logging backend"
        );
    }
    access_log
}

/// Substitute the mesh-level placeholders; Envoy's own operators are left intact
pub fn interpolate_format(
    format: &str,
    source_address: &str,
    source_service: &str,
    destination_service: &str,
) -> String {
    format
        .replace(SOURCE_ADDRESS, source_address)
        .replace(SOURCE_SERVICE, source_service)
        .replace(DESTINATION_SERVICE, destination_service)
}

#[allow(deprecated)]
fn file_access_log(backend: &str, path: &str, format: String) -> Result<AccessLog> {
    if path.trim().is_empty() {
        return Err(Error::access_log(backend, "file backend requires a path"));
    }

    let file_log = FileAccessLog {
        path: path.to_string(),
        access_log_format: Some(AccessLogFormat::LogFormat(SubstitutionFormatString {
            format: Some(Format::TextFormat(format)),
            ..Default::default()
        })),
    };

    Ok(AccessLog {
        name: FILE_ACCESS_LOG.to_string(),
        filter: None,
        config_type: Some(AccessLogConfigType::TypedConfig(to_any(
            FILE_ACCESS_LOG_TYPE_URL,
            &file_log,
        )?)),
    })
}

fn tcp_access_log(backend: &str, address: &str, format: &str) -> Result<AccessLog> {
    if split_host_port(address).is_none() {
        return Err(Error::access_log(
            backend,
            format!("tcp backend address '{}' must be host:port", address),
        ));
    }

    let tcp_config = TcpGrpcAccessLogConfig {
        common_config: Some(CommonGrpcAccessLogConfig {
            // The sink splits the log name back into collector address and line format
            log_name: format!("{};{}", address, format),
            grpc_service: Some(GrpcService {
                target_specifier: Some(grpc_service::TargetSpecifier::EnvoyGrpc(
                    grpc_service::EnvoyGrpc {
                        cluster_name: ACCESS_LOG_SINK_CLUSTER.to_string(),
                        ..Default::default()
                    },
                )),
                ..Default::default()
            }),
            transport_api_version: ApiVersion::V3 as i32,
            ..Default::default()
        }),
    };

    Ok(AccessLog {
        name: TCP_GRPC_ACCESS_LOG.to_string(),
        filter: None,
        config_type: Some(AccessLogConfigType::TypedConfig(to_any(
            TCP_GRPC_ACCESS_LOG_TYPE_URL,
            &tcp_config,
        )?)),
    })
}
