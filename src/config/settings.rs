//! # Configuration Settings
//!
//! Settings consumed when building a synthesis context: where proxies reach the
//! control plane's SDS server, and how the crate logs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::{Error, Result};
use crate::utils::split_host_port;

/// Environment variable prefix used by [`Settings::load`]
pub const ENV_PREFIX: &str = "MESHPLANE";

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct Settings {
    /// SDS server location advertised to proxies
    #[validate(nested)]
    pub sds: SdsServerConfig,

    /// Logging configuration
    #[validate(nested)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load settings from an optional file, overridden by `MESHPLANE__*` environment variables.
    ///
    /// Nested keys use a double underscore, e.g. `MESHPLANE__SDS__LOCATION`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings: Settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }
}

/// Location of the control plane's SDS server as seen from proxies
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SdsServerConfig {
    /// `host:port` of the SDS gRPC server
    #[validate(custom(function = "validate_host_port"))]
    pub location: String,

    /// PEM file with the SDS server's root certificate, embedded inline into proxy config
    pub tls_cert_file: PathBuf,
}

impl Default for SdsServerConfig {
    fn default() -> Self {
        Self {
            location: "localhost:5677".to_string(),
            tls_cert_file: PathBuf::from("/etc/meshplane/sds/cert.pem"),
        }
    }
}

impl SdsServerConfig {
    /// Create SdsServerConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let location =
            std::env::var("MESHPLANE_SDS_LOCATION").unwrap_or_else(|_| defaults.location.clone());

        let tls_cert_file = std::env::var("MESHPLANE_SDS_TLS_CERT_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.tls_cert_file);

        let config = Self { location, tls_cert_file };
        config.validate()?;
        Ok(config)
    }

    /// Read the root certificate bytes referenced by `tls_cert_file`
    pub fn read_tls_cert(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.tls_cert_file).map_err(|e| {
            Error::io(
                format!("Failed to read SDS certificate at {}", self.tls_cert_file.display()),
                e,
            )
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub level: String,

    /// Emit JSON structured logs
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

fn validate_host_port(location: &str) -> std::result::Result<(), ValidationError> {
    if split_host_port(location).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_sds_location")
            .with_message("SDS location must be host:port".into()))
    }
}
