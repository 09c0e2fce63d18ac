//! # Configuration Management
//!
//! Process-level settings for the synthesis core. Only the SDS server location and
//! certificate feed into generated proxy configuration; the rest tunes logging.

pub mod settings;

pub use settings::{LoggingConfig, SdsServerConfig, Settings, ENV_PREFIX};
