//! # Observability Infrastructure
//!
//! Structured logging for the synthesis core. Builders log through `tracing`;
//! the embedding process decides whether to install [`init_logging`].

pub mod logging;

pub use logging::init_logging;
