//! # Structured Logging
//!
//! Subscriber setup and span helpers built on the tracing ecosystem.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Create a tracing span for one synthesis operation against a proxy.
///
/// ```rust,ignore
/// let span = synthesis_span!("inbound_listener", proxy.id);
/// let span = synthesis_span!("outbound_listener", proxy.id, listener = %name);
/// ```
#[macro_export]
macro_rules! synthesis_span {
    ($operation:expr, $proxy_id:expr) => {
        tracing::debug_span!(
            "xds_synthesis",
            operation = %$operation,
            proxy_id = %$proxy_id
        )
    };
    ($operation:expr, $proxy_id:expr, $($field:tt)*) => {
        tracing::debug_span!(
            "xds_synthesis",
            operation = %$operation,
            proxy_id = %$proxy_id,
            $($field)*
        )
    };
}

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over `config.level`. Returns `false` when a global subscriber was
/// already installed (e.g. by the embedding control plane or a test harness).
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = if config.json {
        fmt().with_env_filter(filter).json().with_target(true).try_init()
    } else {
        fmt().with_env_filter(filter).with_target(true).try_init()
    };

    installed.is_ok()
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_compile() {
        let _span = synthesis_span!("inbound_listener", "demo.dp-1");
        let _span = synthesis_span!("outbound_listener", "demo.dp-1", listener = "outbound:web");
    }
}
