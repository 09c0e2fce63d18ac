//! Global subscriber installation runs in its own test binary so it cannot race
//! with `#[traced_test]` subscribers in the unit tests.

use meshplane::{init_logging, LoggingConfig};

#[test]
fn init_logging_tolerates_existing_subscriber() {
    let config = LoggingConfig { level: "meshplane=debug".into(), json: true };

    assert!(init_logging(&config));
    assert!(!init_logging(&config));

    let _span = meshplane::synthesis_span!("inbound_listener", "demo.web-01").entered();
    tracing::debug!("subscriber installed");
}
