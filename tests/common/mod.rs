//! Common fixtures for integration tests.
//!
//! Meshes, dataplanes and policies are written as YAML the way the resource layer
//! would hand them over.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

use meshplane::domain::{Dataplane, DataplaneMetadata, HealthCheck, Mesh, Proxy, TrafficPermission};
use meshplane::xds::{ControlPlaneContext, SynthesisContext};

pub const SDS_LOCATION: &str = "control-plane.mesh-system:5677";
pub const SDS_CERT: &[u8] = b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

pub fn mesh(mtls: bool) -> Mesh {
    let yaml = format!(
        r#"
name: demo
mtls:
  enabled: {}
logging:
  default_backend: file
  backends:
    - name: file
      type: file
      path: /var/log/envoy/access.log
    - name: logstash
      type: tcp
      address: logstash.logging:5000
"#,
        mtls
    );
    serde_yaml::from_str(&yaml).expect("mesh fixture")
}

pub fn context(mtls: bool) -> SynthesisContext {
    SynthesisContext::new(mesh(mtls), ControlPlaneContext::new(SDS_LOCATION, SDS_CERT.to_vec()))
}

pub fn web_dataplane() -> Dataplane {
    serde_yaml::from_str(
        r#"
mesh: demo
name: web-01
networking:
  inbound:
    - interface: 10.0.0.10:10001:8080
      tags:
        service: web
        version: v1
"#,
    )
    .expect("dataplane fixture")
}

pub fn gateway_dataplane() -> Dataplane {
    serde_yaml::from_str(
        r#"
mesh: demo
name: edge-01
networking:
  gateway:
    tags:
      service: edge
"#,
    )
    .expect("gateway fixture")
}

pub fn proxy(dataplane: Dataplane, token_path: Option<&str>) -> Proxy {
    let metadata = token_path.map(DataplaneMetadata::with_token_path).unwrap_or_default();
    Proxy::new(dataplane, metadata)
}

pub fn permissions() -> Vec<TrafficPermission> {
    serde_yaml::from_str(
        r#"
- name: web-to-backend
  mesh: demo
  sources:
    - match:
        service: web
  destinations:
    - match:
        service: backend
- name: monitoring
  mesh: demo
  sources:
    - match:
        service: "*"
  destinations:
    - match:
        service: backend
"#,
    )
    .expect("traffic permission fixture")
}

pub fn health_check() -> HealthCheck {
    serde_yaml::from_str(
        r#"
name: backend-checks
mesh: demo
active_checks:
  interval: 10
  timeout: 2
  unhealthy_threshold: 3
  healthy_threshold: 1
passive_checks:
  penalty_interval: 30
  unhealthy_threshold: 5
"#,
    )
    .expect("health check fixture")
}
