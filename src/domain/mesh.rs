//! Mesh domain types
//!
//! A mesh is the policy scope every dataplane belongs to. The synthesis core only
//! reads two things from it: whether mutual TLS is on and which logging backends
//! outbound listeners may write access logs to.

use serde::{Deserialize, Serialize};

use super::policy::LoggingBackend;

/// Mesh snapshot consumed by one synthesis pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Mesh name, also the trust domain of every identity in it
    pub name: String,

    /// Mutual TLS settings
    #[serde(default)]
    pub mtls: MtlsSettings,

    /// Access logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Mesh {
    /// Create a mesh with mTLS switched on or off and no logging backends
    pub fn new(name: impl Into<String>, mtls_enabled: bool) -> Self {
        Self {
            name: name.into(),
            mtls: MtlsSettings { enabled: mtls_enabled },
            logging: LoggingSettings::default(),
        }
    }

    pub fn mtls_enabled(&self) -> bool {
        self.mtls.enabled
    }

    /// Look up a logging backend by name, falling back to the mesh default.
    ///
    /// `None` as the requested name selects the default backend. Returns `None`
    /// when nothing matches, which means no access log is attached.
    pub fn logging_backend(&self, name: Option<&str>) -> Option<&LoggingBackend> {
        let wanted = name.or(self.logging.default_backend.as_deref())?;
        self.logging.backends.iter().find(|backend| backend.name == wanted)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtlsSettings {
    #[serde(default)]
    pub enabled: bool,
}

/// Logging backends declared on the mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Backend used when a traffic log policy does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_backend: Option<String>,

    #[serde(default)]
    pub backends: Vec<LoggingBackend>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::BackendKind;

    fn file_backend(name: &str) -> LoggingBackend {
        LoggingBackend {
            name: name.to_string(),
            format: None,
            kind: BackendKind::File { path: format!("/var/log/{}.log", name) },
        }
    }

    #[test]
    fn test_logging_backend_lookup() {
        let mut mesh = Mesh::new("demo", false);
        mesh.logging.backends = vec![file_backend("file"), file_backend("audit")];

        assert!(mesh.logging_backend(None).is_none());
        assert_eq!(mesh.logging_backend(Some("audit")).map(|b| b.name.as_str()), Some("audit"));
        assert!(mesh.logging_backend(Some("missing")).is_none());

        mesh.logging.default_backend = Some("file".into());
        assert_eq!(mesh.logging_backend(None).map(|b| b.name.as_str()), Some("file"));
    }

    #[test]
    fn test_mesh_from_yaml_defaults_mtls_off() {
        let mesh: Mesh = serde_yaml::from_str("name: demo").unwrap();
        assert_eq!(mesh.name, "demo");
        assert!(!mesh.mtls_enabled());
        assert!(mesh.logging.backends.is_empty());
    }
}
