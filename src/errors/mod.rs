//! # Error Handling
//!
//! Error types for proxy configuration synthesis, defined with `thiserror`.
//!
//! Synthesis is synchronous and never retried inside this crate. Callers decide what
//! to do with a failed pass; [`Error::is_fatal`] separates programming defects (a
//! well-formed message that failed to serialize) from errors caused by the mesh state.

/// Custom result type for synthesis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the synthesis core
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Identity resolution found neither an inbound nor a gateway
    #[error("dataplane '{mesh}/{name}' has no services associated with it")]
    NoServiceAssociated { mesh: String, name: String },

    /// A logging backend could not be turned into an Envoy access log
    #[error("access log backend '{backend}' is invalid: {message}")]
    AccessLogConfiguration { backend: String, message: String },

    /// An in-memory protobuf message failed to encode into its typed config
    #[error("failed to serialize {type_url}: {source}")]
    InternalSerialization {
        type_url: String,
        #[source]
        source: prost::EncodeError,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors for configuration and input descriptors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create an access log configuration error for the named backend
    pub fn access_log<B: Into<String>, M: Into<String>>(backend: B, message: M) -> Self {
        Self::AccessLogConfiguration { backend: backend.into(), message: message.into() }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Whether the synthesis pass must be aborted without any partial delivery.
    ///
    /// Only serialization failures qualify; everything else is caused by mesh
    /// state and can be handled by skipping the affected dataplane or listener.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InternalSerialization { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::io("I/O operation failed", error)
    }
}

impl From<config::ConfigError> for Error {
    fn from(error: config::ConfigError) -> Self {
        Self::config(format!("Configuration loading failed: {}", error))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect();
        fields.sort();

        Self::validation(fields.join("; "))
    }
}
