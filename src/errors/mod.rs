//! # Error Handling
//!
//! Error types for the RDS route-configuration builder. Translator entry
//! points (`xds::inbound::build`, etc.) never return `Result` themselves
//! (spec.md §7: malformed inputs are skipped, not surfaced as errors) — this
//! type exists for the fallible internals (config loading, proto encoding
//! extension points) that do.

/// Result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, RdsError>;

/// Alias for `RdsError`, for callers that prefer the generic name.
pub type Error = RdsError;

/// Error type for this crate's fallible operations.
#[derive(thiserror::Error, Debug)]
pub enum RdsError {
    /// Configuration loading/parsing errors.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input validation errors.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Type/proto conversion errors.
    #[error("Conversion error: {context}")]
    Conversion {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Catch-all for conditions that should not occur given validated
    /// upstream input.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RdsError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn conversion<S: Into<String>>(context: S) -> Self {
        Self::Conversion { context: context.into(), source: None }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into() }
    }
}

impl From<config::ConfigError> for RdsError {
    fn from(error: config::ConfigError) -> Self {
        Self::config_with_source("Configuration loading failed", Box::new(error))
    }
}
