//! Error types for auditbucket-core

use thiserror::Error;

/// Result type alias using auditbucket-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid or contradictory input detected before any provider call.
///
/// Always fatal to the reconciliation attempt and never retried. The identity
/// builder and lifecycle compiler return either a complete value or one of
/// these, never a partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No label rendered to a non-empty value
    #[error("No naming label is present: set at least one of namespace, tenant, environment, stage, name or attributes")]
    NoLabels,

    /// Label order names something that is not a recognized label
    #[error("Unknown label '{label}' in label_order. Valid labels: namespace, tenant, environment, stage, name, attributes")]
    UnknownLabel { label: String },

    /// Label order names the same label twice
    #[error("Label '{label}' appears more than once in label_order")]
    DuplicateLabel { label: String },

    /// Label order was given but empty
    #[error("label_order must contain at least one label")]
    EmptyLabelOrder,

    /// Sanitization pattern does not compile
    #[error("Invalid regex_replace_chars pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Two day thresholds that must be strictly increasing are not
    #[error("{later_field} ({later_days}) must be greater than {earlier_field} ({earlier_days})")]
    TransitionOrder {
        earlier_field: &'static str,
        earlier_days: u32,
        later_field: &'static str,
        later_days: u32,
    },

    /// Any other invalid value
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigurationError {
    /// Create an unknown label error
    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::UnknownLabel {
            label: label.into(),
        }
    }

    /// Create a duplicate label error
    pub fn duplicate_label(label: impl Into<String>) -> Self {
        Self::DuplicateLabel {
            label: label.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a transition ordering error
    pub fn transition_order(
        earlier_field: &'static str,
        earlier_days: u32,
        later_field: &'static str,
        later_days: u32,
    ) -> Self {
        Self::TransitionOrder {
            earlier_field,
            earlier_days,
            later_field,
            later_days,
        }
    }
}

/// Core error types for auditbucket
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid naming or lifecycle input
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Schema validation error
    #[error("Schema validation failed:\n{errors}")]
    SchemaValidation { errors: String },

    /// Schema not found
    #[error("Schema not found: {name}")]
    SchemaNotFound { name: String },

    /// Embedded schema failed to load or compile
    #[error("Invalid schema {name}: {message}")]
    InvalidSchema { name: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a schema validation error from a list of errors
    pub fn schema_validation(errors: Vec<String>) -> Self {
        Self::SchemaValidation {
            errors: errors.join("\n"),
        }
    }

    /// Create a schema not found error
    pub fn schema_not_found(name: impl Into<String>) -> Self {
        Self::SchemaNotFound { name: name.into() }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a configuration error (as opposed to file or parse failure)
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}
