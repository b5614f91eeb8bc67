//! Error types for autoloader using snafu.
//!
//! Every failure is fatal and propagates to the caller unchanged: there are
//! no retries and no degraded mode.

use snafu::prelude::*;
use std::path::PathBuf;

/// Boxed error raised by a streaming engine implementation.
pub type EngineError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============ Config Errors ============

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Format is not one of the supported auto loader formats (strict validation only).
    #[snafu(display(
        "Unsupported format '{format}': expected one of json, csv, parquet, avro, orc, text, binaryfile"
    ))]
    UnsupportedFormat { format: String },

    /// Source location is empty.
    #[snafu(display("Reader location cannot be empty"))]
    EmptyLocation,

    /// Schema location is empty.
    #[snafu(display("Reader schema_location cannot be empty"))]
    EmptySchemaLocation,

    /// A named reader failed validation.
    #[snafu(display("Reader '{reader}' is invalid: {source}"))]
    InvalidReader {
        reader: String,
        #[snafu(source(from(ConfigError, Box::new)))]
        source: Box<ConfigError>,
    },

    /// Configuration declares no readers.
    #[snafu(display("Configuration must declare at least one reader"))]
    NoReaders,

    /// Environment variable interpolation failed.
    #[snafu(display("Environment variable interpolation failed:\n{message}"))]
    EnvInterpolation { message: String },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML: {source}"))]
    YamlParse { source: serde_yaml::Error },

    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read configuration directory.
    #[snafu(display("Failed to read directory {}: {source}", path.display()))]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file is not YAML.
    #[snafu(display("Unsupported config file {}: only .yaml/.yml supported", path.display()))]
    UnsupportedConfigFile { path: PathBuf },

    /// The same reader name is declared in more than one file.
    #[snafu(display("Duplicate reader names: {}", keys.join(", ")))]
    DuplicateReaders { keys: Vec<String> },

    /// Multiple configuration errors occurred.
    #[snafu(display("Multiple config errors:\n{}", errors.join("\n")))]
    MultipleErrors { errors: Vec<String> },
}

// ============ Schema Errors ============

/// Errors that can occur while resolving a reader schema.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SchemaError {
    /// Schema path does not exist.
    #[snafu(display("Schema file not found at path {}", path.display()))]
    SchemaFileNotFound { path: PathBuf },

    /// Schema file exists but could not be read.
    #[snafu(display("Failed to read schema file {}: {source}", path.display()))]
    ReadSchemaFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Schema file content is not a valid structural schema.
    #[snafu(display("Failed to deserialize schema from {}: {source}", path.display()))]
    SchemaDeserialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl SchemaError {
    /// Check if this error represents a missing schema file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SchemaError::SchemaFileNotFound { .. })
    }
}

// ============ Reader Errors ============

/// Top-level errors raised while configuring or executing an auto loader.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ReaderError {
    /// Configuration error.
    #[snafu(display("Configuration error: {source}"))]
    Config { source: ConfigError },

    /// Schema resolution error.
    #[snafu(display("Schema error: {source}"))]
    Schema { source: SchemaError },

    /// The streaming engine rejected the read request.
    #[snafu(display("Streaming engine error: {source}"))]
    Engine { source: EngineError },
}

impl From<ConfigError> for ReaderError {
    fn from(source: ConfigError) -> Self {
        ReaderError::Config { source }
    }
}

impl From<SchemaError> for ReaderError {
    fn from(source: SchemaError) -> Self {
        ReaderError::Schema { source }
    }
}
