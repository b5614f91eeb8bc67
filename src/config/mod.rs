//! Configuration for auto loader readers.
//!
//! Readers are declared by name in YAML files:
//!
//! ```yaml
//! readers:
//!   events:
//!     format: json
//!     location: s3://landing/events
//!     schemaLocation: s3://checkpoints/events/schema
//!     options:
//!       multiLine: "true"
//!     schema: /etc/autoloader/events.schema.json
//! ```
//!
//! Environment variables are interpolated before parsing (see [`interpolate`]).

mod loader;
mod path;
mod vars;

pub use loader::{is_yaml_file, load_from_paths};
pub use path::{CliArgs, ConfigPath};
pub use vars::{interpolate, interpolate_with};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;
use std::path::Path;

use crate::error::{
    ConfigError, EmptyLocationSnafu, EmptySchemaLocationSnafu, InvalidReaderSnafu, NoReadersSnafu,
    ReadFileSnafu, YamlParseSnafu,
};
use crate::format::{FormatSpec, FormatValidation};
use crate::options::ReaderOptions;
use crate::schema::SchemaSpec;

/// Name of a reader in the configuration.
#[derive(Debug, Clone, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReaderKey(String);

impl ReaderKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inputs for a single auto loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutoLoaderConfig {
    /// File format, used in `cloudFiles.format`. Case-insensitive.
    pub format: FormatSpec,
    /// Location of the source files.
    pub location: String,
    /// Location for the inferred schema and its evolution history, used in
    /// `cloudFiles.schemaLocation`.
    #[serde(alias = "schemaLocation")]
    pub schema_location: String,
    /// Extra options passed to the engine as-is.
    #[serde(default)]
    pub options: ReaderOptions,
    /// Explicit schema, inline or as a path to a JSON schema file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaSpec>,
    /// How unrecognized formats are handled.
    #[serde(default)]
    pub format_validation: FormatValidation,
}

impl AutoLoaderConfig {
    pub fn new(
        format: impl Into<FormatSpec>,
        location: impl Into<String>,
        schema_location: impl Into<String>,
    ) -> Self {
        Self {
            format: format.into(),
            location: location.into(),
            schema_location: schema_location.into(),
            options: ReaderOptions::new(),
            schema: None,
            format_validation: FormatValidation::default(),
        }
    }

    pub fn with_options<K, V>(mut self, options: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<SchemaSpec>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_format_validation(mut self, policy: FormatValidation) -> Self {
        self.format_validation = policy;
        self
    }

    /// Check the required locations. Format and schema are checked when the
    /// reader is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(!self.location.is_empty(), EmptyLocationSnafu);
        ensure!(!self.schema_location.is_empty(), EmptySchemaLocationSnafu);
        Ok(())
    }
}

/// Top-level configuration: a set of named readers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    readers: IndexMap<ReaderKey, AutoLoaderConfig>,
}

impl Config {
    /// Load configuration from a single file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        Self::parse(&contents)
    }

    /// Load and merge configuration from files and directories.
    pub fn from_paths(paths: &[ConfigPath]) -> Result<Self, ConfigError> {
        let config = load_from_paths(paths)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config = Self::parse_unvalidated(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Interpolate and parse without validating, for merging partial files.
    pub(crate) fn parse_unvalidated(contents: &str) -> Result<Self, ConfigError> {
        let text = interpolate(contents)?;
        serde_yaml::from_str(&text).context(YamlParseSnafu)
    }

    /// Validate every reader.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(!self.readers.is_empty(), NoReadersSnafu);
        for (key, reader) in &self.readers {
            reader.validate().context(InvalidReaderSnafu {
                reader: key.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn readers(&self) -> impl Iterator<Item = (&ReaderKey, &AutoLoaderConfig)> {
        self.readers.iter()
    }

    pub fn reader(&self, key: &str) -> Option<&AutoLoaderConfig> {
        self.readers.get(&ReaderKey::new(key))
    }

    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    /// Add readers from `other`. Fails if a reader name exists in both.
    pub fn merge(&mut self, other: Self) -> Result<(), ConfigError> {
        let duplicates: Vec<String> = other
            .readers
            .keys()
            .filter(|key| self.readers.contains_key(*key))
            .map(ToString::to_string)
            .collect();

        if !duplicates.is_empty() {
            return Err(ConfigError::DuplicateReaders { keys: duplicates });
        }

        self.readers.extend(other.readers);
        Ok(())
    }

    pub fn insert(&mut self, key: ReaderKey, reader: AutoLoaderConfig) {
        self.readers.insert(key, reader);
    }
}
