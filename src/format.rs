//! File formats understood by the auto loader.
//!
//! The canonical form of a format is its lowercase name, which is what the
//! streaming engine expects under `cloudFiles.format`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The file format, used in `cloudFiles.format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoLoaderFormat {
    Json,
    Csv,
    Parquet,
    Avro,
    Orc,
    Text,
    BinaryFile,
}

impl AutoLoaderFormat {
    /// All supported formats.
    pub const ALL: [AutoLoaderFormat; 7] = [
        AutoLoaderFormat::Json,
        AutoLoaderFormat::Csv,
        AutoLoaderFormat::Parquet,
        AutoLoaderFormat::Avro,
        AutoLoaderFormat::Orc,
        AutoLoaderFormat::Text,
        AutoLoaderFormat::BinaryFile,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoLoaderFormat::Json => "json",
            AutoLoaderFormat::Csv => "csv",
            AutoLoaderFormat::Parquet => "parquet",
            AutoLoaderFormat::Avro => "avro",
            AutoLoaderFormat::Orc => "orc",
            AutoLoaderFormat::Text => "text",
            AutoLoaderFormat::BinaryFile => "binaryfile",
        }
    }

    /// Case-insensitive lookup. Whitespace is significant.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for AutoLoaderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutoLoaderFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigError::UnsupportedFormat {
            format: s.to_string(),
        })
    }
}

/// How unrecognized format strings are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatValidation {
    /// Pass unknown formats through unchanged and let the engine reject them.
    #[default]
    Passthrough,
    /// Reject unknown formats at configuration time.
    Strict,
}

/// A configured format: either a known format or an arbitrary string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSpec {
    Known(AutoLoaderFormat),
    Other(String),
}

impl FormatSpec {
    /// Produce the canonical string passed to the engine.
    ///
    /// Known formats map to their lowercase name. Unknown strings are kept
    /// verbatim under [`FormatValidation::Passthrough`] and rejected with
    /// [`ConfigError::UnsupportedFormat`] under [`FormatValidation::Strict`].
    pub fn validate(&self, policy: FormatValidation) -> Result<String, ConfigError> {
        match (self, policy) {
            (FormatSpec::Known(format), _) => Ok(format.as_str().to_string()),
            (FormatSpec::Other(raw), FormatValidation::Passthrough) => Ok(raw.clone()),
            (FormatSpec::Other(raw), FormatValidation::Strict) => {
                Err(ConfigError::UnsupportedFormat {
                    format: raw.clone(),
                })
            }
        }
    }
}

impl From<AutoLoaderFormat> for FormatSpec {
    fn from(format: AutoLoaderFormat) -> Self {
        FormatSpec::Known(format)
    }
}

impl From<&str> for FormatSpec {
    fn from(raw: &str) -> Self {
        match AutoLoaderFormat::parse(raw) {
            Some(format) => FormatSpec::Known(format),
            None => FormatSpec::Other(raw.to_string()),
        }
    }
}

impl From<String> for FormatSpec {
    fn from(raw: String) -> Self {
        match AutoLoaderFormat::parse(&raw) {
            Some(format) => FormatSpec::Known(format),
            None => FormatSpec::Other(raw),
        }
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSpec::Known(format) => write!(f, "{format}"),
            FormatSpec::Other(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for FormatSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FormatSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FormatSpec::from(raw))
    }
}

/// Validate a format under the given policy.
///
/// Shorthand for [`FormatSpec::validate`] that accepts anything convertible
/// into a [`FormatSpec`].
pub fn validate_format(
    format: impl Into<FormatSpec>,
    policy: FormatValidation,
) -> Result<String, ConfigError> {
    format.into().validate(policy)
}
