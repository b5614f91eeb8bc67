//! autoloader: configure and launch managed streaming file-ingestion readers.
//!
//! An auto loader watches a storage location for new files and produces a
//! continuously updating dataset. This crate owns the configuration step that
//! precedes streaming:
//!
//! - `format`: validation and canonicalization of the file format
//! - `schema`: structural schemas and their resolution from inline values or files
//! - `options`: merging caller options with the derived `cloudFiles.*` options
//! - `reader`: the [`AutoLoader`] itself, which drives a [`StreamEngine`]
//!
//! The streaming engine is external and abstracted by the traits in `engine`.
//!
//! # Example
//!
//! ```ignore
//! use autoloader::{AutoLoader, AutoLoaderConfig, PlanningEngine};
//!
//! let config = AutoLoaderConfig::new("CSV", "s3://bucket/in", "s3://bucket/schema")
//!     .with_option("multiLine", "true");
//! let plan = AutoLoader::new(config)?.execute(&PlanningEngine)?.into_dataset();
//! assert_eq!(plan.options["cloudFiles.format"], "csv");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod metrics;
pub mod options;
pub mod reader;
pub mod schema;
pub mod storage;
pub mod tracing;

// Re-export main types
pub use config::{AutoLoaderConfig, CliArgs, Config, ConfigPath, ReaderKey};
pub use engine::{PlanningEngine, ReadPlan, StreamEngine, StreamRequest};
pub use error::{ConfigError, ReaderError, SchemaError};
pub use format::{AutoLoaderFormat, FormatSpec, FormatValidation, validate_format};
pub use options::{FORMAT_OPTION, ReaderOptions, SCHEMA_LOCATION_OPTION, merge_options};
pub use reader::{AutoLoader, AutoLoaderOutput, CLOUD_FILES_SOURCE};
pub use schema::{DataType, SchemaSpec, StructField, StructType, resolve_schema};
pub use storage::{LocalFileSystem, SchemaFileSystem};
pub use self::tracing::init_tracing;
