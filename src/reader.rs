//! The auto loader: a validated streaming read against a storage location.
//!
//! An [`AutoLoader`] is built from an [`AutoLoaderConfig`]. Building validates
//! the format and resolves the schema, so a constructed loader is always ready
//! to execute. [`AutoLoader::execute`] consumes the loader and returns the lazy
//! dataset handle produced by the engine; a loader executes at most once.
//!
//! The auto loader is a streaming source. Downstream transformations must be
//! compatible with streaming execution.
//!
//! # Example
//!
//! ```ignore
//! use autoloader::{AutoLoader, AutoLoaderConfig, AutoLoaderFormat, PlanningEngine};
//!
//! let config = AutoLoaderConfig::new(AutoLoaderFormat::Json, "s3://landing/events", "s3://schemas/events")
//!     .with_option("multiLine", "true");
//! let output = AutoLoader::new(config)?.execute(&PlanningEngine)?;
//! println!("{:?}", output.dataset());
//! ```

use snafu::prelude::*;
use tracing::{debug, info};

use crate::config::AutoLoaderConfig;
use crate::emit;
use crate::engine::{StreamEngine, StreamRequest};
use crate::error::{ConfigSnafu, ReaderError, SchemaSnafu};
use crate::metrics::events::{ReadFailed, ReadStarted, ReaderConfigured};
use crate::options::{ReaderOptions, merge_options};
use crate::schema::{StructType, resolve_schema};
use crate::storage::{LocalFileSystem, SchemaFileSystem};

/// Source type of the engine's managed file ingestion mode.
pub const CLOUD_FILES_SOURCE: &str = "cloudFiles";

/// A configured auto loader, ready to execute.
///
/// Not meant to be shared across threads: build one per read. A loader cannot
/// be cloned, so each one starts at most one read:
///
/// ```compile_fail
/// use autoloader::{AutoLoader, AutoLoaderConfig};
///
/// let loader = AutoLoader::new(AutoLoaderConfig::new("json", "/in", "/schema")).unwrap();
/// let second = loader.clone();
/// ```
#[derive(Debug)]
pub struct AutoLoader {
    format: String,
    location: String,
    schema_location: String,
    options: ReaderOptions,
    schema: Option<StructType>,
}

impl AutoLoader {
    /// Validate `config` and resolve its schema from the local filesystem.
    pub fn new(config: AutoLoaderConfig) -> Result<Self, ReaderError> {
        Self::with_file_system(config, &LocalFileSystem)
    }

    /// Validate `config`, reading schema files through `fs`.
    pub fn with_file_system(
        config: AutoLoaderConfig,
        fs: &dyn SchemaFileSystem,
    ) -> Result<Self, ReaderError> {
        config.validate().context(ConfigSnafu)?;

        let format = config
            .format
            .validate(config.format_validation)
            .context(ConfigSnafu)?;
        let schema = resolve_schema(config.schema.as_ref(), fs).context(SchemaSnafu)?;

        debug!(
            format = %format,
            location = %config.location,
            explicit_schema = schema.is_some(),
            "Auto loader configured"
        );
        emit!(ReaderConfigured {
            format: format.clone(),
        });

        Ok(Self {
            format,
            location: config.location,
            schema_location: config.schema_location,
            options: config.options,
            schema,
        })
    }

    /// Canonical format string.
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn schema_location(&self) -> &str {
        &self.schema_location
    }

    /// Resolved schema, `None` when the engine infers it.
    pub fn schema(&self) -> Option<&StructType> {
        self.schema.as_ref()
    }

    /// Options passed to the engine: the configured options plus
    /// `cloudFiles.format` and `cloudFiles.schemaLocation`.
    pub fn options(&self) -> ReaderOptions {
        merge_options(&self.options, &self.format, &self.schema_location)
    }

    /// Build the engine read request without loading it.
    ///
    /// The schema, when present, is attached before the options are applied.
    pub fn reader<E: StreamEngine>(&self, engine: &E) -> E::Request {
        let mut request = engine.read_stream().format(CLOUD_FILES_SOURCE);
        if let Some(schema) = &self.schema {
            request = request.schema(schema.clone());
        }
        request.options(self.options())
    }

    /// Load the configured location and return the lazy dataset handle.
    ///
    /// Engine failures are returned as [`ReaderError::Engine`] without retry.
    pub fn execute<E: StreamEngine>(
        self,
        engine: &E,
    ) -> Result<AutoLoaderOutput<<E::Request as StreamRequest>::Dataset>, ReaderError> {
        let request = self.reader(engine);

        info!(
            format = %self.format,
            location = %self.location,
            schema_location = %self.schema_location,
            "Starting auto loader read"
        );

        match request.load(&self.location) {
            Ok(dataset) => {
                emit!(ReadStarted {
                    format: self.format,
                });
                Ok(AutoLoaderOutput { dataset })
            }
            Err(e) => {
                emit!(ReadFailed {
                    format: self.format,
                });
                Err(ReaderError::Engine {
                    source: Box::new(e),
                })
            }
        }
    }
}

/// Output of an executed auto loader.
#[derive(Debug, Clone)]
pub struct AutoLoaderOutput<D> {
    dataset: D,
}

impl<D> AutoLoaderOutput<D> {
    /// The lazy dataset handle.
    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn into_dataset(self) -> D {
        self.dataset
    }
}
