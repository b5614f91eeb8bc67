//! Streaming engine interface.
//!
//! The engine that actually discovers and streams files is external. The auto
//! loader only drives its builder-style read request: select the source type,
//! optionally attach a schema, apply options, then load a location into a
//! lazy dataset handle.
//!
//! [`PlanningEngine`] is an in-process engine whose dataset handle is the
//! fully configured [`ReadPlan`]. It backs the CLI and the tests.

use serde::Serialize;
use snafu::prelude::*;

use crate::options::ReaderOptions;
use crate::schema::StructType;

/// A streaming engine able to start read requests.
pub trait StreamEngine {
    type Request: StreamRequest;

    /// Start a new streaming read request.
    fn read_stream(&self) -> Self::Request;
}

/// A builder-style streaming read request.
pub trait StreamRequest: Sized {
    /// Lazy dataset handle produced by [`StreamRequest::load`].
    type Dataset;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Select the source type.
    fn format(self, source: &str) -> Self;

    /// Attach an explicit schema.
    fn schema(self, schema: StructType) -> Self;

    /// Apply reader options.
    fn options(self, options: ReaderOptions) -> Self;

    /// Load the given location into a lazy dataset handle.
    fn load(self, location: &str) -> Result<Self::Dataset, Self::Error>;
}

/// Errors raised by the planning engine.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PlanError {
    /// `load` was called before a source type was selected.
    #[snafu(display("No source type selected for the read request"))]
    MissingSource,

    /// `load` was called with an empty location.
    #[snafu(display("Cannot load an empty location"))]
    EmptyLocation,
}

/// A builder call made against a [`PlanRequest`], in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCall {
    Format,
    Schema,
    Options,
    Load,
}

/// Engine that records read requests instead of executing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanningEngine;

impl StreamEngine for PlanningEngine {
    type Request = PlanRequest;

    fn read_stream(&self) -> PlanRequest {
        PlanRequest::default()
    }
}

/// Read request under construction in a [`PlanningEngine`].
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    source_type: Option<String>,
    schema: Option<StructType>,
    options: ReaderOptions,
    calls: Vec<RequestCall>,
}

impl StreamRequest for PlanRequest {
    type Dataset = ReadPlan;
    type Error = PlanError;

    fn format(mut self, source: &str) -> Self {
        self.source_type = Some(source.to_string());
        self.calls.push(RequestCall::Format);
        self
    }

    fn schema(mut self, schema: StructType) -> Self {
        self.schema = Some(schema);
        self.calls.push(RequestCall::Schema);
        self
    }

    fn options(mut self, options: ReaderOptions) -> Self {
        self.options.extend(options);
        self.calls.push(RequestCall::Options);
        self
    }

    fn load(mut self, location: &str) -> Result<ReadPlan, PlanError> {
        let source_type = self.source_type.context(MissingSourceSnafu)?;
        ensure!(!location.is_empty(), EmptyLocationSnafu);
        self.calls.push(RequestCall::Load);

        Ok(ReadPlan {
            source_type,
            location: location.to_string(),
            schema: self.schema,
            options: self.options,
            calls: self.calls,
        })
    }
}

/// A fully configured, not yet executed streaming read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadPlan {
    pub source_type: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<StructType>,
    pub options: ReaderOptions,
    #[serde(skip)]
    pub calls: Vec<RequestCall>,
}
