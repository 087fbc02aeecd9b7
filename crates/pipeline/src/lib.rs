//! # eptfetch Pipeline
//!
//! Typed construction and execution of the point-cloud processing chain.
//!
//! This crate provides:
//! - `Stage` / `PipelineDescription`: a tagged-variant stage sequence
//!   validated at construction time
//! - `build_fetch_pipeline`: the fixed eight-stage fetch chain
//! - `PipelineExecutor`: the external-runner boundary, with a PDAL CLI
//!   implementation
//! - `fetch_elevation`: one-shot orchestration from polygon to elevations

pub mod builder;
pub mod description;
pub mod elevation;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod stage;

pub use builder::{build_fetch_pipeline, OutputPaths, RasterOptions, STAGE_TAGS};
pub use description::PipelineDescription;
pub use elevation::{read_elevations, ElevationPoint, ElevationTable};
pub use error::{PipelineError, Result};
pub use executor::{ExecutionReport, PdalCliExecutor, PipelineExecutor};
pub use fetch::{fetch_elevation, plan_fetch, FetchOutcome, FetchRequest};
pub use stage::Stage;
