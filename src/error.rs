//! Error types for the records pipeline.

use thiserror::Error;

/// Faults a pipeline run can surface. Per-row anomalies are absorbed
/// during normalization and never appear here; only a total fetch
/// failure does.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("sheet fetch failed")]
    FetchFailed(#[source] anyhow::Error),
}
