use std::path::PathBuf;

/// Failure of a conversion run.
///
/// A missing input is reported separately so that callers can tell a typo on the
/// command line apart from a broken extract or a GDAL failure.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
