//! Error types for the defect-eval library.

use thiserror::Error;

/// Result type for defect-eval operations.
pub type Result<T> = std::result::Result<T, DefectEvalError>;

/// Error types that can occur during detector evaluation.
///
/// Per-image errors (`DetectorInvocation`, `DetectorSpawn`, `AnnotationParse`)
/// are caught by the evaluator and drop only the affected image.
/// Infrastructure errors (`DatasetScan`, `ThreadPool`) abort the run.
#[derive(Error, Debug)]
pub enum DefectEvalError {
    /// Error during I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The external detector process exited with a nonzero status.
    #[error("detector exited with status {code} for {image}")]
    DetectorInvocation { image: String, code: i32 },

    /// The external detector process could not be started.
    #[error("failed to launch detector for {image}: {message}")]
    DetectorSpawn { image: String, message: String },

    /// Malformed or missing ground-truth annotation data.
    #[error("invalid annotation: {0}")]
    AnnotationParse(String),

    /// The dataset directory could not be enumerated.
    #[error("cannot enumerate dataset: {0}")]
    DatasetScan(String),

    /// The worker pool could not be created.
    #[error("worker pool error: {0}")]
    ThreadPool(String),
}
