//! Error taxonomy for the prediction service

use thiserror::Error;

/// Errors surfaced by the prediction pipeline.
///
/// Validation failures are client errors; everything else is a server-side
/// loading failure. Vocabulary unavailability is deliberately absent: a
/// missing vocabulary degrades to an empty symptom list and all-zero
/// feature vectors, it never fails a request.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Please select at least one symptom to get a prediction.")]
    EmptySelection,

    #[error("Invalid model selection.")]
    InvalidModel,

    #[error("Model file not found: {0}.json")]
    ModelNotFound(String),

    #[error("Error loading model: {0}")]
    ModelLoad(String),

    #[error("Error downloading model: {0}")]
    ModelDownload(String),
}

impl PredictionError {
    /// True for errors detected by request validation, before any I/O.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictionError::EmptySelection | PredictionError::InvalidModel
        )
    }
}
