//! Core library for the symptom-based disease prediction service
//!
//! This crate provides:
//! - Symptom vocabulary loading and search
//! - Cached model artifact loading with a remote-download fallback
//! - One-hot feature encoding
//! - Tree, forest, and boosting predictors
//! - Metrics and structured logging

pub mod encoder;
pub mod error;
pub mod observability;
pub mod predictor;
pub mod store;
pub mod types;
pub mod vocabulary;

pub use error::PredictionError;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::{ModelArtifact, Predictor};
pub use store::ModelStore;
pub use types::*;
pub use vocabulary::VocabularyStore;
