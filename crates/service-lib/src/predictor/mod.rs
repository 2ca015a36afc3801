//! Trained classifier artifacts
//!
//! Models are serde-tagged JSON artifacts produced by an offline training
//! pipeline. This module treats them as opaque predictors: deserialize,
//! then call [`Predictor::predict`] and optionally
//! [`Predictor::predict_proba`].

mod ensemble;
mod tree;

pub use ensemble::{AdaBoostEnsemble, RandomForest};
pub use tree::{DecisionTree, Tree, TreeNode};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full class distribution: (label, probability) pairs in class order.
pub type ClassDistribution = Vec<(String, f64)>;

/// A trained classifier.
pub trait Predictor: Send + Sync {
    /// Predict the class label for a single feature vector.
    fn predict(&self, features: &[f64]) -> Result<String>;

    /// Class probability distribution for a single feature vector.
    ///
    /// `None` means the capability is unavailable or the model state is
    /// internally inconsistent; callers treat that as a soft failure.
    fn predict_proba(&self, features: &[f64]) -> Option<ClassDistribution>;
}

/// Serialized model artifact, one variant per servable model kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum ModelArtifact {
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
    Adaboost(AdaBoostEnsemble),
}

impl ModelArtifact {
    /// Deserialize an artifact from a file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open model file {:?}: {}", path, e))?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| anyhow::anyhow!("Failed to parse model file {:?}: {}", path, e))
    }
}

impl Predictor for ModelArtifact {
    fn predict(&self, features: &[f64]) -> Result<String> {
        match self {
            ModelArtifact::DecisionTree(m) => m.predict(features),
            ModelArtifact::RandomForest(m) => m.predict(features),
            ModelArtifact::Adaboost(m) => m.predict(features),
        }
    }

    fn predict_proba(&self, features: &[f64]) -> Option<ClassDistribution> {
        match self {
            ModelArtifact::DecisionTree(m) => m.predict_proba(features),
            ModelArtifact::RandomForest(m) => m.predict_proba(features),
            ModelArtifact::Adaboost(m) => m.predict_proba(features),
        }
    }
}

/// Argmax over a distribution, resolving ties to the lowest class index.
pub(crate) fn argmax_label(classes: &[String], scores: &[f64]) -> Result<String> {
    if classes.is_empty() || classes.len() != scores.len() {
        anyhow::bail!(
            "Model has {} classes but produced {} scores",
            classes.len(),
            scores.len()
        );
    }
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = i;
        }
    }
    Ok(classes[best].clone())
}
