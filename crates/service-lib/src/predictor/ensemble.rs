//! Ensemble classifiers: random forest and AdaBoost
//!
//! Both wrap a set of trees sharing one class list. The forest averages
//! member distributions; the boosted ensemble takes a weighted sum and
//! normalizes it.

use super::{argmax_label, ClassDistribution};
use super::tree::Tree;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Bagged tree ensemble averaging member leaf distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub classes: Vec<String>,
    pub trees: Vec<Tree>,
}

impl RandomForest {
    fn scores(&self, features: &[f64]) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            anyhow::bail!("Random forest has no trees");
        }
        let mut scores = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            accumulate(&mut scores, tree.distribution(features)?, 1.0)?;
        }
        for score in &mut scores {
            *score /= self.trees.len() as f64;
        }
        Ok(scores)
    }

    pub fn predict(&self, features: &[f64]) -> Result<String> {
        let scores = self.scores(features)?;
        argmax_label(&self.classes, &scores)
    }

    pub fn predict_proba(&self, features: &[f64]) -> Option<ClassDistribution> {
        let scores = self.scores(features).ok()?;
        Some(self.classes.iter().cloned().zip(scores).collect())
    }
}

/// Boosted tree ensemble with per-estimator weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaBoostEnsemble {
    pub classes: Vec<String>,
    pub estimators: Vec<Tree>,
    pub weights: Vec<f64>,
}

impl AdaBoostEnsemble {
    fn scores(&self, features: &[f64]) -> Result<Vec<f64>> {
        if self.estimators.is_empty() {
            anyhow::bail!("AdaBoost ensemble has no estimators");
        }
        if self.estimators.len() != self.weights.len() {
            anyhow::bail!(
                "AdaBoost ensemble has {} estimators but {} weights",
                self.estimators.len(),
                self.weights.len()
            );
        }
        let mut scores = vec![0.0; self.classes.len()];
        for (tree, weight) in self.estimators.iter().zip(&self.weights) {
            accumulate(&mut scores, tree.distribution(features)?, *weight)?;
        }
        let total: f64 = scores.iter().sum();
        if total > 0.0 {
            for score in &mut scores {
                *score /= total;
            }
        }
        Ok(scores)
    }

    pub fn predict(&self, features: &[f64]) -> Result<String> {
        let scores = self.scores(features)?;
        argmax_label(&self.classes, &scores)
    }

    pub fn predict_proba(&self, features: &[f64]) -> Option<ClassDistribution> {
        let scores = self.scores(features).ok()?;
        Some(self.classes.iter().cloned().zip(scores).collect())
    }
}

fn accumulate(scores: &mut [f64], distribution: &[f64], weight: f64) -> Result<()> {
    if distribution.len() != scores.len() {
        anyhow::bail!(
            "Member tree produced {} scores, expected {}",
            distribution.len(),
            scores.len()
        );
    }
    for (score, value) in scores.iter_mut().zip(distribution) {
        *score += value * weight;
    }
    Ok(())
}
