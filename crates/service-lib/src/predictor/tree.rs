//! Decision tree evaluation
//!
//! Trees are stored as flat node arrays. Evaluation walks from the root:
//! at a split, `features[feature] <= threshold` goes left, otherwise
//! right; a leaf carries the class probability distribution.

use super::{argmax_label, ClassDistribution};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One node of a flattened decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

/// A flattened decision tree; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk the tree and return the leaf distribution for `features`.
    ///
    /// Feature indices beyond the vector length read as 0.0, so a vector
    /// encoded against a shorter vocabulary still evaluates.
    pub fn distribution(&self, features: &[f64]) -> Result<&[f64]> {
        let mut index = 0;
        // Each hop moves to a child, so the node count bounds the walk and
        // a malformed cyclic tree cannot loop forever.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    index = if value <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { distribution }) => return Ok(distribution),
                None => anyhow::bail!("Tree references missing node {}", index),
            }
        }
        anyhow::bail!("Tree walk did not reach a leaf")
    }
}

/// A standalone decision tree classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub classes: Vec<String>,
    pub tree: Tree,
}

impl DecisionTree {
    pub fn predict(&self, features: &[f64]) -> Result<String> {
        let distribution = self.tree.distribution(features)?;
        argmax_label(&self.classes, distribution)
    }

    pub fn predict_proba(&self, features: &[f64]) -> Option<ClassDistribution> {
        let distribution = self.tree.distribution(features).ok()?;
        if distribution.len() != self.classes.len() {
            return None;
        }
        Some(
            self.classes
                .iter()
                .cloned()
                .zip(distribution.iter().copied())
                .collect(),
        )
    }
}
