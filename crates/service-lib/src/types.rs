//! Shared data types for the prediction service

use serde::{Deserialize, Serialize};

/// Number of ranked class probabilities attached to a prediction.
pub const TOP_PREDICTIONS: usize = 5;

/// The enumerated set of servable models.
///
/// Each model has a user-facing display name (accepted in requests) and a
/// filesystem key naming its serialized artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    DecisionTree,
    RandomForest,
    AdaBoost,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::DecisionTree,
        ModelKind::RandomForest,
        ModelKind::AdaBoost,
    ];

    /// Display name used in request payloads and responses.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::DecisionTree => "Decision Tree",
            ModelKind::RandomForest => "Random Forest",
            ModelKind::AdaBoost => "AdaBoost",
        }
    }

    /// Artifact key: the file stem of the serialized model on disk.
    pub fn file_key(&self) -> &'static str {
        match self {
            ModelKind::DecisionTree => "decision_tree",
            ModelKind::RandomForest => "random_forest",
            ModelKind::AdaBoost => "adaboost",
        }
    }

    /// Resolve a display name to a model kind. Exact match only.
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.display_name() == name)
    }

    /// Display names for all servable models, in enumeration order.
    pub fn display_names() -> Vec<String> {
        Self::ALL.iter().map(|k| k.display_name().to_string()).collect()
    }
}

/// Prediction request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    ModelKind::DecisionTree.display_name().to_string()
}

/// One ranked (disease, probability) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPrediction {
    pub disease: String,
    pub probability: f64,
}

/// Prediction response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_disease: String,
    pub top_predictions: Vec<TopPrediction>,
    pub model_used: String,
}

/// Symptom search response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomsResponse {
    pub symptoms: Vec<String>,
}

/// Status payload served by `/health` and the `/` fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    pub available_models: Vec<String>,
    pub symptoms_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Error response body for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Rank a full class distribution and keep the top entries.
///
/// Sorted by probability descending; NaN probabilities sink to the end.
pub fn rank_top_predictions(distribution: Vec<(String, f64)>) -> Vec<TopPrediction> {
    let mut ranked = distribution;
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
        .into_iter()
        .take(TOP_PREDICTIONS)
        .map(|(disease, probability)| TopPrediction {
            disease,
            probability,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_round_trip() {
        for kind in ModelKind::ALL {
            assert_eq!(ModelKind::from_display_name(kind.display_name()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_display_name_rejected() {
        assert_eq!(ModelKind::from_display_name("Not A Real Model"), None);
        // File keys are internal identifiers, not accepted as display names
        assert_eq!(ModelKind::from_display_name("decision_tree"), None);
        assert_eq!(ModelKind::from_display_name("decision tree"), None);
    }

    #[test]
    fn test_request_model_defaults_to_decision_tree() {
        let req: PredictRequest = serde_json::from_str(r#"{"symptoms": ["itching"]}"#).unwrap();
        assert_eq!(req.model, "Decision Tree");
        assert_eq!(req.symptoms, vec!["itching"]);
    }

    #[test]
    fn test_rank_top_predictions_sorts_and_caps() {
        let dist = vec![
            ("Cold".to_string(), 0.1),
            ("Flu".to_string(), 0.4),
            ("Malaria".to_string(), 0.05),
            ("Dengue".to_string(), 0.2),
            ("Typhoid".to_string(), 0.15),
            ("Migraine".to_string(), 0.1),
        ];
        let top = rank_top_predictions(dist);
        assert_eq!(top.len(), TOP_PREDICTIONS);
        assert_eq!(top[0].disease, "Flu");
        for pair in top.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
    }

    #[test]
    fn test_rank_top_predictions_short_distribution() {
        let top = rank_top_predictions(vec![("Flu".to_string(), 1.0)]);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].disease, "Flu");
    }
}
