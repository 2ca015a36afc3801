//! Symptom vocabulary loading and search
//!
//! The vocabulary is the ordered list of feature columns from the training
//! dataset. It is loaded lazily from the first existing candidate path and
//! cached for the process lifetime. Load failures are soft: the service
//! degrades to an empty vocabulary rather than failing requests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Label column excluded from the vocabulary.
pub const LABEL_COLUMN: &str = "prognosis";

/// Column-name prefix marking a parser artifact (blank header).
const ARTIFACT_PREFIX: &str = "Unnamed";

/// Maximum number of entries returned for a non-empty search query.
pub const SEARCH_LIMIT: usize = 10;

/// Process-wide symptom vocabulary cache.
///
/// Populated at most once; concurrent first access is serialized by the
/// write lock so the dataset is parsed a single time.
pub struct VocabularyStore {
    candidate_paths: Vec<PathBuf>,
    symptoms: RwLock<Option<Arc<Vec<String>>>>,
}

impl VocabularyStore {
    pub fn new(candidate_paths: Vec<PathBuf>) -> Self {
        Self {
            candidate_paths,
            symptoms: RwLock::new(None),
        }
    }

    /// Conventional dataset locations, relative paths first.
    pub fn default_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("dataset/training_data.csv"),
            PathBuf::from("../dataset/training_data.csv"),
            PathBuf::from("/var/task/dataset/training_data.csv"),
        ]
    }

    /// Return the cached vocabulary, loading it on first call.
    ///
    /// Idempotent. On failure (no candidate path exists, or the first
    /// existing path fails to parse) the failure is logged, nothing is
    /// cached, and an empty vocabulary is returned; a later call retries
    /// discovery.
    pub async fn ensure_loaded(&self) -> Arc<Vec<String>> {
        if let Some(symptoms) = self.symptoms.read().await.as_ref() {
            return symptoms.clone();
        }

        let mut guard = self.symptoms.write().await;
        // Another request may have populated the cache while we waited
        if let Some(symptoms) = guard.as_ref() {
            return symptoms.clone();
        }

        for path in &self.candidate_paths {
            if !path.exists() {
                continue;
            }
            // First existing path wins; a parse failure here does not
            // consult later candidates.
            match read_feature_columns(path) {
                Ok(columns) => {
                    info!(
                        path = %path.display(),
                        symptoms = columns.len(),
                        "Loaded symptom vocabulary"
                    );
                    let symptoms = Arc::new(columns);
                    *guard = Some(symptoms.clone());
                    return symptoms;
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Could not load symptoms from dataset"
                    );
                    return Arc::new(Vec::new());
                }
            }
        }

        warn!("No vocabulary dataset found in any candidate path");
        Arc::new(Vec::new())
    }

    /// Whether a vocabulary has been successfully loaded.
    pub async fn is_loaded(&self) -> bool {
        self.symptoms.read().await.is_some()
    }

    /// Search the vocabulary.
    ///
    /// An empty query returns the full vocabulary uncapped. Otherwise a
    /// case-insensitive substring filter, ordered with prefix matches
    /// first (ties broken lexicographically on the lowercased name) and
    /// truncated to [`SEARCH_LIMIT`] entries.
    pub async fn search(&self, query: &str) -> Vec<String> {
        let symptoms = self.ensure_loaded().await;
        let query = query.trim().to_lowercase();

        if query.is_empty() {
            return symptoms.as_ref().clone();
        }

        let mut matches: Vec<&String> = symptoms
            .iter()
            .filter(|s| s.to_lowercase().contains(&query))
            .collect();
        matches.sort_by_key(|s| {
            let lower = s.to_lowercase();
            (!lower.starts_with(&query), lower)
        });
        matches.into_iter().take(SEARCH_LIMIT).cloned().collect()
    }
}

/// Parse the dataset header and keep the feature columns.
///
/// Everything except the label column and parser artifacts, in file order.
fn read_feature_columns(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to open dataset {:?}", path))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read dataset header {:?}", path))?;

    Ok(headers
        .iter()
        .filter(|col| !col.is_empty() && *col != LABEL_COLUMN && !col.starts_with(ARTIFACT_PREFIX))
        .map(|col| col.to_string())
        .collect())
}
