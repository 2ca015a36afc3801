//! Model artifact store
//!
//! Resolves a model kind to a deserialized predictor, trying an ordered
//! list of local directories first and an optional remote base URL second.
//! Each model is loaded at most once per process; concurrent first access
//! is collapsed to a single load by a per-key lock.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};
use url::Url;

use crate::error::PredictionError;
use crate::predictor::ModelArtifact;
use crate::types::ModelKind;

/// File extension of serialized model artifacts.
pub const ARTIFACT_EXT: &str = "json";

/// Timeout for remote artifact downloads.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Process-wide model cache with lazy, at-most-once loading.
pub struct ModelStore {
    search_dirs: Vec<PathBuf>,
    base_url: Option<String>,
    http: reqwest::Client,
    cache: DashMap<ModelKind, Arc<ModelArtifact>>,
    load_locks: DashMap<ModelKind, Arc<Mutex<()>>>,
    loads: AtomicU64,
}

impl ModelStore {
    /// Create a store over the given local directories and optional remote
    /// base URL. The base URL is validated up front so a misconfigured
    /// environment fails at startup, not on the first cold request.
    pub fn new(search_dirs: Vec<PathBuf>, base_url: Option<String>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) if !url.trim().is_empty() => {
                Url::parse(&url).with_context(|| format!("Invalid model base URL {:?}", url))?;
                Some(url)
            }
            _ => None,
        };

        let http = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            search_dirs,
            base_url,
            http,
            cache: DashMap::new(),
            load_locks: DashMap::new(),
            loads: AtomicU64::new(0),
        })
    }

    /// Conventional artifact locations, relative paths first.
    pub fn default_search_dirs() -> Vec<PathBuf> {
        vec![
            PathBuf::from("saved_model"),
            PathBuf::from("../saved_model"),
            PathBuf::from("/var/task/saved_model"),
        ]
    }

    /// Number of artifact deserializations performed so far.
    ///
    /// Stays at one per model kind for the process lifetime; tests use it
    /// to observe caching and single-flight behavior.
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    /// Get the predictor for a model kind, loading it on first call.
    pub async fn get(&self, kind: ModelKind) -> Result<Arc<ModelArtifact>, PredictionError> {
        if let Some(model) = self.cache.get(&kind) {
            return Ok(model.clone());
        }

        let lock = self
            .load_locks
            .entry(kind)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // A concurrent caller may have finished the load while we waited
        if let Some(model) = self.cache.get(&kind) {
            return Ok(model.clone());
        }

        let artifact = self.load(kind).await?;
        self.loads.fetch_add(1, Ordering::Relaxed);
        let model = Arc::new(artifact);
        self.cache.insert(kind, model.clone());
        info!(model = kind.file_key(), "Model loaded and cached");
        Ok(model)
    }

    async fn load(&self, kind: ModelKind) -> Result<ModelArtifact, PredictionError> {
        let file_name = format!("{}.{}", kind.file_key(), ARTIFACT_EXT);

        for dir in &self.search_dirs {
            let path = dir.join(&file_name);
            if path.exists() {
                // First existing path wins. A found-but-corrupt file
                // short-circuits the chain: later directories and the
                // remote fallback are not consulted.
                return ModelArtifact::from_path(&path).map_err(|e| {
                    warn!(path = %path.display(), error = %e, "Failed to load model artifact");
                    PredictionError::ModelLoad(e.to_string())
                });
            }
        }

        if let Some(base_url) = &self.base_url {
            return self.download(base_url, &file_name).await;
        }

        Err(PredictionError::ModelNotFound(kind.file_key().to_string()))
    }

    /// Download an artifact to a scoped temporary file and deserialize it.
    ///
    /// The temp file is removed when it drops, on success and on every
    /// failure path.
    async fn download(
        &self,
        base_url: &str,
        file_name: &str,
    ) -> Result<ModelArtifact, PredictionError> {
        let url = format!("{}/{}", base_url.trim_end_matches('/'), file_name);
        info!(url = %url, "Downloading model artifact");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PredictionError::ModelDownload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PredictionError::ModelDownload(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PredictionError::ModelDownload(e.to_string()))?;

        let tmp = tempfile::NamedTempFile::new()
            .map_err(|e| PredictionError::ModelDownload(e.to_string()))?;
        std::fs::write(tmp.path(), &bytes)
            .map_err(|e| PredictionError::ModelDownload(e.to_string()))?;

        ModelArtifact::from_path(tmp.path())
            .map_err(|e| PredictionError::ModelDownload(e.to_string()))
    }
}
