//! Service configuration

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration
///
/// Every field is environment-overridable through the `config` crate's
/// environment source; `PORT` and `MODEL_BASE_URL` are the two variables
/// a deployment is expected to set.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional base URL for downloading model artifacts absent locally
    #[serde(default)]
    pub model_base_url: Option<String>,

    /// Candidate locations of the training dataset, tried in order
    #[serde(default = "default_dataset_paths")]
    pub dataset_paths: Vec<PathBuf>,

    /// Candidate directories holding model artifacts, tried in order
    #[serde(default = "default_model_dirs")]
    pub model_dirs: Vec<PathBuf>,

    /// Static frontend served on `/` when present
    #[serde(default = "default_frontend_path")]
    pub frontend_path: PathBuf,
}

fn default_port() -> u16 {
    5000
}

fn default_dataset_paths() -> Vec<PathBuf> {
    service_lib::VocabularyStore::default_paths()
}

fn default_model_dirs() -> Vec<PathBuf> {
    service_lib::ModelStore::default_search_dirs()
}

fn default_frontend_path() -> PathBuf {
    PathBuf::from("public/index.html")
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            model_base_url: std::env::var("MODEL_BASE_URL").ok(),
            dataset_paths: default_dataset_paths(),
            model_dirs: default_model_dirs(),
            frontend_path: default_frontend_path(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}
