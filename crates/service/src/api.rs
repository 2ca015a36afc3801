//! HTTP API for disease predictions, symptom search, and health checks

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use service_lib::{
    encoder, rank_top_predictions, ErrorResponse, ModelKind, ModelStore, PredictRequest,
    PredictResponse, PredictionError, Predictor, ServiceMetrics, StatusResponse, StructuredLogger,
    SymptomsResponse, VocabularyStore,
};

/// Shared application state
pub struct AppState {
    pub vocabulary: VocabularyStore,
    pub models: ModelStore,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
    pub frontend_path: PathBuf,
}

/// Error wrapper mapping pipeline failures onto HTTP responses.
///
/// Validation errors map to 400, loading and prediction failures to 500;
/// the body is always `{"error": "<cause>"}`, never a stack trace.
pub enum ApiError {
    Prediction(PredictionError),
    Internal(anyhow::Error),
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        ApiError::Prediction(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Prediction(e) if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Prediction(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error making prediction: {}", e),
            ),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

fn status_payload(symptoms_loaded: bool, note: Option<String>) -> StatusResponse {
    StatusResponse {
        status: "ok".to_string(),
        message: "ML Service is running".to_string(),
        available_models: ModelKind::display_names(),
        symptoms_loaded,
        note,
    }
}

/// Root endpoint: static frontend if present, status payload otherwise.
/// Never errors, always 200.
async fn root(State(state): State<Arc<AppState>>) -> Response {
    match tokio::fs::read_to_string(&state.frontend_path).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => {
            let loaded = state.vocabulary.is_loaded().await;
            Json(status_payload(
                loaded,
                Some("Frontend not found. API endpoints available at /api/*".to_string()),
            ))
            .into_response()
        }
    }
}

/// Health check endpoint. Never errors, always 200.
async fn health(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let loaded = state.vocabulary.is_loaded().await;
    Json(status_payload(loaded, None))
}

#[derive(Debug, Deserialize)]
struct SymptomsQuery {
    #[serde(default)]
    query: String,
}

/// Symptom search endpoint. Never errors; an unloadable vocabulary
/// degrades to an empty list.
async fn symptoms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SymptomsQuery>,
) -> Json<SymptomsResponse> {
    state.metrics.inc_symptom_searches();
    let symptoms = state.vocabulary.search(&params.query).await;
    Json(SymptomsResponse { symptoms })
}

/// Prediction endpoint
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let start = Instant::now();

    let result = run_prediction(&state, &request).await;
    match &result {
        Ok(response) => {
            let latency = start.elapsed().as_secs_f64();
            state.metrics.inc_predictions(&response.model_used);
            state.metrics.observe_prediction_latency(latency);
            state.logger.log_prediction(
                &response.model_used,
                &response.predicted_disease,
                request.symptoms.len(),
                response.top_predictions.len(),
                latency,
            );
        }
        Err(_) => state.metrics.inc_prediction_errors(),
    }

    result.map(Json)
}

async fn run_prediction(
    state: &AppState,
    request: &PredictRequest,
) -> Result<PredictResponse, ApiError> {
    if request.symptoms.is_empty() {
        return Err(PredictionError::EmptySelection.into());
    }

    let kind = ModelKind::from_display_name(&request.model)
        .ok_or(PredictionError::InvalidModel)?;

    let model = state.models.get(kind).await?;

    let vocabulary = state.vocabulary.ensure_loaded().await;
    state.metrics.set_vocabulary_size(vocabulary.len() as i64);

    let features = encoder::encode(&request.symptoms, &vocabulary);
    let predicted_disease = model.predict(&features)?;

    // Probability ranking is best-effort; a model without the capability
    // yields an empty list, never a request error.
    let top_predictions = model
        .predict_proba(&features)
        .map(rank_top_predictions)
        .unwrap_or_default();

    Ok(PredictResponse {
        predicted_disease,
        top_predictions,
        model_used: kind.display_name().to_string(),
    })
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/symptoms", get(symptoms))
        .route("/api/predict", post(predict))
        .route("/metrics", get(metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
