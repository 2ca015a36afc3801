//! Integration tests for the prediction service API endpoints

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tempfile::TempDir;
use tower::ServiceExt;

use service_lib::{
    predictor::{AdaBoostEnsemble, DecisionTree, ModelArtifact, RandomForest, Tree, TreeNode},
    ModelKind, ModelStore, ServiceMetrics, StructuredLogger, VocabularyStore,
};

#[path = "../src/api.rs"]
#[allow(dead_code)]
mod api;

use api::AppState;

/// Vocabulary: itching, fatigue, fast_heart_rate (label column last)
const DATASET_HEADER: &str = "itching,fatigue,fast_heart_rate,prognosis\n";

fn stump(feature: usize, left: Vec<f64>, right: Vec<f64>) -> Tree {
    Tree {
        nodes: vec![
            TreeNode::Split {
                feature,
                threshold: 0.5,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { distribution: left },
            TreeNode::Leaf {
                distribution: right,
            },
        ],
    }
}

fn classes() -> Vec<String> {
    vec![
        "Allergy".to_string(),
        "Heart Attack".to_string(),
        "Chronic Fatigue".to_string(),
    ]
}

/// Write one artifact per servable model under `dir`.
///
/// All of them key off feature 2 (fast_heart_rate): set → Heart Attack,
/// unset → Allergy.
fn write_artifacts(dir: &Path) {
    let tree = ModelArtifact::DecisionTree(DecisionTree {
        classes: classes(),
        tree: stump(2, vec![0.7, 0.1, 0.2], vec![0.1, 0.8, 0.1]),
    });
    let forest = ModelArtifact::RandomForest(RandomForest {
        classes: classes(),
        trees: vec![
            stump(2, vec![0.7, 0.1, 0.2], vec![0.1, 0.8, 0.1]),
            stump(2, vec![0.9, 0.0, 0.1], vec![0.0, 1.0, 0.0]),
        ],
    });
    let boost = ModelArtifact::Adaboost(AdaBoostEnsemble {
        classes: classes(),
        estimators: vec![
            stump(2, vec![0.7, 0.1, 0.2], vec![0.1, 0.8, 0.1]),
            stump(2, vec![0.6, 0.2, 0.2], vec![0.2, 0.7, 0.1]),
        ],
        weights: vec![1.0, 0.5],
    });

    for (kind, artifact) in [
        (ModelKind::DecisionTree, &tree),
        (ModelKind::RandomForest, &forest),
        (ModelKind::AdaBoost, &boost),
    ] {
        fs::write(
            dir.join(format!("{}.json", kind.file_key())),
            serde_json::to_string(artifact).unwrap(),
        )
        .unwrap();
    }
}

struct TestService {
    app: Router,
    #[allow(dead_code)]
    dir: TempDir,
}

fn setup(with_dataset: bool, with_models: bool) -> TestService {
    let dir = TempDir::new().unwrap();

    let dataset_path = dir.path().join("training_data.csv");
    if with_dataset {
        fs::write(&dataset_path, DATASET_HEADER).unwrap();
    }

    let model_dir = dir.path().join("saved_model");
    fs::create_dir(&model_dir).unwrap();
    if with_models {
        write_artifacts(&model_dir);
    }

    let state = Arc::new(AppState {
        vocabulary: VocabularyStore::new(vec![dataset_path]),
        models: ModelStore::new(vec![model_dir], None).unwrap(),
        metrics: ServiceMetrics::new(),
        logger: StructuredLogger::new("test-service"),
        frontend_path: dir.path().join("public").join("index.html"),
    });

    TestService {
        app: api::create_router(state),
        dir,
    }
}

async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_predict(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_reports_models_and_vocabulary() {
    let svc = setup(true, false);

    let (status, body) = get(svc.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["available_models"],
        serde_json::json!(["Decision Tree", "Random Forest", "AdaBoost"])
    );
    // Vocabulary loads lazily; nothing touched it yet
    assert_eq!(body["symptoms_loaded"], false);
}

#[tokio::test]
async fn test_health_after_vocabulary_load() {
    let svc = setup(true, false);

    // A symptom search forces the vocabulary load
    let (_, _) = get(svc.app.clone(), "/api/symptoms").await;
    let (status, body) = get(svc.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symptoms_loaded"], true);
}

#[tokio::test]
async fn test_root_falls_back_to_status_payload() {
    let svc = setup(true, false);

    let (status, body) = get(svc.app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["note"].as_str().unwrap().contains("Frontend not found"));
}

#[tokio::test]
async fn test_root_serves_frontend_when_present() {
    let svc = setup(true, false);
    let public = svc.dir.path().join("public");
    fs::create_dir(&public).unwrap();
    fs::write(public.join("index.html"), "<html><body>sympred</body></html>").unwrap();

    let response = svc
        .app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("sympred"));
}

#[tokio::test]
async fn test_symptoms_empty_query_returns_full_vocabulary() {
    let svc = setup(true, false);

    let (status, body) = get(svc.app, "/api/symptoms").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["symptoms"],
        serde_json::json!(["itching", "fatigue", "fast_heart_rate"])
    );
}

#[tokio::test]
async fn test_symptoms_query_ranks_prefix_matches_first() {
    let svc = setup(true, false);

    let (status, body) = get(svc.app, "/api/symptoms?query=fa").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["symptoms"],
        serde_json::json!(["fast_heart_rate", "fatigue"])
    );
}

#[tokio::test]
async fn test_symptoms_without_dataset_degrades_to_empty() {
    let svc = setup(false, false);

    let (status, body) = get(svc.app, "/api/symptoms?query=itch").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symptoms"], serde_json::json!([]));
}

#[tokio::test]
async fn test_predict_returns_label_and_ranked_distribution() {
    let svc = setup(true, true);

    let (status, body) = post_predict(
        svc.app,
        serde_json::json!({
            "symptoms": ["fast_heart_rate"],
            "model": "Decision Tree"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_disease"], "Heart Attack");
    assert_eq!(body["model_used"], "Decision Tree");

    let top = body["top_predictions"].as_array().unwrap();
    assert!(top.len() <= 5);
    assert_eq!(top[0]["disease"], "Heart Attack");
    let probs: Vec<f64> = top
        .iter()
        .map(|p| p["probability"].as_f64().unwrap())
        .collect();
    for pair in probs.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn test_predict_each_model_returns_known_label() {
    for model in ["Decision Tree", "Random Forest", "AdaBoost"] {
        let svc = setup(true, true);
        let (status, body) = post_predict(
            svc.app,
            serde_json::json!({"symptoms": ["itching"], "model": model}),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "model {model}");
        assert_eq!(body["model_used"], model);
        let label = body["predicted_disease"].as_str().unwrap();
        assert!(
            classes().iter().any(|c| c == label),
            "label {label} not in class set"
        );
    }
}

#[tokio::test]
async fn test_predict_unknown_symptoms_are_ignored() {
    let svc = setup(true, true);

    // An unknown name encodes to the all-zero vector path
    let (status, body) = post_predict(
        svc.app,
        serde_json::json!({"symptoms": ["not_a_symptom"], "model": "Decision Tree"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_disease"], "Allergy");
}

#[tokio::test]
async fn test_predict_model_defaults_to_decision_tree() {
    let svc = setup(true, true);

    let (status, body) =
        post_predict(svc.app, serde_json::json!({"symptoms": ["fatigue"]})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_used"], "Decision Tree");
}

#[tokio::test]
async fn test_predict_empty_symptoms_is_bad_request() {
    let svc = setup(true, true);

    let (status, body) = post_predict(
        svc.app,
        serde_json::json!({"symptoms": [], "model": "Decision Tree"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Please select at least one symptom to get a prediction."
    );
}

#[tokio::test]
async fn test_predict_invalid_model_is_bad_request() {
    let svc = setup(true, true);

    let (status, body) = post_predict(
        svc.app,
        serde_json::json!({"symptoms": ["itching"], "model": "Not A Real Model"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid model selection.");
}

#[tokio::test]
async fn test_predict_missing_artifact_is_server_error() {
    let svc = setup(true, false);

    let (status, body) = post_predict(
        svc.app,
        serde_json::json!({"symptoms": ["itching"], "model": "Decision Tree"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Model file not found: decision_tree.json");
}

#[tokio::test]
async fn test_predict_corrupt_artifact_is_server_error() {
    let svc = setup(true, false);
    fs::write(
        svc.dir.path().join("saved_model").join("adaboost.json"),
        "not json",
    )
    .unwrap();

    let (status, body) = post_predict(
        svc.app,
        serde_json::json!({"symptoms": ["itching"], "model": "AdaBoost"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Error loading model:"));
}

#[tokio::test]
async fn test_predict_without_vocabulary_still_serves() {
    // No dataset: the feature vector is empty and the tree walks its
    // zero branch; the vocabulary failure must stay soft.
    let svc = setup(false, true);

    let (status, body) = post_predict(
        svc.app,
        serde_json::json!({"symptoms": ["fast_heart_rate"], "model": "Decision Tree"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_disease"], "Allergy");
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let svc = setup(true, true);

    // Serve one prediction so the counters exist
    let (_, _) = post_predict(
        svc.app.clone(),
        serde_json::json!({"symptoms": ["itching"], "model": "Decision Tree"}),
    )
    .await;

    let response = svc
        .app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("prediction_service_predictions_total"));
    assert!(metrics_text.contains("prediction_service_prediction_latency_seconds_bucket"));
}

#[tokio::test]
async fn test_cors_headers_are_present() {
    let svc = setup(true, false);

    let response = svc
        .app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
