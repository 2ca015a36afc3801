//! Deployment validation command
//!
//! Probes a running service end to end: health, vocabulary, and a test
//! prediction against every enumerated model. Prints one line per check
//! and returns the number of failures.

use crate::client::{ApiClient, PredictRequest, PredictResponse, StatusResponse, SymptomsResponse};
use crate::output::{print_error, print_success, print_warning};

/// Run all deployment checks and return the number of critical issues
pub async fn run_checks(client: &ApiClient) -> usize {
    let mut issues = 0;
    let mut warnings = 0;

    println!("\nPrediction Service Deployment Check\n");

    // Service reachable and healthy
    let status: Option<StatusResponse> = match client.get("health").await {
        Ok(status) => {
            print_success("Service is reachable");
            Some(status)
        }
        Err(e) => {
            print_error(&format!("Service is NOT reachable: {}", e));
            issues += 1;
            None
        }
    };

    // Vocabulary loaded
    let sample_symptom = match client.get::<SymptomsResponse>("api/symptoms").await {
        Ok(result) if !result.symptoms.is_empty() => {
            print_success(&format!(
                "Symptom vocabulary loaded ({} symptoms)",
                result.symptoms.len()
            ));
            result.symptoms.into_iter().next()
        }
        Ok(_) => {
            print_warning("Symptom vocabulary is empty (dataset not found?)");
            warnings += 1;
            None
        }
        Err(e) => {
            print_error(&format!("Could not query symptoms: {}", e));
            issues += 1;
            None
        }
    };

    // One test prediction per enumerated model
    if let (Some(status), Some(symptom)) = (&status, &sample_symptom) {
        for model in &status.available_models {
            let request = PredictRequest {
                symptoms: vec![symptom.clone()],
                model: model.clone(),
            };
            match client.post::<PredictResponse, _>("api/predict", &request).await {
                Ok(response) => {
                    print_success(&format!(
                        "{} predicts: {}",
                        model, response.predicted_disease
                    ));
                }
                Err(e) => {
                    print_error(&format!("{} failed: {}", model, e));
                    issues += 1;
                }
            }
        }
    } else if status.is_some() {
        print_warning("Skipping model checks without a sample symptom");
        warnings += 1;
    }

    // Summary
    println!();
    if issues == 0 && warnings == 0 {
        print_success("All checks passed. Deployment looks ready.");
    } else if issues == 0 {
        print_warning(&format!("No critical issues, {} warning(s)", warnings));
    } else {
        print_error(&format!(
            "Found {} critical issue(s), {} warning(s)",
            issues, warnings
        ));
    }

    issues
}
