//! Prediction command

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, PredictRequest, PredictResponse};
use crate::output::{color_probability, print_info, print_success, OutputFormat};

/// Row for the ranked distribution table
#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Disease")]
    disease: String,
    #[tabled(rename = "Probability")]
    probability: String,
}

/// Request a prediction for the given symptoms
pub async fn run_prediction(
    client: &ApiClient,
    symptoms: Vec<String>,
    model: String,
    format: OutputFormat,
) -> Result<()> {
    let request = PredictRequest { symptoms, model };
    let response: PredictResponse = client.post("api/predict", &request).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&response)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            print_success(&format!(
                "Predicted disease: {}",
                response.predicted_disease
            ));
            print_info(&format!("Model: {}", response.model_used));

            if response.top_predictions.is_empty() {
                return Ok(());
            }

            let rows: Vec<PredictionRow> = response
                .top_predictions
                .iter()
                .map(|p| PredictionRow {
                    disease: p.disease.clone(),
                    probability: color_probability(p.probability),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
