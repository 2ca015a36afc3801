//! Health command

use anyhow::Result;

use crate::client::{ApiClient, StatusResponse};
use crate::output::{print_success, print_warning, OutputFormat};

/// Show service health and the enumerated models
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let status: StatusResponse = client.get("health").await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&status)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            print_success(&status.message);
            println!("Status: {}", status.status);
            println!("Models: {}", status.available_models.join(", "));
            if status.symptoms_loaded {
                print_success("Symptom vocabulary loaded");
            } else {
                print_warning("Symptom vocabulary not loaded yet");
            }
        }
    }

    Ok(())
}
