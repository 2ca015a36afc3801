//! Symptom search command

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, SymptomsResponse};
use crate::output::{print_warning, OutputFormat};

/// Row for the symptoms table
#[derive(Tabled)]
struct SymptomRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Symptom")]
    symptom: String,
}

/// Search the vocabulary, or list it all when no query is given
pub async fn search_symptoms(
    client: &ApiClient,
    query: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let path = match &query {
        Some(q) => format!("api/symptoms?query={}", q),
        None => "api/symptoms".to_string(),
    };

    let result: SymptomsResponse = client.get(&path).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            if result.symptoms.is_empty() {
                print_warning("No symptoms found");
                return Ok(());
            }

            let rows: Vec<SymptomRow> = result
                .symptoms
                .iter()
                .enumerate()
                .map(|(i, s)| SymptomRow {
                    index: i + 1,
                    symptom: s.clone(),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!("\nTotal: {} symptoms", result.symptoms.len());
        }
    }

    Ok(())
}
