use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, PredictionClient, PredictionError, SubmissionController, SubmissionState,
};
use shared::{
    domain::{FieldKind, FieldName},
    form::FormInput,
    protocol::PredictionResult,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "churn-cli",
    about = "Estimate a customer's churn risk with the prediction service"
)]
struct Cli {
    /// Prediction service base url; overrides churn.toml and API_BASE_URL.
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit the default form with optional edits.
    Predict {
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        edits: Vec<(String, String)>,
    },
    /// List form fields and their allowed values.
    Fields,
    /// Check that the prediction service is up.
    Health,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((field.to_string(), value.to_string()))
}

fn apply_edits(form: FormInput, edits: &[(String, String)]) -> Result<FormInput> {
    edits.iter().try_fold(form, |form, (field, value)| {
        form.update(field, value)
            .with_context(|| format!("cannot set {field}"))
    })
}

fn render_result(result: &PredictionResult) -> Vec<String> {
    vec![
        format!("Churn probability: {}", result.probability_percent()),
        format!("Risk category: {}", result.category),
        format!("Predicted label: {}", result.label_text()),
    ]
}

fn render_fields() -> Vec<String> {
    FieldName::ALL
        .into_iter()
        .map(|field| match field.kind() {
            FieldKind::Categorical => format!("{field}: {}", field.options().join(" | ")),
            FieldKind::Integer => format!("{field}: whole number"),
            FieldKind::Decimal => format!("{field}: number"),
        })
        .collect()
}

// Health checks report the status code rather than the prediction-view text.
fn describe_health_failure(err: &PredictionError) -> String {
    err.to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    if let Command::Fields = cli.command {
        for line in render_fields() {
            println!("{line}");
        }
        return Ok(());
    }

    let settings = load_settings().with_api_base_url(cli.api_base_url);
    let client = PredictionClient::from_settings(&settings)?;
    tracing::debug!(base_url = client.base_url(), "using prediction service");

    match cli.command {
        Command::Predict { edits } => {
            let form = apply_edits(FormInput::initialize(), &edits)?;
            let mut controller = SubmissionController::new();
            match controller.submit(&client, &form).await {
                SubmissionState::Succeeded(result) => {
                    for line in render_result(result) {
                        println!("{line}");
                    }
                }
                SubmissionState::Failed(message) => bail!("{message}"),
                other => return Err(anyhow!("submission did not settle: {other:?}")),
            }
        }
        Command::Health => {
            let health = client
                .health()
                .await
                .map_err(|err| anyhow!(describe_health_failure(&err)))
                .with_context(|| format!("{} is not reachable", client.base_url()))?;
            println!("{}: {}", client.base_url(), health.status);
        }
        Command::Fields => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use shared::domain::{Contract, RiskCategory};

    use super::*;

    #[test]
    fn parses_field_assignments() {
        assert_eq!(
            parse_assignment("contract=One year"),
            Ok(("contract".to_string(), "One year".to_string()))
        );
        assert_eq!(
            parse_assignment("monthly_charges="),
            Ok(("monthly_charges".to_string(), String::new()))
        );
        assert!(parse_assignment("tenure").is_err());
        assert!(parse_assignment("=12").is_err());
    }

    #[test]
    fn applies_edits_in_order() {
        let edits = vec![
            ("contract".to_string(), "One year".to_string()),
            ("contract".to_string(), "Two year".to_string()),
            ("tenure".to_string(), "30".to_string()),
        ];
        let form = apply_edits(FormInput::initialize(), &edits).expect("edits");
        assert_eq!(form.contract, Contract::TwoYear);
        assert_eq!(form.tenure, "30");
    }

    #[test]
    fn unknown_field_edit_names_the_field() {
        let edits = vec![("plan".to_string(), "gold".to_string())];
        let err = apply_edits(FormInput::initialize(), &edits).expect_err("must fail");
        assert_eq!(err.to_string(), "cannot set plan");
    }

    #[test]
    fn renders_result_lines() {
        let result = PredictionResult {
            probability: 0.35,
            label: false,
            category: RiskCategory::Low,
        };
        assert_eq!(
            render_result(&result),
            vec![
                "Churn probability: 35.00%".to_string(),
                "Risk category: Low".to_string(),
                "Predicted label: Will stay".to_string(),
            ]
        );
    }

    #[test]
    fn lists_every_field() {
        let lines = render_fields();
        assert_eq!(lines.len(), FieldName::ALL.len());
        assert!(lines.contains(&"contract: Month-to-month | One year | Two year".to_string()));
        assert!(lines.contains(&"tenure: whole number".to_string()));
    }

    #[test]
    fn health_failure_reports_http_status() {
        let err = PredictionError::Http { status: 503 };
        assert_eq!(
            describe_health_failure(&err),
            "prediction service returned HTTP 503"
        );
        assert_ne!(describe_health_failure(&err), "Prediction failed");
    }
}
