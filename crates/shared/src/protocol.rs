use serde::{Deserialize, Serialize};

use crate::domain::{
    Contract, Gender, InternetAddon, InternetService, MultipleLines, PaymentMethod, RiskCategory,
    YesNo,
};

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub gender: Gender,
    pub senior_citizen: i64,
    pub partner: YesNo,
    pub dependents: YesNo,
    pub tenure: i64,
    pub phone_service: YesNo,
    pub multiple_lines: MultipleLines,
    pub internet_service: InternetService,
    pub online_security: InternetAddon,
    pub online_backup: InternetAddon,
    pub device_protection: InternetAddon,
    pub tech_support: InternetAddon,
    pub streaming_tv: InternetAddon,
    pub streaming_movies: InternetAddon,
    pub contract: Contract,
    pub paperless_billing: YesNo,
    pub payment_method: PaymentMethod,
    pub monthly_charges: f64,
    pub total_charges: f64,
}

/// Success body of `POST /predict`. Unknown fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub churn_probability: f64,
    pub churn_label: bool,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub probability: f64,
    pub label: bool,
    pub category: RiskCategory,
}

impl PredictionResult {
    pub fn new(probability: f64, label: bool) -> Self {
        Self {
            probability,
            label,
            category: RiskCategory::from_probability(probability),
        }
    }

    /// Probability as a percentage with two decimals, e.g. `82.00%`.
    pub fn probability_percent(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }

    pub fn label_text(&self) -> &'static str {
        if self.label {
            "Will churn"
        } else {
            "Will stay"
        }
    }
}

impl From<PredictionResponse> for PredictionResult {
    fn from(value: PredictionResponse) -> Self {
        Self::new(value.churn_probability, value.churn_label)
    }
}
