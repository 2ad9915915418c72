use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{HealthResponse, PredictionRequest, PredictionResponse};
use tracing::{debug, warn};

pub mod config;
pub mod controller;
pub mod error;

pub use config::{load_settings, Settings};
pub use controller::{
    execute, Completion, Submission, SubmissionController, SubmissionOutcome, SubmissionState,
    SubmissionTicket,
};
pub use error::{ConfigError, PredictionError};

/// The remote model behind `POST /predict`.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError>;
}

/// HTTP client for the prediction service. No timeout is configured; a hung
/// connection blocks until the transport gives up.
pub struct PredictionClient {
    http: Client,
    base_url: String,
}

impl PredictionClient {
    /// `base_url` is expected to be prepared by [`config::prepare_base_url`].
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let base_url = config::prepare_base_url(&settings.api_base_url)?;
        Ok(Self::new(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes `GET /`, which a healthy service answers with `{"status": "ok"}`.
    pub async fn health(&self) -> Result<HealthResponse, PredictionError> {
        let url = format!("{}/", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| PredictionError::transport(&err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Http {
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| PredictionError::transport(&err))?;
        serde_json::from_slice(&body)
            .map_err(|err| PredictionError::MalformedResponse(err.to_string()))
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        let url = format!("{}/predict", self.base_url);
        debug!(%url, "sending prediction request");
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| PredictionError::transport(&err))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "prediction service rejected request");
            return Err(PredictionError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| PredictionError::transport(&err))?;
        decode_prediction(&body)
    }
}

/// Decodes a success body, refusing anything that would render a bogus
/// category: missing fields, wrong types, probabilities outside `[0, 1]`.
pub fn decode_prediction(body: &[u8]) -> Result<PredictionResponse, PredictionError> {
    let response: PredictionResponse = serde_json::from_slice(body)
        .map_err(|err| PredictionError::MalformedResponse(err.to_string()))?;
    if !(0.0..=1.0).contains(&response.churn_probability) {
        return Err(PredictionError::MalformedResponse(format!(
            "churn_probability {} outside [0, 1]",
            response.churn_probability
        )));
    }
    Ok(response)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
