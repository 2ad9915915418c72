use thiserror::Error;

/// Generic text shown for any non-success HTTP status.
pub const PREDICTION_FAILED: &str = "Prediction failed";

/// Failures of a single call to the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    /// No response was obtained: refused connection, DNS failure, timeout.
    #[error("{0}")]
    Transport(String),
    #[error("prediction service returned HTTP {status}")]
    Http { status: u16 },
    /// Success status, but the body is not a usable prediction.
    #[error("malformed prediction response: {0}")]
    MalformedResponse(String),
}

impl PredictionError {
    pub fn transport(err: &reqwest::Error) -> Self {
        Self::Transport(describe_error_chain(err))
    }

    /// Short text suitable for the failed-submission view.
    pub fn user_message(&self) -> String {
        match self {
            PredictionError::Transport(description) => description.clone(),
            PredictionError::Http { .. } => PREDICTION_FAILED.to_string(),
            PredictionError::MalformedResponse(_) => {
                format!("{PREDICTION_FAILED}: unexpected response from service")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid prediction service url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

// reqwest's top-level message omits the cause ("connection refused", ...).
fn describe_error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !description.contains(&cause_text) {
            description.push_str(": ");
            description.push_str(&cause_text);
        }
        source = cause.source();
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_failures_use_generic_message() {
        let err = PredictionError::Http { status: 503 };
        assert_eq!(err.user_message(), "Prediction failed");
        assert_eq!(err.to_string(), "prediction service returned HTTP 503");
    }

    #[test]
    fn transport_failures_surface_their_description() {
        let err = PredictionError::Transport("connection refused".into());
        assert_eq!(err.user_message(), "connection refused");
    }

    #[test]
    fn malformed_responses_do_not_leak_decoder_details() {
        let err = PredictionError::MalformedResponse("missing field `churn_label`".into());
        assert!(!err.user_message().contains("churn_label"));
        assert!(err.user_message().starts_with("Prediction failed"));
    }
}
