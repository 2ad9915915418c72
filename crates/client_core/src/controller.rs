//! Submission lifecycle: `Idle -> Pending -> Succeeded | Failed`, with
//! resubmission allowed from any state.
//!
//! A submission is split into [`SubmissionController::begin`], the network
//! call ([`execute`]), and [`SubmissionController::complete`], so an event
//! loop can keep accepting input while a request is outstanding. Every
//! `begin` issues a newer ticket and only the newest ticket's outcome is ever
//! applied; responses to superseded submissions are dropped.

use shared::{
    error::FormError,
    form::FormInput,
    protocol::{PredictionRequest, PredictionResponse, PredictionResult},
};
use tracing::{info, warn};

use crate::{error::PredictionError, PredictionService};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded(PredictionResult),
    Failed(String),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionTicket(pub u64);

/// A normalized request waiting to be sent.
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: SubmissionTicket,
    pub request: PredictionRequest,
}

#[derive(Debug)]
pub struct SubmissionOutcome {
    pub ticket: SubmissionTicket,
    pub result: Result<PredictionResponse, PredictionError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer submission was started after this one; its outcome was dropped.
    Stale,
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    state: SubmissionState,
    latest_ticket: u64,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Moves to `Pending`, dropping any shown result or error, and normalizes
    /// the form. A form that fails to normalize moves straight to `Failed`.
    pub fn begin(&mut self, form: &FormInput) -> Result<Submission, FormError> {
        self.latest_ticket += 1;
        let ticket = SubmissionTicket(self.latest_ticket);
        self.state = SubmissionState::Pending;
        info!(ticket = ticket.0, "prediction submission started");

        match form.normalize() {
            Ok(request) => Ok(Submission { ticket, request }),
            Err(err) => {
                warn!(ticket = ticket.0, error = %err, "form could not be normalized");
                self.state = SubmissionState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub fn complete(&mut self, outcome: SubmissionOutcome) -> Completion {
        let SubmissionOutcome { ticket, result } = outcome;
        if ticket.0 != self.latest_ticket {
            warn!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "dropping outcome of superseded submission"
            );
            return Completion::Stale;
        }

        self.state = match result {
            Ok(response) => {
                let result = PredictionResult::from(response);
                info!(
                    ticket = ticket.0,
                    probability = result.probability,
                    category = %result.category,
                    "prediction succeeded"
                );
                SubmissionState::Succeeded(result)
            }
            Err(err) => {
                warn!(ticket = ticket.0, error = %err, "prediction failed");
                SubmissionState::Failed(err.user_message())
            }
        };
        Completion::Applied
    }

    /// Runs one submission to completion and returns the resulting state.
    pub async fn submit<S>(&mut self, service: &S, form: &FormInput) -> &SubmissionState
    where
        S: PredictionService + ?Sized,
    {
        if let Ok(submission) = self.begin(form) {
            let outcome = execute(service, submission).await;
            self.complete(outcome);
        }
        &self.state
    }
}

/// Issues the request for `submission`. This is the only suspension point of
/// a submission and never touches controller state.
pub async fn execute<S>(service: &S, submission: Submission) -> SubmissionOutcome
where
    S: PredictionService + ?Sized,
{
    let result = service.predict(&submission.request).await;
    SubmissionOutcome {
        ticket: submission.ticket,
        result,
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
