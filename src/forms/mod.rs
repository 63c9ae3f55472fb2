//! Webhook form submission
//!
//! Three public-site forms share one submission shape, parameterized by
//! field list, endpoint, and display copy. The DOM work (disable the
//! button, swap panels) is behind [`FormPresenter`] so hosts and tests can
//! supply their own; the submitter only guarantees the sequence: busy,
//! verdict panel, control restored.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::client::WorkerApi;
use crate::error::{ApiError, Result};

/// The three webhook-backed forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormKind {
    /// Recruitment application
    Recruitment,
    /// Contact a federal prosecutor
    Attorney,
    /// Meeting request to leadership
    Direction,
}

impl FormKind {
    /// Path segment of the webhook endpoint
    pub fn slug(&self) -> &'static str {
        match self {
            FormKind::Recruitment => "recruitment",
            FormKind::Attorney => "attorney",
            FormKind::Direction => "direction",
        }
    }

    /// Named fields collected verbatim from the form
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            FormKind::Recruitment => &["name", "dob", "phone", "email"],
            FormKind::Attorney => &["name", "phone", "email", "reason"],
            FormKind::Direction => &["name", "phone", "email", "reason"],
        }
    }

    /// Success panel heading
    pub fn success_heading(&self) -> &'static str {
        match self {
            FormKind::Recruitment => "Application Submitted Successfully",
            FormKind::Attorney | FormKind::Direction => "Request Submitted Successfully",
        }
    }

    /// Label for the server-issued reference number
    pub fn reference_label(&self) -> &'static str {
        match self {
            FormKind::Recruitment => "Application Number",
            FormKind::Attorney | FormKind::Direction => "Request Number",
        }
    }

    /// Follow-up line shown under the reference number
    pub fn follow_up(&self) -> &'static str {
        match self {
            FormKind::Recruitment => {
                "Your application is being reviewed by our recruitment team. \
                 You will be contacted within 3-5 business days."
            }
            FormKind::Attorney => {
                "A prosecutor will review your request and contact you within 24-48 hours."
            }
            FormKind::Direction => {
                "Our executive office will review your request and contact you \
                 within 3-5 business days to schedule a meeting."
            }
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Host-side rendering of a submission's lifecycle.
///
/// All error panels carry the same retry affordance: the form is re-shown
/// in place for another attempt, never a full page reload.
pub trait FormPresenter {
    /// Submission started: disable the control, show the busy label
    fn submit_started(&mut self);

    /// Accepted: hide the form, show the success panel with the reference number
    fn show_success(&mut self, form: FormKind, case_number: &str);

    /// Declined: show the error panel with the worker's verbatim message
    fn show_server_error(&mut self, message: &str);

    /// Request failed in transit: show the generic connectivity panel
    fn show_network_error(&mut self);

    /// Always last: re-enable the control and restore its label
    fn submit_finished(&mut self);
}

/// Terminal verdict of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Worker accepted and issued a reference number
    Accepted { case_number: String },
    /// Worker declined with a message
    Declined { message: String },
    /// Request never completed
    Offline,
}

/// Submits one form kind to its webhook endpoint
pub struct FormSubmitter {
    kind: FormKind,
    client: Arc<dyn WorkerApi>,
}

impl FormSubmitter {
    pub fn new(kind: FormKind, client: Arc<dyn WorkerApi>) -> Self {
        Self { kind, client }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// Submit the form once.
    ///
    /// `values` must supply every declared field (the library analog of the
    /// HTML `required` attributes); a missing field fails before any request
    /// or presenter activity. Extra keys are ignored. Whatever the verdict,
    /// the presenter's `submit_finished` runs before this returns.
    pub async fn submit(
        &self,
        values: &BTreeMap<String, String>,
        presenter: &mut dyn FormPresenter,
    ) -> Result<SubmitOutcome> {
        let mut payload = BTreeMap::new();
        for field in self.kind.fields() {
            let value = values
                .get(*field)
                .ok_or_else(|| ApiError::InvalidSubmission(field.to_string()))?;
            payload.insert(field.to_string(), value.clone());
        }

        presenter.submit_started();

        let outcome = match self.client.submit_form(self.kind, &payload).await {
            Ok(verdict) if verdict.success => {
                let case_number = verdict.case_number.unwrap_or_default();
                presenter.show_success(self.kind, &case_number);
                SubmitOutcome::Accepted { case_number }
            }
            Ok(verdict) => {
                let message = verdict
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string());
                presenter.show_server_error(&message);
                SubmitOutcome::Declined { message }
            }
            Err(err) => {
                log::warn!("{} form submission failed: {}", self.kind, err);
                presenter.show_network_error();
                SubmitOutcome::Offline
            }
        };

        presenter.submit_finished();

        Ok(outcome)
    }
}
