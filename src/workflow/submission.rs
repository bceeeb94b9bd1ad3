use std::path::PathBuf;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::domain::draft::TicketDraft;
use crate::domain::field::Field;
use crate::domain::ticket::{Attachment, TicketSummary};
use crate::domain::validation::{self, FieldErrors};
use crate::error::{AppError, AppResult};
use crate::services::attachments::encode_batch;
use crate::services::{AttachmentSource, TicketApi};

/// Where the form is in its submit cycle. Exactly one of these holds at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Error {
        message: String,
    },
    Success(TicketSummary),
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Error { .. } => "error",
            SubmissionState::Success(_) => "success",
        }
    }
}

/// Owns the draft, its field errors and the submission state.
///
/// A submit future dropped before it resolves leaves the form in
/// `Submitting`; further submits are refused until `dismiss` or `create_new`.
#[derive(Debug, Default)]
pub struct TicketForm {
    draft: TicketDraft,
    errors: FieldErrors,
    state: SubmissionState,
}

impl TicketForm {
    pub fn with_draft(draft: TicketDraft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    pub fn draft(&self) -> &TicketDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
        self.errors.clear_field(field);
    }

    pub fn add_service_tag(&mut self, label: &str) -> bool {
        let added = self.draft.add_service_tag(label);
        if added {
            self.errors.clear_field(Field::ServiceTags);
        }
        added
    }

    pub fn remove_service_tag(&mut self, label: &str) -> bool {
        self.draft.remove_service_tag(label)
    }

    /// Encodes one file selection and appends it to the draft. On failure the
    /// draft keeps none of the batch.
    pub async fn attach_files(
        &mut self,
        source: &dyn AttachmentSource,
        paths: &[PathBuf],
    ) -> AppResult<usize> {
        match encode_batch(source, paths).await {
            Ok(batch) => {
                let added = batch.len();
                self.draft.add_attachments(batch);
                Ok(added)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        self.draft.remove_attachment(index)
    }

    /// Validates the draft and, if it passes, sends it. Validation failures
    /// never reach the service. Success clears the draft.
    pub async fn submit(&mut self, api: &dyn TicketApi) -> AppResult<TicketSummary> {
        if self.state == SubmissionState::Submitting {
            warn!("submission already in progress");
            return Err(AppError::SubmissionInProgress);
        }
        self.transition(SubmissionState::Submitting);

        let ticket = match validation::validate(&self.draft) {
            Ok(ticket) => ticket,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(self.fail(AppError::Validation(errors)));
            }
        };
        self.errors = FieldErrors::default();

        let fallback_reference = reference_number(&mut rand::rng());

        match api.create_ticket(&ticket).await {
            Ok(receipt) => {
                let summary =
                    TicketSummary::from_receipt(receipt, &ticket, fallback_reference, Utc::now());
                info!(ticket = %summary.id, "ticket created");
                self.draft.reset();
                self.transition(SubmissionState::Success(summary.clone()));
                Ok(summary)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Closes the banner or summary. The draft is left as it is.
    pub fn dismiss(&mut self) {
        self.transition(SubmissionState::Idle);
    }

    /// Starts over with an empty draft.
    pub fn create_new(&mut self) {
        self.draft.reset();
        self.errors = FieldErrors::default();
        self.transition(SubmissionState::Idle);
    }

    fn fail(&mut self, err: AppError) -> AppError {
        warn!(error = %err, "submission failed");
        self.transition(SubmissionState::Error {
            message: err.user_message(),
        });
        err
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!(from = self.state.name(), to = next.name(), "form state");
        self.state = next;
    }
}

pub fn reference_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("TKT-{:06}", rng.random_range(0..1_000_000))
}
