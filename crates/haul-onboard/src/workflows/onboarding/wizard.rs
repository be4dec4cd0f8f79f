use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{
    ApplicationForm, FieldPath, FileHandle, FileSlot, SubmissionState, SubmissionStatus,
    VehicleType, WizardStep,
};
use super::payload::ApplicationPayload;
use super::review::ReviewSummary;
use super::submission::{SubmissionOutcome, SubmissionTicket};
use super::validation::{validate_step, validate_through, ValidationError};

const CANCELLED_MESSAGE: &str = "Submission was cancelled. Please try again.";

/// Errors raised when a submission cannot start from the current wizard state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("applications can only be submitted from the review step (currently on {0:?})")]
    NotOnReviewStep(WizardStep),
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("this application has already been submitted")]
    AlreadySubmitted,
    #[error("application is incomplete: {0}")]
    Incomplete(ValidationError),
}

/// Single owner of one in-progress application: step position, form data, and submission status.
#[derive(Debug, Clone, Default)]
pub struct WizardController {
    form: ApplicationForm,
    step: WizardStep,
    error: Option<String>,
    submission: SubmissionStatus,
    scroll_requests: u64,
    pending_scroll: bool,
}

impl WizardController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a pre-filled form, still on the first step.
    pub fn with_form(form: ApplicationForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submission(&self) -> &SubmissionStatus {
        &self.submission
    }

    /// The confirmation view has replaced the step machine.
    pub fn is_submitted(&self) -> bool {
        self.submission.state == SubmissionState::Succeeded
    }

    pub fn select_vehicle_type(&mut self, vehicle_type: Option<VehicleType>) {
        if self.is_submitted() {
            return;
        }
        self.form.vehicle.vehicle_type = vehicle_type;
    }

    /// Raw assignment; trimming only happens at validation and submission time.
    pub fn update_field(&mut self, field: FieldPath, value: impl Into<String>) {
        if self.is_submitted() {
            return;
        }
        *field.slot_mut(&mut self.form) = value.into();
    }

    pub fn pick_file(&mut self, slot: FileSlot, file: FileHandle) -> Option<FileHandle> {
        if self.is_submitted() {
            return None;
        }
        debug!(slot = slot.part_name(), file = %file.file_name, bytes = file.len(), "file picked");
        self.form.files.pick(slot, file)
    }

    pub fn clear_file(&mut self, slot: FileSlot) -> Option<FileHandle> {
        if self.is_submitted() {
            return None;
        }
        self.form.files.clear(slot)
    }

    /// Validate the current step and advance one position when it passes.
    pub fn go_next(&mut self) -> Result<WizardStep, ValidationError> {
        if self.is_submitted() {
            return Ok(self.step);
        }

        if let Err(error) = validate_step(self.step, &self.form) {
            info!(step = ?self.step, reason = error.message, "step validation failed");
            self.error = Some(error.message.to_string());
            return Err(error);
        }

        self.error = None;
        if let Some(next) = self.step.next() {
            debug!(from = ?self.step, to = ?next, "wizard advanced");
            self.step = next;
            self.request_scroll();
        }
        Ok(self.step)
    }

    /// Retreat one position without validation.
    pub fn go_back(&mut self) -> WizardStep {
        if self.is_submitted() {
            return self.step;
        }

        self.error = None;
        if let Some(previous) = self.step.previous() {
            debug!(from = ?self.step, to = ?previous, "wizard retreated");
            self.step = previous;
            self.request_scroll();
        }
        self.step
    }

    pub fn review_summary(&self) -> ReviewSummary {
        ReviewSummary::from_form(&self.form)
    }

    /// Total scroll-to-top signals raised so far.
    pub fn scroll_to_top_requests(&self) -> u64 {
        self.scroll_requests
    }

    /// Consume the pending scroll-to-top signal, if any.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.pending_scroll)
    }

    /// Move to `Submitting` and hand out the payload for this attempt.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, WizardError> {
        if !self.submission.state.can_begin() {
            return Err(match self.submission.state {
                SubmissionState::Succeeded => WizardError::AlreadySubmitted,
                _ => WizardError::SubmissionInFlight,
            });
        }
        if self.step != WizardStep::Review {
            return Err(WizardError::NotOnReviewStep(self.step));
        }
        // Edits stay open on the review step, so earlier steps may no longer hold.
        if let Err(error) = validate_through(WizardStep::Review, &self.form) {
            info!(step = ?error.step, reason = error.message, "submission blocked");
            self.error = Some(error.message.to_string());
            return Err(WizardError::Incomplete(error));
        }
        self.error = None;

        self.submission.attempts += 1;
        self.submission.state = SubmissionState::Submitting;
        self.submission.error_message = None;

        Ok(SubmissionTicket {
            attempt: self.submission.attempts,
            payload: ApplicationPayload::from_form(&self.form),
        })
    }

    /// Apply the result of an attempt. Outcomes for stale attempts are dropped.
    pub fn finish_submission(&mut self, outcome: SubmissionOutcome) -> bool {
        if self.submission.state != SubmissionState::Submitting
            || outcome.attempt != self.submission.attempts
        {
            debug!(attempt = outcome.attempt, "discarding stale submission outcome");
            return false;
        }

        match outcome.result {
            Ok(receipt) => {
                info!(
                    attempt = outcome.attempt,
                    reference = receipt.reference.as_deref().unwrap_or("-"),
                    "application submitted"
                );
                self.submission.state = SubmissionState::Succeeded;
                self.submission.error_message = None;
                self.submission.submitted_at = Some(Utc::now());
            }
            Err(error) => {
                let message = error.user_message();
                warn!(attempt = outcome.attempt, %error, "application submission failed");
                self.submission.state = SubmissionState::Failed;
                self.submission.error_message = Some(message);
            }
        }
        true
    }

    /// Give up on an in-flight attempt so the user can retry.
    pub fn abandon_submission(&mut self) {
        if self.submission.state == SubmissionState::Submitting {
            self.submission.state = SubmissionState::Failed;
            self.submission.error_message = Some(CANCELLED_MESSAGE.to_string());
        }
    }

    fn request_scroll(&mut self) {
        self.scroll_requests += 1;
        self.pending_scroll = true;
    }
}
