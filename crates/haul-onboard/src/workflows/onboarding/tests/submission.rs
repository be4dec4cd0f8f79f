use std::sync::atomic::Ordering;

use super::common::*;
use crate::workflows::onboarding::domain::{FieldPath, FileSlot, SubmissionState, WizardStep};
use crate::workflows::onboarding::submission::{
    GatewayError, SubmissionAdapter, SubmissionOutcome, GENERIC_FAILURE_MESSAGE,
};
use crate::workflows::onboarding::wizard::{WizardController, WizardError};

#[tokio::test]
async fn server_message_is_surfaced_on_failure() {
    let gateway = gateway(ScriptedGateway::with_responses([rejected(
        409,
        Some("Duplicate plate number"),
    )]));
    let adapter = SubmissionAdapter::new(gateway.clone());
    let mut wizard = wizard_on_review();

    let status = adapter.submit(&mut wizard).await.expect("attempt starts");

    assert_eq!(status.state, SubmissionState::Failed);
    assert_eq!(status.error_message.as_deref(), Some("Duplicate plate number"));
    assert_eq!(gateway.received().len(), 1);
}

#[tokio::test]
async fn rejection_without_message_falls_back_to_generic_text() {
    let gateway = gateway(ScriptedGateway::with_responses([rejected(500, None)]));
    let adapter = SubmissionAdapter::new(gateway);
    let mut wizard = wizard_on_review();

    let status = adapter.submit(&mut wizard).await.expect("attempt starts");

    assert_eq!(status.error_message.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
}

#[tokio::test]
async fn success_is_terminal_and_freezes_the_wizard() {
    let gateway = gateway(ScriptedGateway::with_responses([accepted("app-000042")]));
    let adapter = SubmissionAdapter::new(gateway.clone());
    let mut wizard = wizard_on_review();

    let status = adapter.submit(&mut wizard).await.expect("attempt starts");
    assert_eq!(status.state, SubmissionState::Succeeded);
    assert!(status.submitted_at.is_some());
    assert!(wizard.is_submitted());

    assert_eq!(wizard.go_back(), WizardStep::Review);
    assert_eq!(wizard.go_next().expect("no-op"), WizardStep::Review);
    wizard.update_field(FieldPath::DriverName, "Someone Else");
    assert_eq!(wizard.form().driver.name, "Ada Obi");

    assert_eq!(
        adapter.submit(&mut wizard).await.err(),
        Some(WizardError::AlreadySubmitted)
    );
    assert_eq!(gateway.received().len(), 1);
}

#[tokio::test]
async fn retry_after_failure_resends_the_whole_payload() {
    let gateway = gateway(ScriptedGateway::with_responses([
        Err(GatewayError::Transport("connection reset by peer".to_string())),
        accepted("app-000043"),
    ]));
    let adapter = SubmissionAdapter::new(gateway.clone());
    let mut wizard = wizard_on_review();

    let failed = adapter.submit(&mut wizard).await.expect("first attempt");
    assert_eq!(failed.state, SubmissionState::Failed);
    assert_eq!(failed.error_message.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    assert_eq!(wizard.form().files.filled_count(), 10);

    let retried = adapter.submit(&mut wizard).await.expect("retry");
    assert_eq!(retried.state, SubmissionState::Succeeded);
    assert_eq!(retried.attempts, 2);
    assert!(retried.error_message.is_none());

    let received = gateway.received();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0], received[1]);
}

#[test]
fn submission_only_starts_from_review_step() {
    let mut wizard = WizardController::with_form(complete_form());
    assert_eq!(
        wizard.begin_submission().err(),
        Some(WizardError::NotOnReviewStep(WizardStep::Vehicle))
    );
    assert_eq!(wizard.submission().state, SubmissionState::Idle);
    assert_eq!(wizard.submission().attempts, 0);
}

#[test]
fn double_submit_is_rejected_while_in_flight() {
    let mut wizard = wizard_on_review();
    let ticket = wizard.begin_submission().expect("first attempt");
    assert_eq!(ticket.attempt, 1);
    assert_eq!(ticket.payload.file_count(), 10);

    assert_eq!(
        wizard.begin_submission().err(),
        Some(WizardError::SubmissionInFlight)
    );
    assert_eq!(wizard.submission().state, SubmissionState::Submitting);
}

#[test]
fn stale_outcomes_are_discarded() {
    let mut wizard = wizard_on_review();
    let first = wizard.begin_submission().expect("first attempt");
    wizard.abandon_submission();
    assert_eq!(wizard.submission().state, SubmissionState::Failed);

    let second = wizard.begin_submission().expect("second attempt");
    let applied = wizard.finish_submission(SubmissionOutcome {
        attempt: first.attempt,
        result: accepted("late"),
    });
    assert!(!applied);
    assert_eq!(wizard.submission().state, SubmissionState::Submitting);

    let applied = wizard.finish_submission(SubmissionOutcome {
        attempt: second.attempt,
        result: rejected(422, Some("Guarantor NIN is invalid")),
    });
    assert!(applied);
    assert_eq!(
        wizard.submission().error_message.as_deref(),
        Some("Guarantor NIN is invalid")
    );
}

#[tokio::test]
async fn dispatched_attempt_resolves_through_handle() {
    let gateway = gateway(ScriptedGateway::with_responses([accepted("app-7")]));
    let adapter = SubmissionAdapter::new(gateway);
    let mut wizard = wizard_on_review();

    let ticket = wizard.begin_submission().expect("attempt starts");
    let handle = adapter.dispatch(ticket);
    assert_eq!(handle.attempt(), 1);

    let outcome = handle.outcome().await;
    assert!(wizard.finish_submission(outcome));
    assert!(wizard.is_submitted());
}

#[tokio::test]
async fn dropping_the_handle_cancels_the_request() {
    let stalled = gateway(StalledGateway::default());
    let adapter = SubmissionAdapter::new(stalled.clone());
    let mut wizard = wizard_on_review();

    let ticket = wizard.begin_submission().expect("attempt starts");
    let handle = adapter.dispatch(ticket);
    while stalled.started.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    drop(handle);
    wizard.abandon_submission();
    tokio::task::yield_now().await;

    assert!(!stalled.completed.load(Ordering::SeqCst));
    assert_eq!(wizard.submission().state, SubmissionState::Failed);
    assert!(wizard.begin_submission().is_ok(), "user may retry");
}

#[tokio::test]
async fn panicking_gateway_becomes_a_failed_outcome() {
    let adapter = SubmissionAdapter::new(gateway(PanickingGateway));
    let mut wizard = wizard_on_review();

    let ticket = wizard.begin_submission().expect("attempt starts");
    let outcome = adapter.dispatch(ticket).outcome().await;
    assert!(matches!(outcome.result, Err(GatewayError::Transport(_))));

    wizard.finish_submission(outcome);
    assert_eq!(wizard.submission().state, SubmissionState::Failed);
    assert_eq!(
        wizard.submission().error_message.as_deref(),
        Some(GENERIC_FAILURE_MESSAGE)
    );
}

#[tokio::test]
async fn edits_on_review_that_break_an_earlier_step_block_the_submission() {
    let gateway = gateway(ScriptedGateway::with_responses([accepted("app-8")]));
    let adapter = SubmissionAdapter::new(gateway.clone());
    let mut wizard = wizard_on_review();

    wizard.clear_file(FileSlot::HackneyPermit);
    wizard.update_field(FieldPath::GuarantorPhone, "  ");

    match adapter.submit(&mut wizard).await {
        Err(WizardError::Incomplete(error)) => {
            assert_eq!(error.step, WizardStep::Vehicle);
            assert_eq!(error.message, "Hackney permit is required.");
        }
        other => panic!("expected incomplete application, got {other:?}"),
    }
    assert_eq!(wizard.error_message(), Some("Hackney permit is required."));
    assert_eq!(wizard.submission().state, SubmissionState::Idle);
    assert_eq!(wizard.submission().attempts, 0);
    assert!(gateway.received().is_empty());
}
