use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::workflows::onboarding::domain::{
    ApplicationForm, FieldPath, FileHandle, FileSlot, VehicleType, WizardStep,
};
use crate::workflows::onboarding::payload::ApplicationPayload;
use crate::workflows::onboarding::submission::{
    ApplicationGateway, GatewayError, SubmissionReceipt,
};
use crate::workflows::onboarding::wizard::WizardController;

pub(super) fn pdf(name: &str) -> FileHandle {
    FileHandle::new(
        format!("{name}.pdf"),
        "application/pdf",
        format!("%PDF-1.7 {name}").into_bytes(),
    )
}

pub(super) fn video(name: &str) -> FileHandle {
    FileHandle::new(format!("{name}.mp4"), "video/mp4", vec![0u8, 0, 0, 24])
}

pub(super) fn file_for(slot: FileSlot) -> FileHandle {
    match slot {
        FileSlot::VehicleVideo => video(slot.part_name()),
        _ => pdf(slot.part_name()),
    }
}

pub(super) fn fill_vehicle_step(wizard: &mut WizardController) {
    wizard.select_vehicle_type(Some(VehicleType::Van));
    wizard.update_field(FieldPath::PlateNumber, "ABC-123XY");
    attach_step_files(wizard, WizardStep::Vehicle);
}

pub(super) fn fill_driver_step(wizard: &mut WizardController) {
    wizard.update_field(FieldPath::DriverName, "Ada Obi");
    wizard.update_field(FieldPath::DriverAddress, "12 Marina Road, Lagos");
    attach_step_files(wizard, WizardStep::Driver);
}

pub(super) fn fill_guarantor_step(wizard: &mut WizardController) {
    wizard.update_field(FieldPath::GuarantorName, "Chinedu Eze");
    wizard.update_field(FieldPath::GuarantorAddress, "4 Allen Avenue, Ikeja");
    wizard.update_field(FieldPath::GuarantorPhone, "+2348030000000");
    wizard.update_field(FieldPath::GuarantorNationalId, "12345678901");
    attach_step_files(wizard, WizardStep::Guarantor);
}

pub(super) fn attach_step_files(wizard: &mut WizardController, step: WizardStep) {
    for slot in FileSlot::ALL.into_iter().filter(|slot| slot.step() == step) {
        wizard.pick_file(slot, file_for(slot));
    }
}

pub(super) fn complete_form() -> ApplicationForm {
    let mut wizard = WizardController::new();
    fill_vehicle_step(&mut wizard);
    fill_driver_step(&mut wizard);
    fill_guarantor_step(&mut wizard);
    wizard.form().clone()
}

/// Filled-in wizard already advanced to the review step.
pub(super) fn wizard_on_review() -> WizardController {
    let mut wizard = WizardController::with_form(complete_form());
    for _ in 0..3 {
        wizard.go_next().expect("complete form passes every step");
    }
    assert_eq!(wizard.step(), WizardStep::Review);
    wizard
}

pub(super) fn accepted(reference: &str) -> Result<SubmissionReceipt, GatewayError> {
    Ok(SubmissionReceipt {
        status: 201,
        reference: Some(reference.to_string()),
        body: None,
    })
}

pub(super) fn rejected(
    status: u16,
    message: Option<&str>,
) -> Result<SubmissionReceipt, GatewayError> {
    Err(GatewayError::Rejected {
        status,
        message: message.map(str::to_string),
    })
}

/// Answers from a scripted queue and records every payload it receives.
#[derive(Default)]
pub(super) struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<SubmissionReceipt, GatewayError>>>,
    received: Mutex<Vec<ApplicationPayload>>,
}

impl ScriptedGateway {
    pub(super) fn with_responses(
        responses: impl IntoIterator<Item = Result<SubmissionReceipt, GatewayError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            received: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn received(&self) -> Vec<ApplicationPayload> {
        self.received.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl ApplicationGateway for ScriptedGateway {
    async fn submit_application(
        &self,
        payload: ApplicationPayload,
    ) -> Result<SubmissionReceipt, GatewayError> {
        self.received
            .lock()
            .expect("gateway mutex poisoned")
            .push(payload);
        self.responses
            .lock()
            .expect("gateway mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| accepted("app-default"))
    }
}

/// Never answers within a test's lifetime unless aborted.
#[derive(Default)]
pub(super) struct StalledGateway {
    pub(super) started: AtomicUsize,
    pub(super) completed: AtomicBool,
}

#[async_trait]
impl ApplicationGateway for StalledGateway {
    async fn submit_application(
        &self,
        _payload: ApplicationPayload,
    ) -> Result<SubmissionReceipt, GatewayError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        self.completed.store(true, Ordering::SeqCst);
        accepted("too-late")
    }
}

pub(super) struct PanickingGateway;

#[async_trait]
impl ApplicationGateway for PanickingGateway {
    async fn submit_application(
        &self,
        _payload: ApplicationPayload,
    ) -> Result<SubmissionReceipt, GatewayError> {
        panic!("gateway exploded while building the request");
    }
}

pub(super) fn gateway<G>(inner: G) -> Arc<G> {
    Arc::new(inner)
}
