//! Driver onboarding wizard: vehicle, driver and guarantor steps, ten document slots, and the
//! single multipart submission that hands the finished application to the remote endpoint.

pub mod domain;
pub mod files;
pub mod payload;
pub mod review;
pub mod submission;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationForm, DriverDetails, FieldPath, FileHandle, FileSlot, GuarantorDetails,
    SubmissionState, SubmissionStatus, UnknownVehicleType, VehicleDetails, VehicleType,
    WizardStep, FILE_SLOT_COUNT,
};
pub use files::FileSlots;
pub use payload::{ApplicationPayload, FilePart, PayloadError, TextPart};
pub use review::{ReviewRow, ReviewSummary, EMPTY_VALUE};
pub use submission::{
    ApplicationGateway, GatewayError, HttpApplicationGateway, SubmissionAdapter,
    SubmissionHandle, SubmissionOutcome, SubmissionReceipt, SubmissionTicket,
    GENERIC_FAILURE_MESSAGE,
};
pub use validation::{
    rules_for, validate_step, validate_through, Requirement, StepRule, ValidationError,
};
pub use wizard::{WizardController, WizardError};
