use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::files::FileSlots;

/// Vehicle categories a driver can onboard with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    Van,
    Bike,
    Lorry,
    Truck,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Van,
        VehicleType::Bike,
        VehicleType::Lorry,
        VehicleType::Truck,
    ];

    /// Label sent over the wire and shown on the review screen.
    pub const fn label(self) -> &'static str {
        match self {
            VehicleType::Van => "VAN",
            VehicleType::Bike => "BIKE",
            VehicleType::Lorry => "LORRY",
            VehicleType::Truck => "TRUCK",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vehicle type '{0}' (expected VAN, BIKE, LORRY or TRUCK)")]
pub struct UnknownVehicleType(pub String);

impl FromStr for VehicleType {
    type Err = UnknownVehicleType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        VehicleType::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownVehicleType(raw.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDetails {
    pub vehicle_type: Option<VehicleType>,
    pub plate_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDetails {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuarantorDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub national_id: String,
}

/// The four screens of the wizard, in order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Vehicle,
    Driver,
    Guarantor,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Vehicle,
        WizardStep::Driver,
        WizardStep::Guarantor,
        WizardStep::Review,
    ];

    pub const fn index(self) -> usize {
        match self {
            WizardStep::Vehicle => 0,
            WizardStep::Driver => 1,
            WizardStep::Guarantor => 2,
            WizardStep::Review => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        WizardStep::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub const fn title(self) -> &'static str {
        match self {
            WizardStep::Vehicle => "Vehicle information",
            WizardStep::Driver => "Driver information",
            WizardStep::Guarantor => "Guarantor information",
            WizardStep::Review => "Review & submit",
        }
    }
}

/// Named placeholder for exactly one uploaded document or video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileSlot {
    ProofOfOwnership,
    VehicleLicense,
    HackneyPermit,
    VehicleInsurance,
    VehicleVideo,
    DriversLicense,
    MeansOfId,
    DriverFacePhoto,
    DriverFullBodyPhoto,
    GuarantorMeansOfId,
}

pub const FILE_SLOT_COUNT: usize = 10;

const DOCUMENT_ACCEPT: &str = "image/*,application/pdf";
const VIDEO_ACCEPT: &str = "video/*";

impl FileSlot {
    pub const ALL: [FileSlot; FILE_SLOT_COUNT] = [
        FileSlot::ProofOfOwnership,
        FileSlot::VehicleLicense,
        FileSlot::HackneyPermit,
        FileSlot::VehicleInsurance,
        FileSlot::VehicleVideo,
        FileSlot::DriversLicense,
        FileSlot::MeansOfId,
        FileSlot::DriverFacePhoto,
        FileSlot::DriverFullBodyPhoto,
        FileSlot::GuarantorMeansOfId,
    ];

    /// Multipart part name expected by the submission endpoint.
    pub const fn part_name(self) -> &'static str {
        match self {
            FileSlot::ProofOfOwnership => "proofOfOwnership",
            FileSlot::VehicleLicense => "vehicleLicense",
            FileSlot::HackneyPermit => "hackneyPermit",
            FileSlot::VehicleInsurance => "vehicleInsurance",
            FileSlot::VehicleVideo => "vehicleVideo",
            FileSlot::DriversLicense => "driversLicense",
            FileSlot::MeansOfId => "meansOfId",
            FileSlot::DriverFacePhoto => "driverFacePhoto",
            FileSlot::DriverFullBodyPhoto => "driverFullBodyPhoto",
            FileSlot::GuarantorMeansOfId => "guarantorMeansOfId",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FileSlot::ProofOfOwnership => "Proof of ownership",
            FileSlot::VehicleLicense => "Vehicle license",
            FileSlot::HackneyPermit => "Hackney permit",
            FileSlot::VehicleInsurance => "Vehicle insurance",
            FileSlot::VehicleVideo => "Vehicle video",
            FileSlot::DriversLicense => "Driver's license",
            FileSlot::MeansOfId => "Means of ID",
            FileSlot::DriverFacePhoto => "Driver face photo",
            FileSlot::DriverFullBodyPhoto => "Driver full body photo",
            FileSlot::GuarantorMeansOfId => "Guarantor means of ID",
        }
    }

    pub const fn step(self) -> WizardStep {
        match self {
            FileSlot::ProofOfOwnership
            | FileSlot::VehicleLicense
            | FileSlot::HackneyPermit
            | FileSlot::VehicleInsurance
            | FileSlot::VehicleVideo => WizardStep::Vehicle,
            FileSlot::DriversLicense
            | FileSlot::MeansOfId
            | FileSlot::DriverFacePhoto
            | FileSlot::DriverFullBodyPhoto => WizardStep::Driver,
            FileSlot::GuarantorMeansOfId => WizardStep::Guarantor,
        }
    }

    /// Advisory picker hint. Never enforced.
    pub const fn accept_hint(self) -> &'static str {
        match self {
            FileSlot::VehicleVideo => VIDEO_ACCEPT,
            _ => DOCUMENT_ACCEPT,
        }
    }

    /// Whether `content_type` matches the advisory hint.
    pub fn accepts(self, content_type: &mime::Mime) -> bool {
        self.accept_hint().split(',').any(|pattern| {
            let pattern = pattern.trim();
            match pattern.split_once('/') {
                Some((kind, "*")) => content_type.type_().as_str() == kind,
                Some(_) => content_type.essence_str() == pattern,
                None => false,
            }
        })
    }

    pub fn from_part_name(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        FileSlot::ALL
            .into_iter()
            .find(|slot| slot.part_name().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for FileSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.part_name())
    }
}

/// A picked file. The bytes are reference counted so re-sending after a failure does not copy them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileHandle {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Full mutable state of one in-progress application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub vehicle: VehicleDetails,
    pub driver: DriverDetails,
    pub guarantor: GuarantorDetails,
    pub files: FileSlots,
}

impl ApplicationForm {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Addresses one scalar text field on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldPath {
    PlateNumber,
    DriverName,
    DriverAddress,
    GuarantorName,
    GuarantorAddress,
    GuarantorPhone,
    GuarantorNationalId,
}

impl FieldPath {
    pub(crate) fn slot_mut(self, form: &mut ApplicationForm) -> &mut String {
        match self {
            FieldPath::PlateNumber => &mut form.vehicle.plate_number,
            FieldPath::DriverName => &mut form.driver.name,
            FieldPath::DriverAddress => &mut form.driver.address,
            FieldPath::GuarantorName => &mut form.guarantor.name,
            FieldPath::GuarantorAddress => &mut form.guarantor.address,
            FieldPath::GuarantorPhone => &mut form.guarantor.phone,
            FieldPath::GuarantorNationalId => &mut form.guarantor.national_id,
        }
    }

    pub fn read(self, form: &ApplicationForm) -> &str {
        match self {
            FieldPath::PlateNumber => &form.vehicle.plate_number,
            FieldPath::DriverName => &form.driver.name,
            FieldPath::DriverAddress => &form.driver.address,
            FieldPath::GuarantorName => &form.guarantor.name,
            FieldPath::GuarantorAddress => &form.guarantor.address,
            FieldPath::GuarantorPhone => &form.guarantor.phone,
            FieldPath::GuarantorNationalId => &form.guarantor.national_id,
        }
    }
}

/// Lifecycle of the single outbound submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        }
    }

    /// Whether a new attempt may start from this state.
    pub const fn can_begin(self) -> bool {
        matches!(self, SubmissionState::Idle | SubmissionState::Failed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionStatus {
    pub state: SubmissionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub attempts: u32,
}
