use super::super::domain::{ApplicationForm, FieldPath, FileSlot, WizardStep};

/// What a single rule needs to see on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    VehicleTypeSelected,
    Text(FieldPath),
    File(FileSlot),
}

/// One ordered predicate/message pair of a step's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRule {
    pub requirement: Requirement,
    pub message: &'static str,
}

impl StepRule {
    const fn new(requirement: Requirement, message: &'static str) -> Self {
        Self {
            requirement,
            message,
        }
    }

    pub fn holds(&self, form: &ApplicationForm) -> bool {
        match self.requirement {
            Requirement::VehicleTypeSelected => form.vehicle.vehicle_type.is_some(),
            Requirement::Text(field) => !field.read(form).trim().is_empty(),
            Requirement::File(slot) => form.files.is_filled(slot),
        }
    }
}

const VEHICLE_RULES: &[StepRule] = &[
    StepRule::new(
        Requirement::VehicleTypeSelected,
        "Please select a vehicle type.",
    ),
    StepRule::new(
        Requirement::Text(FieldPath::PlateNumber),
        "Plate number is required.",
    ),
    StepRule::new(
        Requirement::File(FileSlot::ProofOfOwnership),
        "Proof of ownership is required.",
    ),
    StepRule::new(
        Requirement::File(FileSlot::VehicleLicense),
        "Vehicle license is required.",
    ),
    StepRule::new(
        Requirement::File(FileSlot::HackneyPermit),
        "Hackney permit is required.",
    ),
    StepRule::new(
        Requirement::File(FileSlot::VehicleInsurance),
        "Vehicle insurance is required.",
    ),
    StepRule::new(
        Requirement::File(FileSlot::VehicleVideo),
        "Vehicle video is required.",
    ),
];

const DRIVER_RULES: &[StepRule] = &[
    StepRule::new(
        Requirement::Text(FieldPath::DriverName),
        "Driver name is required.",
    ),
    StepRule::new(
        Requirement::Text(FieldPath::DriverAddress),
        "Driver address is required.",
    ),
    StepRule::new(
        Requirement::File(FileSlot::DriversLicense),
        "Driver's license is required.",
    ),
    StepRule::new(
        Requirement::File(FileSlot::MeansOfId),
        "Means of ID is required.",
    ),
    StepRule::new(
        Requirement::File(FileSlot::DriverFacePhoto),
        "Driver face photo is required.",
    ),
    StepRule::new(
        Requirement::File(FileSlot::DriverFullBodyPhoto),
        "Driver full body photo is required.",
    ),
];

const GUARANTOR_RULES: &[StepRule] = &[
    StepRule::new(
        Requirement::Text(FieldPath::GuarantorName),
        "Guarantor name is required.",
    ),
    StepRule::new(
        Requirement::Text(FieldPath::GuarantorAddress),
        "Guarantor address is required.",
    ),
    StepRule::new(
        Requirement::Text(FieldPath::GuarantorPhone),
        "Guarantor phone is required.",
    ),
    StepRule::new(
        Requirement::Text(FieldPath::GuarantorNationalId),
        "Guarantor NIN is required.",
    ),
    StepRule::new(
        Requirement::File(FileSlot::GuarantorMeansOfId),
        "Guarantor means of ID is required.",
    ),
];

pub(crate) fn table_for(step: WizardStep) -> &'static [StepRule] {
    match step {
        WizardStep::Vehicle => VEHICLE_RULES,
        WizardStep::Driver => DRIVER_RULES,
        WizardStep::Guarantor => GUARANTOR_RULES,
        WizardStep::Review => &[],
    }
}

pub(crate) fn first_violation(
    step: WizardStep,
    form: &ApplicationForm,
) -> Option<&'static StepRule> {
    table_for(step).iter().find(|rule| !rule.holds(form))
}
