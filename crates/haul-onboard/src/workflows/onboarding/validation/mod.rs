mod rules;

pub use rules::{Requirement, StepRule};

use super::domain::{ApplicationForm, WizardStep};

/// First unmet requirement of a step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub step: WizardStep,
    pub requirement: Requirement,
    pub message: &'static str,
}

/// Ordered rule table for `step`. The review step has none.
pub fn rules_for(step: WizardStep) -> &'static [StepRule] {
    rules::table_for(step)
}

/// Check `form` against the rules of `step`, stopping at the first failure.
pub fn validate_step(step: WizardStep, form: &ApplicationForm) -> Result<(), ValidationError> {
    match rules::first_violation(step, form) {
        Some(rule) => Err(ValidationError {
            step,
            requirement: rule.requirement,
            message: rule.message,
        }),
        None => Ok(()),
    }
}

/// Every step up to and including `through`, in order.
pub fn validate_through(
    through: WizardStep,
    form: &ApplicationForm,
) -> Result<(), ValidationError> {
    WizardStep::ALL
        .into_iter()
        .take_while(|step| *step <= through)
        .try_for_each(|step| validate_step(step, form))
}
