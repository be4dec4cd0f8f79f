use serde::Serialize;

use super::domain::{ApplicationForm, FILE_SLOT_COUNT};

/// Placeholder shown for any empty value on the review screen.
pub const EMPTY_VALUE: &str = "\u{2014}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    pub label: &'static str,
    pub value: String,
}

/// Read-only digest rendered on the final step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub rows: Vec<ReviewRow>,
    pub files_attached: usize,
    pub files_total: usize,
}

impl ReviewSummary {
    pub fn from_form(form: &ApplicationForm) -> Self {
        let vehicle_type = form
            .vehicle
            .vehicle_type
            .map(|kind| kind.label())
            .unwrap_or_default();

        let rows = [
            ("Vehicle type", vehicle_type),
            ("Plate number", form.vehicle.plate_number.as_str()),
            ("Driver name", form.driver.name.as_str()),
            ("Driver address", form.driver.address.as_str()),
            ("Guarantor name", form.guarantor.name.as_str()),
            ("Guarantor phone", form.guarantor.phone.as_str()),
            ("Guarantor address", form.guarantor.address.as_str()),
            ("Guarantor NIN", form.guarantor.national_id.as_str()),
        ]
        .into_iter()
        .map(|(label, raw)| ReviewRow {
            label,
            value: display_value(raw),
        })
        .collect();

        Self {
            rows,
            files_attached: form.files.filled_count(),
            files_total: FILE_SLOT_COUNT,
        }
    }

    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }

    pub fn files_line(&self) -> String {
        format!(
            "{} of {} documents attached",
            self.files_attached, self.files_total
        )
    }
}

fn display_value(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        EMPTY_VALUE.to_string()
    } else {
        trimmed.to_string()
    }
}
