use reqwest::multipart::{Form, Part};
use reqwest::Body;

use super::domain::{ApplicationForm, FileHandle, FileSlot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPart {
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub slot: FileSlot,
    pub file: FileHandle,
}

/// Transport-independent multipart body of an application, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationPayload {
    pub fields: Vec<TextPart>,
    pub files: Vec<FilePart>,
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("file '{file_name}' for {slot} has an invalid content type '{content_type}'")]
    InvalidContentType {
        slot: FileSlot,
        file_name: String,
        content_type: String,
    },
    #[error("failed to encode multipart part {slot}: {source}")]
    Encode {
        slot: FileSlot,
        #[source]
        source: reqwest::Error,
    },
}

impl ApplicationPayload {
    /// Snapshot the form. Text values are trimmed and empty slots are left out.
    pub fn from_form(form: &ApplicationForm) -> Self {
        let vehicle_type = form
            .vehicle
            .vehicle_type
            .map(|kind| kind.label().to_string())
            .unwrap_or_default();

        let fields = vec![
            text("vehicleType", &vehicle_type),
            text("plateNumber", &form.vehicle.plate_number),
            text("driverName", &form.driver.name),
            text("driverAddress", &form.driver.address),
            text("guarantorName", &form.guarantor.name),
            text("guarantorAddress", &form.guarantor.address),
            text("guarantorPhone", &form.guarantor.phone),
            text("guarantorNin", &form.guarantor.national_id),
        ];

        let files = form
            .files
            .iter()
            .map(|(slot, file)| FilePart {
                slot,
                file: file.clone(),
            })
            .collect();

        Self { fields, files }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|part| part.name == name)
            .map(|part| part.value.as_str())
    }

    pub fn file(&self, slot: FileSlot) -> Option<&FileHandle> {
        self.files
            .iter()
            .find(|part| part.slot == slot)
            .map(|part| &part.file)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_file_bytes(&self) -> usize {
        self.files.iter().map(|part| part.file.len()).sum()
    }

    /// Content types are checked before anything is encoded.
    pub fn validate(&self) -> Result<(), PayloadError> {
        for part in &self.files {
            if part.file.content_type.parse::<mime::Mime>().is_err() {
                return Err(PayloadError::InvalidContentType {
                    slot: part.slot,
                    file_name: part.file.file_name.clone(),
                    content_type: part.file.content_type.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn into_multipart(self) -> Result<Form, PayloadError> {
        self.validate()?;

        let mut form = Form::new();
        for TextPart { name, value } in self.fields {
            form = form.text(name, value);
        }

        for FilePart { slot, file } in self.files {
            let length = file.bytes.len() as u64;
            let part = Part::stream_with_length(Body::from(file.bytes), length)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|source| PayloadError::Encode { slot, source })?;
            form = form.part(slot.part_name(), part);
        }

        Ok(form)
    }
}

fn text(name: &'static str, raw: &str) -> TextPart {
    TextPart {
        name,
        value: raw.trim().to_string(),
    }
}
