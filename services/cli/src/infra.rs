use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use haul_onboard::error::AppError;
use haul_onboard::workflows::onboarding::{
    ApplicationGateway, ApplicationPayload, FileHandle, FileSlot, GatewayError,
    SubmissionReceipt, VehicleType,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// `--file slot=path` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileArg {
    pub(crate) slot: FileSlot,
    pub(crate) path: PathBuf,
}

pub(crate) fn parse_file_arg(raw: &str) -> Result<FileArg, String> {
    let (slot, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SLOT=PATH, got '{raw}'"))?;

    let slot = FileSlot::from_part_name(slot).ok_or_else(|| {
        let known: Vec<&str> = FileSlot::ALL.iter().map(|slot| slot.part_name()).collect();
        format!("unknown file slot '{}' (expected one of: {})", slot.trim(), known.join(", "))
    })?;

    let path = path.trim();
    if path.is_empty() {
        return Err(format!("missing path for slot '{}'", slot.part_name()));
    }

    Ok(FileArg {
        slot,
        path: PathBuf::from(path),
    })
}

pub(crate) fn parse_vehicle_type(raw: &str) -> Result<VehicleType, String> {
    raw.parse::<VehicleType>().map_err(|err| err.to_string())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Read `path` into a file handle, guessing the content type from the extension.
pub(crate) fn load_file(path: &Path) -> Result<FileHandle, AppError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Input(format!("'{}' is not a file path", path.display())))?;
    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    Ok(FileHandle::new(
        file_name,
        content_type.essence_str().to_string(),
        Bytes::from(bytes),
    ))
}

/// Gateway that keeps payloads in memory and answers from a script.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationGateway {
    rejections: Arc<Mutex<Vec<String>>>,
    received: Arc<Mutex<Vec<ApplicationPayload>>>,
}

impl InMemoryApplicationGateway {
    /// Reject the next calls with `messages`, in order, then accept everything.
    pub(crate) fn rejecting(messages: impl IntoIterator<Item = String>) -> Self {
        Self {
            rejections: Arc::new(Mutex::new(messages.into_iter().collect())),
            received: Arc::default(),
        }
    }

    pub(crate) fn received(&self) -> Vec<ApplicationPayload> {
        self.received.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl ApplicationGateway for InMemoryApplicationGateway {
    async fn submit_application(
        &self,
        payload: ApplicationPayload,
    ) -> Result<SubmissionReceipt, GatewayError> {
        let count = {
            let mut received = self.received.lock().expect("gateway mutex poisoned");
            received.push(payload);
            received.len()
        };

        let rejection = {
            let mut rejections = self.rejections.lock().expect("gateway mutex poisoned");
            (!rejections.is_empty()).then(|| rejections.remove(0))
        };

        match rejection {
            Some(message) => Err(GatewayError::Rejected {
                status: 409,
                message: Some(message),
            }),
            None => Ok(SubmissionReceipt {
                status: 201,
                reference: Some(format!("DRV-{count:05}")),
                body: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haul_onboard::workflows::onboarding::ApplicationForm;

    #[test]
    fn file_arg_splits_slot_and_path() {
        let arg = parse_file_arg("guarantorMeansOfId=./scans/guarantor id.png").expect("valid");
        assert_eq!(arg.slot, FileSlot::GuarantorMeansOfId);
        assert_eq!(arg.path, PathBuf::from("./scans/guarantor id.png"));
    }

    #[test]
    fn file_arg_errors_are_descriptive() {
        let missing = parse_file_arg("vehicleVideo").expect_err("no separator");
        assert!(missing.contains("SLOT=PATH"));

        let unknown = parse_file_arg("selfie=me.jpg").expect_err("unknown slot");
        assert!(unknown.contains("unknown file slot 'selfie'"));
        assert!(unknown.contains("driverFacePhoto"));

        let empty = parse_file_arg("meansOfId=  ").expect_err("empty path");
        assert!(empty.contains("meansOfId"));
    }

    #[test]
    fn vehicle_type_parsing_is_case_insensitive() {
        assert_eq!(parse_vehicle_type("Truck"), Ok(VehicleType::Truck));
        assert!(parse_vehicle_type("scooter").is_err());
    }

    #[test]
    fn load_file_guesses_content_type() {
        let dir = std::env::temp_dir().join(format!("haul-onboard-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("walkaround.mp4");
        std::fs::write(&path, b"not really a video").expect("write fixture");

        let handle = load_file(&path).expect("file loads");
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(handle.file_name, "walkaround.mp4");
        assert_eq!(handle.content_type, "video/mp4");
        assert_eq!(handle.len(), 18);
    }

    #[test]
    fn load_file_reports_missing_path() {
        let result = load_file(Path::new("/definitely/not/here/licence.pdf"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[tokio::test]
    async fn in_memory_gateway_rejects_then_accepts() {
        let gateway = InMemoryApplicationGateway::rejecting(["Duplicate plate number".to_string()]);
        let payload = ApplicationPayload::from_form(&ApplicationForm::new());

        let first = gateway.submit_application(payload.clone()).await;
        assert_eq!(
            first.expect_err("scripted rejection").user_message(),
            "Duplicate plate number"
        );

        let second = gateway.submit_application(payload).await.expect("accepted");
        assert_eq!(second.reference.as_deref(), Some("DRV-00002"));
        assert_eq!(gateway.received().len(), 2);
    }
}
