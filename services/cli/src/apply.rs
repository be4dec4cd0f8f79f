use crate::infra::{load_file, parse_file_arg, parse_vehicle_type, FileArg};
use clap::Args;
use haul_onboard::config::AppConfig;
use haul_onboard::error::AppError;
use haul_onboard::workflows::onboarding::{
    ApplicationGateway, ApplicationPayload, FieldPath, HttpApplicationGateway, ReviewSummary,
    SubmissionAdapter, SubmissionState, VehicleType, WizardController, WizardStep,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Args, Debug, Default)]
pub(crate) struct ApplyArgs {
    /// Vehicle type: van, bike, lorry or truck
    #[arg(long, value_parser = parse_vehicle_type)]
    pub(crate) vehicle_type: Option<VehicleType>,
    #[arg(long)]
    pub(crate) plate_number: Option<String>,
    #[arg(long)]
    pub(crate) driver_name: Option<String>,
    #[arg(long)]
    pub(crate) driver_address: Option<String>,
    #[arg(long)]
    pub(crate) guarantor_name: Option<String>,
    #[arg(long)]
    pub(crate) guarantor_address: Option<String>,
    #[arg(long)]
    pub(crate) guarantor_phone: Option<String>,
    /// Guarantor national identification number
    #[arg(long)]
    pub(crate) guarantor_nin: Option<String>,
    /// Attach a document, e.g. `--file vehicleVideo=walkaround.mp4`. Repeat per slot.
    #[arg(long = "file", value_name = "SLOT=PATH", value_parser = parse_file_arg)]
    pub(crate) files: Vec<FileArg>,
    /// Override the configured submission endpoint
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
    /// Validate every step and print the review summary as JSON without sending
    #[arg(long)]
    pub(crate) dry_run: bool,
}

#[derive(Debug, Serialize)]
struct DryRunReport<'a> {
    summary: &'a ReviewSummary,
    fields: Vec<(&'static str, &'a str)>,
    files: Vec<DryRunFile<'a>>,
}

#[derive(Debug, Serialize)]
struct DryRunFile<'a> {
    part: &'static str,
    file_name: &'a str,
    content_type: &'a str,
    bytes: usize,
}

pub(crate) async fn run_apply(args: ApplyArgs, config: &AppConfig) -> Result<(), AppError> {
    let submission = match args.endpoint.clone() {
        Some(endpoint) => config.submission.clone().with_endpoint(endpoint)?,
        None => config.submission.clone(),
    };

    let mut wizard = fill_wizard(&args)?;
    walk_to_review(&mut wizard)?;

    let summary = wizard.review_summary();
    if args.dry_run {
        let payload = ApplicationPayload::from_form(wizard.form());
        println!("{}", serde_json::to_string_pretty(&dry_run_report(&summary, &payload))?);
        return Ok(());
    }

    render_summary(&summary);
    let gateway = HttpApplicationGateway::from_config(&submission)?;
    info!(endpoint = %gateway.endpoint(), "submitting application");
    submit_once(&SubmissionAdapter::new(Arc::new(gateway)), &mut wizard).await
}

/// Populate a fresh wizard from the command line. Fields left out stay empty.
pub(crate) fn fill_wizard(args: &ApplyArgs) -> Result<WizardController, AppError> {
    let mut wizard = WizardController::new();
    wizard.select_vehicle_type(args.vehicle_type);

    let fields = [
        (FieldPath::PlateNumber, &args.plate_number),
        (FieldPath::DriverName, &args.driver_name),
        (FieldPath::DriverAddress, &args.driver_address),
        (FieldPath::GuarantorName, &args.guarantor_name),
        (FieldPath::GuarantorAddress, &args.guarantor_address),
        (FieldPath::GuarantorPhone, &args.guarantor_phone),
        (FieldPath::GuarantorNationalId, &args.guarantor_nin),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            wizard.update_field(field, value.as_str());
        }
    }

    for FileArg { slot, path } in &args.files {
        let file = load_file(path)?;
        if let Ok(content_type) = file.content_type.parse::<mime::Mime>() {
            if !slot.accepts(&content_type) {
                warn!(
                    slot = slot.part_name(),
                    content_type = %content_type,
                    expected = slot.accept_hint(),
                    "file type does not match the slot hint"
                );
            }
        }
        wizard.pick_file(*slot, file);
    }

    Ok(wizard)
}

/// Press "next" until the review step, stopping at the first unmet requirement.
pub(crate) fn walk_to_review(wizard: &mut WizardController) -> Result<(), AppError> {
    while wizard.step() != WizardStep::Review {
        let completed = wizard.step();
        wizard.go_next()?;
        println!("\u{2713} {}", completed.title());
    }
    Ok(())
}

/// Submit once; a failure is reported and returned, never retried here.
pub(crate) async fn submit_once<G>(
    adapter: &SubmissionAdapter<G>,
    wizard: &mut WizardController,
) -> Result<(), AppError>
where
    G: ApplicationGateway + 'static,
{
    let ticket = wizard.begin_submission()?;
    let handle = adapter.dispatch(ticket);
    println!("Submitting...");

    tokio::select! {
        outcome = handle.outcome() => {
            wizard.finish_submission(outcome);
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted while submitting");
            wizard.abandon_submission();
        }
    }

    let status = wizard.submission();
    match status.state {
        SubmissionState::Succeeded => {
            let at = status
                .submitted_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_default();
            println!("Application submitted successfully {at}");
            Ok(())
        }
        _ => Err(AppError::Submission(
            status
                .error_message
                .clone()
                .unwrap_or_else(|| status.state.label().to_string()),
        )),
    }
}

pub(crate) fn render_summary(summary: &ReviewSummary) {
    println!("\n{}", WizardStep::Review.title());
    for row in &summary.rows {
        println!("  {:<18} {}", row.label, row.value);
    }
    println!("  {}", summary.files_line());
}

fn dry_run_report<'a>(
    summary: &'a ReviewSummary,
    payload: &'a ApplicationPayload,
) -> DryRunReport<'a> {
    DryRunReport {
        summary,
        fields: payload
            .fields
            .iter()
            .map(|part| (part.name, part.value.as_str()))
            .collect(),
        files: payload
            .files
            .iter()
            .map(|part| DryRunFile {
                part: part.slot.part_name(),
                file_name: &part.file.file_name,
                content_type: &part.file.content_type,
                bytes: part.file.len(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_without_files() -> ApplyArgs {
        ApplyArgs {
            vehicle_type: Some(VehicleType::Bike),
            plate_number: Some("  LND-901AA ".to_string()),
            driver_name: Some("Tunde Bakare".to_string()),
            driver_address: Some("7 Herbert Macaulay Way".to_string()),
            guarantor_name: Some("Ngozi Okafor".to_string()),
            guarantor_address: Some("22 Awolowo Road".to_string()),
            guarantor_phone: Some("08031234567".to_string()),
            guarantor_nin: Some("98765432109".to_string()),
            ..ApplyArgs::default()
        }
    }

    #[test]
    fn fill_keeps_raw_values_and_stops_at_first_missing_document() {
        let args = args_without_files();
        let mut wizard = fill_wizard(&args).expect("no files to load");
        assert_eq!(FieldPath::PlateNumber.read(wizard.form()), "  LND-901AA ");

        let err = walk_to_review(&mut wizard).expect_err("documents missing");
        match err {
            AppError::Validation(error) => {
                assert_eq!(error.step, WizardStep::Vehicle);
                assert_eq!(error.message, "Proof of ownership is required.");
            }
            other => panic!("expected validation error, got {other}"),
        }
        assert_eq!(wizard.step(), WizardStep::Vehicle);
    }

    #[test]
    fn dry_run_report_lists_trimmed_fields() {
        let wizard = fill_wizard(&args_without_files()).expect("no files to load");
        let summary = wizard.review_summary();
        let payload = ApplicationPayload::from_form(wizard.form());

        let report = dry_run_report(&summary, &payload);
        assert_eq!(report.fields.len(), 8);
        assert_eq!(report.fields[0], ("vehicleType", "BIKE"));
        assert_eq!(report.fields[1], ("plateNumber", "LND-901AA"));
        assert!(report.files.is_empty());

        let json = serde_json::to_value(&report).expect("serializes");
        assert_eq!(json["summary"]["files_total"], 10);
        assert_eq!(json["summary"]["rows"][1]["value"], "LND-901AA");
    }
}
