use crate::apply::{render_summary, submit_once, walk_to_review};
use crate::infra::{parse_date, InMemoryApplicationGateway};
use crate::track::render_record;
use bytes::Bytes;
use chrono::{Local, NaiveDate};
use clap::Args;
use haul_onboard::config::AppConfig;
use haul_onboard::error::AppError;
use haul_onboard::workflows::onboarding::{
    FieldPath, FileHandle, FileSlot, SubmissionAdapter, VehicleType, WizardController, WizardStep,
};
use haul_onboard::workflows::tracking::TrackingDirectory;
use std::sync::Arc;

const DEMO_REJECTION: &str = "Duplicate plate number";
const DEMO_TRACKING_NUMBER: &str = "hwu-200871";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for the tracking portion (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the tracking lookup at the end of the demo.
    #[arg(long)]
    pub(crate) skip_tracking: bool,
}

pub(crate) async fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let DemoArgs {
        today,
        skip_tracking,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Driver onboarding demo");
    let gateway = Arc::new(InMemoryApplicationGateway::rejecting([
        DEMO_REJECTION.to_string()
    ]));
    let adapter = SubmissionAdapter::new(Arc::clone(&gateway));
    let mut wizard = WizardController::new();

    println!("\n1. Pressing next on an empty vehicle step");
    if let Err(error) = wizard.go_next() {
        println!("   blocked: {error}");
    }

    println!("\n2. Filling every step");
    fill_demo_wizard(&mut wizard);
    walk_to_review(&mut wizard)?;
    render_summary(&wizard.review_summary());

    println!("\n3. First submission");
    if let Err(err) = submit_once(&adapter, &mut wizard).await {
        println!("   {err}");
        println!(
            "   wizard shows: {}",
            wizard.submission().error_message.as_deref().unwrap_or_default()
        );
    }

    println!("\n4. Retrying with the same details");
    submit_once(&adapter, &mut wizard).await?;

    let received = gateway.received();
    let identical = received.windows(2).all(|pair| pair[0] == pair[1]);
    println!(
        "   endpoint received {} request(s); payloads identical: {}",
        received.len(),
        identical
    );

    if !skip_tracking {
        println!("\n5. Tracking a parcel");
        let directory = TrackingDirectory::demo(today, config.tracking.simulated_delay);
        let record = directory.lookup(DEMO_TRACKING_NUMBER).await?;
        render_record(&record);
    }

    Ok(())
}

fn fill_demo_wizard(wizard: &mut WizardController) {
    wizard.select_vehicle_type(Some(VehicleType::Truck));
    wizard.update_field(FieldPath::PlateNumber, "APP-511KD");
    wizard.update_field(FieldPath::DriverName, "Musa Ibrahim");
    wizard.update_field(FieldPath::DriverAddress, "14 Ahmadu Bello Way, Kaduna");
    wizard.update_field(FieldPath::GuarantorName, "Halima Sule");
    wizard.update_field(FieldPath::GuarantorAddress, "3 Constitution Road, Kaduna");
    wizard.update_field(FieldPath::GuarantorPhone, "+2348091112233");
    wizard.update_field(FieldPath::GuarantorNationalId, "45678912301");

    for slot in FileSlot::ALL {
        wizard.pick_file(slot, sample_document(slot));
    }
}

fn sample_document(slot: FileSlot) -> FileHandle {
    let (extension, content_type) = match slot {
        FileSlot::VehicleVideo => ("mp4", "video/mp4"),
        FileSlot::DriverFacePhoto | FileSlot::DriverFullBodyPhoto => ("jpg", "image/jpeg"),
        _ => ("pdf", "application/pdf"),
    };
    FileHandle::new(
        format!("{}.{extension}", slot.part_name()),
        content_type,
        Bytes::from(format!("sample {}", slot.label()).into_bytes()),
    )
}
