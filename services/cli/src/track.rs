use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use haul_onboard::config::AppConfig;
use haul_onboard::error::AppError;
use haul_onboard::workflows::tracking::{TrackingDirectory, TrackingRecord};

#[derive(Args, Debug)]
pub(crate) struct TrackArgs {
    /// Tracking number, e.g. HWU-100234 (case-insensitive)
    pub(crate) number: String,
    /// Reference date for the sample shipments (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the record as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_track(args: TrackArgs, config: &AppConfig) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let directory = TrackingDirectory::demo(today, config.tracking.simulated_delay);

    println!("Looking up {}...", args.number.trim());
    let record = directory.lookup(&args.number).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        render_record(&record);
    }
    Ok(())
}

pub(crate) fn render_record(record: &TrackingRecord) {
    println!("\nShipment {}", record.tracking_number);
    println!("  Status             {}", record.status_label);
    println!("  Route              {} -> {}", record.origin, record.destination);
    println!("  Estimated delivery {}", record.estimated_delivery.format("%a %d %b %Y"));
    println!("  History");
    for checkpoint in &record.checkpoints {
        println!(
            "    {}  {:<20} {}",
            checkpoint.at.format("%Y-%m-%d %H:%M"),
            checkpoint.location,
            checkpoint.description
        );
    }
}
