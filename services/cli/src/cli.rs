use crate::apply::{run_apply, ApplyArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::track::{run_track, TrackArgs};
use clap::{Parser, Subcommand};
use haul_onboard::config::AppConfig;
use haul_onboard::error::AppError;
use haul_onboard::telemetry;
use haul_onboard::workflows::onboarding::FileSlot;

#[derive(Parser, Debug)]
#[command(
    name = "haul-onboard",
    about = "Fill, review and submit driver onboarding applications from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk the onboarding wizard with the given details and submit the application
    Apply(ApplyArgs),
    /// List the ten document slots, their wizard step and accepted file types
    Slots,
    /// Look up a shipment by tracking number
    Track(TrackArgs),
    /// Run a scripted application against an in-memory endpoint
    Demo(DemoArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    match cli.command {
        Command::Apply(args) => run_apply(args, &config).await,
        Command::Slots => {
            render_slots();
            Ok(())
        }
        Command::Track(args) => run_track(args, &config).await,
        Command::Demo(args) => run_demo(args, &config).await,
    }
}

fn render_slots() {
    println!("{:<22} {:<24} {:<24} ACCEPTS", "PART", "LABEL", "STEP");
    for slot in FileSlot::ALL {
        println!(
            "{:<22} {:<24} {:<24} {}",
            slot.part_name(),
            slot.label(),
            slot.step().title(),
            slot.accept_hint()
        );
    }
}
