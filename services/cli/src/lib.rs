mod apply;
mod cli;
mod demo;
mod infra;
mod track;

use haul_onboard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
