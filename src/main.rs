use mogulsync::{startup, sync};
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting mogulsync");

    // Load configuration
    let config = startup::load_config()?;

    // Run a single sequential sync
    let report = sync::run_once(&config).await?;

    info!(
        calendar_id = %report.calendar_id,
        candidates = report.candidate_dates,
        inserted = report.inserted,
        "Sync complete"
    );

    Ok(())
}
