// Engine main entry point
use engine::config::EngineSettings;
use engine::services::run_all;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG overrides the default `info` level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting indicator engine...");

    let settings = EngineSettings::load(std::env::args().nth(1).as_deref())?;

    let summaries = run_all(&settings).await?;
    for summary in &summaries {
        info!(
            symbol = %summary.symbol,
            output = %summary.output_path.display(),
            "Indicators written"
        );
    }
    info!(symbols = summaries.len(), "Done");
    Ok(())
}
