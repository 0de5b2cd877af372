use std::io;
use std::process::ExitCode;

use tracing::error;
use wst_rs::journal::open_journal;
use wst_rs::market_data::adapters::cryptsy::CryptsyAdapter;
use wst_rs::market_data::normaliser::Normaliser;
use wst_rs::report::Reporter;
use wst_rs::settings::Settings;
use wst_rs::telemetry;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok(); // load .env

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings.log_filter);

    let adapter = CryptsyAdapter::new(&settings.api_url, settings.market_id)
        .with_retry(settings.retry_policy());
    let reporter = Reporter::new(
        adapter,
        &settings.market_code,
        Normaliser::new(settings.price_decimals),
    );

    // Held for this run only; dropping it flushes and closes the file.
    let log_path = settings.log_path(std::env::var_os("HOME").as_deref());
    let mut journal = open_journal(settings.log_enabled, &log_path);

    let mut stdout = io::stdout().lock();
    match reporter.run(journal.as_mut(), &mut stdout).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %e, "Failed to report market");
            Ok(ExitCode::FAILURE)
        }
    }
}
