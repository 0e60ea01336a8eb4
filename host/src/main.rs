//! Host harness for the HPRT printer session.
//!
//! Loads configuration, brings the radio up, connects to the configured
//! printer and prints a sample receipt. No vendor SDK is linked into this
//! binary, so the session runs against the recording SDK from
//! `hprt_printer::mock` and every native call shows up in the log.

mod config;
mod printer_helpers;
mod receipt;

use std::time::Duration;

use hprt_printer::PrinterSession;
use hprt_printer::mock::{EnableBehavior, MockPrinter, MockRadio};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use printer_helpers::find_target_printer;

/// Bonded address used when `HPRT_PRINTER_ADDRESS` is not set.
const FALLBACK_ADDRESS: &str = "00:11:22:33:44:55";

/// Simulated radio start-up delay after an enable request.
const RADIO_STARTUP: Duration = Duration::from_millis(500);

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    load_dotenv();
    let config = AppConfig::load()?;
    std::fs::create_dir_all(&config.documents_dir)?;
    tracing::info!(
        connect_type = %config.connect_type,
        documents = %config.documents_dir.display(),
        "Configuration loaded"
    );

    let address = if config.printer_address.is_empty() {
        FALLBACK_ADDRESS
    } else {
        config.printer_address.as_str()
    };
    let radio = MockRadio::disabled(EnableBehavior::After(RADIO_STARTUP))
        .with_bonded(address, Some(config.printer_name.as_str()));
    let mut session =
        PrinterSession::new(MockPrinter::new(), Some(radio), config.session_options()?);

    let mut watch = session.watch_transport();
    let watch_task = tokio::spawn(async move {
        while let Some(enabled) = watch.next_change().await {
            tracing::info!(enabled, "Bluetooth state");
        }
    });

    let outcome = session.enable_transport(None).await?;
    tracing::info!("{outcome}");

    if !config.codepage.is_empty() {
        let encoding = session.apply_codepage(&config.codepage);
        tracing::info!(encoding = %encoding, "Codepage preference processed");
    }

    let printers = session.discover_paired_printers().await?;
    tracing::info!(printers = %serde_json::to_string(&printers)?, "Paired printers");

    let printer = find_target_printer(printers, &config.printer_address)
        .ok_or_else(|| anyhow::anyhow!("printer {} is not paired", config.printer_address))?;
    session.connect(&printer).await?;

    let printed =
        receipt::print_sample_receipt(&session, receipt::SAMPLE_ITEMS, config.new_lines).await;
    session.disconnect().await?;
    printed?;

    tracing::info!(
        native_calls = session.sdk().calls().len(),
        state = ?session.state(),
        "Done"
    );

    watch_task.abort();
    Ok(())
}
