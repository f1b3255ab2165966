use anyhow::Result;
use chrono::Local;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use skin_monitor::browser::WebDriverPage;
use skin_monitor::config::{Config, ScanSettings, TargetFile};
use skin_monitor::scanner::{RunSummary, TargetScheduler, WorkerShard};
use skin_monitor::telegram::{DisabledNotifier, Notifier, TelegramNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skin_monitor=info".parse()?),
        )
        .init();

    info!("Starting Skin Monitor");

    // Load configuration
    let config = Config::load()?;
    let target_file = TargetFile::load(&config.data_file)?;
    let settings = ScanSettings::new(&config, target_file.max_price)?;

    // Split targets between workers
    let shard = WorkerShard::new(config.worker_id, config.total_workers)?;
    let range = shard.range(target_file.targets.len());
    let targets = shard.slice(&target_file.targets);

    info!("Worker {}/{}", shard.index(), shard.total());
    info!(
        "Targets total: {}, mine: {}-{} ({})",
        target_file.targets.len(),
        range.start + 1,
        range.end,
        targets.len()
    );
    info!("Max price: ${}", settings.max_price);
    info!("Stop when price > firstPrice * {}", settings.stop_multiplier);

    let notifier: Box<dyn Notifier> = match TelegramNotifier::from_config(&config)? {
        Some(telegram) => Box::new(telegram),
        None => {
            warn!("Telegram credentials missing, notifications disabled");
            Box::new(DisabledNotifier)
        }
    };

    let mut page = WebDriverPage::connect(&config, &settings).await?;
    let scheduler = TargetScheduler::new(&settings, notifier.as_ref());

    if let Some(seconds) = config.scan_interval_seconds {
        let mut interval = interval(Duration::from_secs(seconds));

        loop {
            interval.tick().await;

            info!(
                "--- Starting new scan cycle at {} ---",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            );
            let summary = scheduler.run(&mut page, targets).await;
            log_summary(&summary);

            info!("Scan cycle completed, waiting {} seconds", seconds);
        }
    }

    let summary = scheduler.run(&mut page, targets).await;
    log_summary(&summary);

    page.close().await?;
    info!("Done.");
    Ok(())
}

fn log_summary(summary: &RunSummary) {
    info!(
        "Scanned {} targets ({} skipped), {} hits ({} undelivered)",
        summary.targets_scanned,
        summary.targets_failed,
        summary.hits,
        summary.delivery_failures
    );
}
