use anyhow::{bail, Result};
use std::fs;

use skin_monitor::browser::{parse_listing_page, ListingPage, WebDriverPage};
use skin_monitor::config::{Config, ScanSettings};
use skin_monitor::parsers::{parse_number, ProbeMode};
use skin_monitor::scanner::AttributeProbe;

/// Open the first page of one listing and dump what the scanner would see.
#[tokio::main]
async fn main() -> Result<()> {
    let Some(listing_name) = std::env::args().nth(1) else {
        bail!("usage: inspect_listing <market listing name>");
    };

    let config = Config::load()?;
    let settings = ScanSettings::new(&config, f64::MAX)?;
    let url = settings.market.listing_url(&listing_name).to_string();

    let mut page = WebDriverPage::connect(&config, &settings).await?;

    println!("Opening {}...", url);
    page.open(&url).await?;

    let html = page.source().await?;
    fs::write("listing_sample.html", &html)?;

    let snapshot = parse_listing_page(&html);
    println!(
        "Found {} listing rows, last page link: {:?}",
        snapshot.rows.len(),
        snapshot.last_page
    );

    let probe = AttributeProbe::new(settings.probe, ProbeMode::WearAndPattern);
    for (index, row) in snapshot.rows.iter().enumerate() {
        let reading = probe.probe(&mut page, index).await;
        println!(
            "#{:<2} id={:<20} price={:<14} parsed={:?} wear={:?} pattern={:?}",
            index + 1,
            row.listing_id.0,
            row.price_text.as_deref().unwrap_or("-"),
            row.price_text.as_deref().and_then(parse_number),
            reading.wear_rating,
            reading.pattern_template
        );
    }

    page.close().await?;
    Ok(())
}
