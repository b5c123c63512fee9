//! Simulates the Pi by rewriting `public/sensor_data.json` every few seconds,
//! so the `/pi` page can be exercised without hardware.

use planter_reporter::config::ReporterConfig;
use planter_reporter::sensor::SimulatedSource;
use planter_reporter::{file_feed, logging, shutdown};

#[tokio::main]
async fn main() {
    println!("======================================================================");
    println!("SENSOR DATA TEST - Simulating Raspberry Pi Updates");
    println!("======================================================================");

    let config = ReporterConfig::load_or_default();
    logging::init(&config.logging);

    println!(
        "This script will update {} every {} seconds.",
        config.feed.path.display(),
        config.feed.interval_seconds
    );
    println!("Open the website at /pi to see the values change in real-time.");
    println!("Press Ctrl+C to stop\n");

    let mut source = SimulatedSource::new();
    let written = file_feed::run(
        &config.feed.path,
        config.feed.interval(),
        &mut source,
        shutdown::ctrl_c(),
    )
    .await;

    println!(
        "\n\n✓ Test stopped after {} updates. Final {} has been saved.",
        written,
        config.feed.path.display()
    );
}
