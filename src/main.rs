//! ==============================================================================
//! main.rs - planter reporter entry point
//! ==============================================================================
//!
//! purpose:
//!     reads the planter sensors on a fixed cadence and pushes every reading
//!     to the collector api, backing off when the collector misbehaves.
//!
//! responsibilities:
//!     - load configuration (config/reporter.toml or defaults)
//!     - initialise logging
//!     - build the sensor source and the http transmitter
//!     - run the reporter loop until Ctrl+C
//!
//! relationships:
//!     - uses: reporter.rs (the loop), transmitter.rs (http), sensor.rs (source)
//!     - talks to: POST <collector.endpoint> (e.g. /api/sensors on the planter site)
//!
//! ==============================================================================

use anyhow::Result;
use planter_reporter::config::ReporterConfig;
use planter_reporter::reporter::Reporter;
use planter_reporter::sensor::SimulatedSource;
use planter_reporter::transmitter::HttpTransmitter;
use planter_reporter::{logging, shutdown};

#[tokio::main]
async fn main() -> Result<()> {
    // startup banner
    println!("==================================================");
    println!("Automated Planter - Sensor Data Transmission");
    println!("==================================================");

    // step 1: load configuration
    let config = ReporterConfig::load_or_default();
    logging::init(&config.logging);
    config.print_summary();
    println!("Press Ctrl+C to stop\n");

    // step 2: wire up source and transmitter
    let transmitter = HttpTransmitter::new(&config.collector)?;
    tracing::info!(endpoint = transmitter.endpoint(), "[STARTUP] transmitter ready");

    let mut reporter = Reporter::new(SimulatedSource::new(), transmitter, config.backoff.clone())
        .show_readings(config.logging.show_sensor_data);

    // step 3: loop until interrupted
    reporter.run(shutdown::ctrl_c()).await;

    println!("\nSensor data transmission stopped.");
    Ok(())
}
