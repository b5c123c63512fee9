//! ==============================================================================
//! sensor.rs - sensor source capability
//! ==============================================================================
//!
//! purpose:
//!     abstracts where a Reading comes from. the reporter only ever asks a
//!     `SensorSource` for the next reading; it never touches hardware.
//!
//! relationships:
//!     - used by: reporter.rs (one read per cycle)
//!     - used by: bin/sensor_file_sim.rs (snapshot generation)
//!     - produces: domain.rs (Reading, PlanterSnapshot)
//!
//! real drivers (gpio float switches, i2c climate sensor, adc for light and
//! soil moisture) plug in by implementing `SensorSource`. this crate ships the
//! simulated source only.
//!
//! ==============================================================================

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{PlanterSnapshot, Reading, WaterSensors};

/// produces one reading on demand
///
/// an `Err` is treated by the reporter as an unexpected fault: logged,
/// short pause, next cycle.
pub trait SensorSource {
    fn read(&mut self) -> Result<Reading>;
}

/// random values in plausible planter ranges
pub struct SimulatedSource {
    rng: StdRng,
}

impl SimulatedSource {
    pub fn new() -> Self {
        tracing::info!("Using SIMULATED sensor source (no hardware access)");
        Self { rng: StdRng::from_os_rng() }
    }

    /// deterministic source for tests and demos
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// snapshot for the sensor_data.json feed
    pub fn snapshot(&mut self) -> PlanterSnapshot {
        // 0-3 switches wet, filled from the bottom up
        let switches = WaterSensors::filled(self.rng.random_range(0..=3));
        PlanterSnapshot {
            moisture: self.rng.random_range(0.3..0.7),
            light: self.rng.random_range(0.4..0.9),
            temp: self.rng.random_range(18.0..28.0),
            humidity: self.rng.random_range(40.0..70.0),
            water_level: switches.bitmask(),
        }
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for SimulatedSource {
    fn read(&mut self) -> Result<Reading> {
        let reading = Reading {
            water_level: self.rng.random_range(20.0..100.0),
            light_level: self.rng.random_range(30.0..90.0),
            temperature: self.rng.random_range(18.0..30.0),
            humidity: self.rng.random_range(40.0..80.0),
            moisture: self.rng.random_range(30.0..70.0),
            water_sensors: WaterSensors {
                level_75: self.rng.random_bool(0.5),
                level_50: self.rng.random_bool(0.5),
                level_25: self.rng.random_bool(0.5),
            },
        };
        tracing::debug!(?reading, "[SIM] reading generated");
        Ok(reading)
    }
}

/// print the per-cycle reading block
pub fn print_reading(reading: &Reading) {
    println!(
        "\n[{}] Reading sensors...",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("  Water: {:.1}%", reading.water_level);
    println!("  Light: {:.1}%", reading.light_level);
    println!("  Temp:  {:.1}°C", reading.temperature);
    println!("  Humidity: {:.1}%", reading.humidity);
    println!("  Moisture: {:.1}%", reading.moisture);

    let switches = &reading.water_sensors;
    let mark = |wet: bool| if wet { "✓" } else { "✗" };
    println!(
        "  Float switches: 25% {} 50% {} 75% {} (~{:.1}%)",
        mark(switches.level_25),
        mark(switches.level_50),
        mark(switches.level_75),
        switches.estimated_level()
    );
}
