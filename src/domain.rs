use serde::{Deserialize, Serialize};

/// one snapshot of planter sensor values, produced fresh each cycle
///
/// this is also the wire body POSTed to the collector.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Reading {
    /// reservoir level (0-100%)
    pub water_level: f64,
    /// ambient light (0-100%)
    pub light_level: f64,
    /// air temperature in celsius
    pub temperature: f64,
    /// relative humidity (0-100%)
    pub humidity: f64,
    /// soil moisture (0-100%)
    pub moisture: f64,
    /// discrete float switches in the reservoir
    pub water_sensors: WaterSensors,
}

/// float switches mounted at 75%, 50% and 25% of reservoir height
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct WaterSensors {
    pub level_75: bool,
    pub level_50: bool,
    pub level_25: bool,
}

impl WaterSensors {
    /// midpoint of the band between the highest submerged switch and the next
    pub fn estimated_level(&self) -> f64 {
        if self.level_75 {
            87.5
        } else if self.level_50 {
            62.5
        } else if self.level_25 {
            37.5
        } else {
            12.5
        }
    }

    /// bit0 = 25%, bit1 = 50%, bit2 = 75%
    pub fn bitmask(&self) -> u8 {
        u8::from(self.level_25) | (u8::from(self.level_50) << 1) | (u8::from(self.level_75) << 2)
    }

    /// physically consistent state with the lowest `count` switches wet
    pub fn filled(count: u8) -> Self {
        Self { level_25: count >= 1, level_50: count >= 2, level_75: count >= 3 }
    }
}

/// record written to sensor_data.json for the front-end to poll
///
/// moisture and light are fractions (0.0-1.0), humidity is a percentage,
/// `water_level` is the float switch bitmask.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct PlanterSnapshot {
    pub moisture: f64,
    pub light: f64,
    pub temp: f64,
    pub humidity: f64,
    #[serde(rename = "waterLevel")]
    pub water_level: u8,
}
