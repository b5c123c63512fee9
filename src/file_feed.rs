//! ==============================================================================
//! file_feed.rs - sensor_data.json writer
//! ==============================================================================
//!
//! purpose:
//!     keeps `public/sensor_data.json` fresh for a front-end that polls it.
//!     each tick the whole file is replaced: the snapshot is written to a
//!     sibling temp file and renamed over the target, so a reader sees either
//!     the previous or the next snapshot, never a partial one.
//!
//! relationships:
//!     - used by: bin/sensor_file_sim.rs
//!     - uses: sensor.rs (SimulatedSource::snapshot)
//!     - writes: domain.rs PlanterSnapshot
//!
//! ==============================================================================

use anyhow::{Context, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::PlanterSnapshot;
use crate::sensor::SimulatedSource;

/// replace `path` with `snapshot` as pretty json
pub fn write_snapshot(path: &Path, snapshot: &PlanterSnapshot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(snapshot).context("Failed to encode snapshot")?;

    let tmp = temp_path(path);
    std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn print_update(snapshot: &PlanterSnapshot) {
    println!(
        "✓ Updated: moisture={:.2}, light={:.2}, temp={:.1}°C, humidity={:.1}%, waterLevel={}",
        snapshot.moisture, snapshot.light, snapshot.temp, snapshot.humidity, snapshot.water_level
    );
}

/// rewrite the feed every `interval` until `shutdown` resolves
///
/// returns the number of snapshots written. a failed write is logged and the
/// next tick tries again.
pub async fn run<F>(
    path: &Path,
    interval: Duration,
    source: &mut SimulatedSource,
    shutdown: F,
) -> u64
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut written = 0;

    loop {
        let snapshot = source.snapshot();
        match write_snapshot(path, &snapshot) {
            Ok(()) => {
                written += 1;
                print_update(&snapshot);
            }
            Err(e) => {
                println!("✗ Write failed: {:#}", e);
                tracing::warn!(error = %format!("{:#}", e), path = %path.display(), "[FEED] write failed");
            }
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    written
}
