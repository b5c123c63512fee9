//! ==============================================================================
//! reporter.rs - the read / send / back off loop
//! ==============================================================================
//!
//! purpose:
//!     drives one sensor source and one transmitter through an explicit
//!     state machine until the shutdown future resolves.
//!
//! ```text
//!         ┌─────────┐  read ok   ┌─────────┐  success (interval)
//!         │ Reading │ ─────────> │ Sending │ ───────────────────┐
//!         └─────────┘            └────┬────┘                    │
//!              ^                      │ rejected / network      │
//!              │                      v                         │
//!              │               ┌─────────────┐                  │
//!              └────────────── │ CoolingDown │ <── unexpected   │
//!              └────────────── └─────────────┘                  │
//!              └────────────────────────────────────────────────┘
//!
//!     any state ──(shutdown)──> Stopped
//! ```
//!
//! failure policy:
//!     - success resets the failure counter
//!     - rejected / network error increments it; below `max_failures` the
//!       loop waits `retry_delay`, at the threshold it waits
//!       `escalated_delay` once and then resets the counter
//!     - a fault outside the outcome taxonomy waits `unexpected_delay` and
//!       leaves the counter alone
//!
//! relationships:
//!     - uses: sensor.rs (SensorSource), transmitter.rs (Transmit)
//!     - configured by: config.rs (BackoffConfig)
//!     - driven by: main.rs
//!
//! ==============================================================================

use std::future::Future;
use std::time::Duration;

use crate::config::BackoffConfig;
use crate::sensor::{self, SensorSource};
use crate::transmitter::{Transmit, TransmissionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Reading,
    Sending,
    CoolingDown,
    Stopped,
}

/// the only mutable state the loop carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopState {
    consecutive_failures: u32,
}

impl LoopState {
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    fn record_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    fn reset(&mut self) {
        self.consecutive_failures = 0;
    }
}

/// the pause chosen at the end of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// after a success
    Interval(Duration),
    /// after a failure below the threshold
    Retry(Duration),
    /// threshold reached; the counter resets once the wait completes
    Escalated { delay: Duration, failures: u32 },
    /// after a fault outside the outcome taxonomy
    Unexpected(Duration),
}

impl Backoff {
    pub fn duration(&self) -> Duration {
        match *self {
            Self::Interval(d) | Self::Retry(d) | Self::Unexpected(d) => d,
            Self::Escalated { delay, .. } => delay,
        }
    }

    /// line printed before the wait starts
    fn announcement(&self) -> String {
        match *self {
            Self::Interval(_) => "  Waiting for next reading...\n".to_string(),
            Self::Retry(d) => format!("  Retrying in {} seconds...\n", d.as_secs()),
            Self::Escalated { delay, failures } => format!(
                "\n⚠ Too many failures ({}). Waiting {} seconds before retrying...\n",
                failures,
                delay.as_secs()
            ),
            Self::Unexpected(d) => format!("  Waiting {} seconds before retrying...\n", d.as_secs()),
        }
    }
}

/// what one Reading → Sending pass produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// operator-facing outcome line (✓ / ✗)
    pub message: String,
    pub backoff: Backoff,
}

pub struct Reporter<S, T> {
    source: S,
    transmitter: T,
    policy: BackoffConfig,
    show_readings: bool,
    state: LoopState,
    phase: Phase,
}

impl<S: SensorSource, T: Transmit> Reporter<S, T> {
    pub fn new(source: S, transmitter: T, policy: BackoffConfig) -> Self {
        Self {
            source,
            transmitter,
            policy,
            show_readings: true,
            state: LoopState::default(),
            phase: Phase::Reading,
        }
    }

    /// echo each reading to the console before sending it
    pub fn show_readings(mut self, show: bool) -> Self {
        self.show_readings = show;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Reading → Sending → next phase, without waiting
    pub async fn cycle(&mut self) -> Cycle {
        self.phase = Phase::Reading;
        let reading = match self.source.read() {
            Ok(reading) => reading,
            Err(e) => return self.unexpected(e),
        };
        if self.show_readings {
            sensor::print_reading(&reading);
        }

        self.phase = Phase::Sending;
        let outcome = match self.transmitter.send(&reading).await {
            Ok(outcome) => outcome,
            Err(e) => return self.unexpected(e),
        };

        let message = outcome.to_string();
        let backoff = self.classify(&outcome);
        Cycle { message, backoff }
    }

    fn classify(&mut self, outcome: &TransmissionOutcome) -> Backoff {
        if outcome.is_success() {
            self.state.record_success();
            self.phase = Phase::Reading;
            return Backoff::Interval(self.policy.update_interval());
        }

        self.phase = Phase::CoolingDown;
        let failures = self.state.record_failure();
        tracing::debug!(failures, max = self.policy.max_failures, "[REPORTER] send failed");
        if failures >= self.policy.max_failures {
            Backoff::Escalated { delay: self.policy.escalated_delay(), failures }
        } else {
            Backoff::Retry(self.policy.retry_delay())
        }
    }

    fn unexpected(&mut self, error: anyhow::Error) -> Cycle {
        tracing::warn!(error = %format!("{:#}", error), "[REPORTER] unexpected fault");
        self.phase = Phase::CoolingDown;
        Cycle {
            message: format!("✗ Unexpected error: {:#}", error),
            backoff: Backoff::Unexpected(self.policy.unexpected_delay()),
        }
    }

    /// leave the wait and return to Reading
    pub fn finish_wait(&mut self, backoff: &Backoff) {
        if let Backoff::Escalated { .. } = backoff {
            self.state.reset();
        }
        self.phase = Phase::Reading;
    }

    /// run until `shutdown` resolves; it is checked during every step and wait
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let cycle = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                cycle = self.cycle() => cycle,
            };

            println!("{}", cycle.message);
            println!("{}", cycle.backoff.announcement());

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(cycle.backoff.duration()) => {}
            }
            self.finish_wait(&cycle.backoff);
        }

        self.phase = Phase::Stopped;
        println!("\n\nStopping sensor data transmission...");
        tracing::info!(
            failures = self.state.consecutive_failures(),
            "[REPORTER] stopped"
        );
    }
}
