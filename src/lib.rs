//! Planter sensor reporting.
//!
//! `planter-reporter` pushes readings to the collector API with a
//! failure-escalating backoff; `sensor-file-sim` keeps a json snapshot on
//! disk for front-ends that poll a file instead.

pub mod config;
pub mod domain;
pub mod file_feed;
pub mod logging;
pub mod reporter;
pub mod sensor;
pub mod shutdown;
pub mod transmitter;
