//! Periodic sensor updates.
//!
//! The poll loop owns the sensor and is its only writer. Readers get
//! snapshots through a `watch` channel, so a slow fetch never blocks them.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::navitia::JourneySource;

use super::entity::{DisruptionSensor, SensorSnapshot, UpdateOutcome};

/// Run one update and publish the result if anything changed.
pub async fn poll_once<S: JourneySource>(
    sensor: &mut DisruptionSensor,
    source: &S,
    now: NaiveDateTime,
    publish: &watch::Sender<SensorSnapshot>,
) -> UpdateOutcome {
    let previous = sensor.state();
    let outcome = sensor.update(source, now).await;

    if outcome == UpdateOutcome::Throttled {
        return outcome;
    }

    if sensor.state() != previous {
        info!(
            sensor = sensor.name(),
            from = ?previous.map(|s| s.to_string()),
            to = ?sensor.state().map(|s| s.to_string()),
            "state changed"
        );
    }
    publish.send_replace(sensor.snapshot());
    outcome
}

/// Update the sensor every `every`, forever.
///
/// Ticks that land inside the sensor's minimum interval are no-ops, so
/// `every` only bounds how late an update can be.
pub async fn run<S: JourneySource>(
    mut sensor: DisruptionSensor,
    source: S,
    every: Duration,
    publish: watch::Sender<SensorSnapshot>,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        poll_once(&mut sensor, &source, Local::now().naive_local(), &publish).await;
    }
}
