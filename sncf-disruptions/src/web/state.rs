//! Application state for the web layer.

use tokio::sync::watch;

use crate::sensor::SensorSnapshot;

/// Shared application state.
///
/// Handlers only read; the poll loop holds the sending half.
#[derive(Clone)]
pub struct AppState {
    pub sensor: watch::Receiver<SensorSnapshot>,
}

impl AppState {
    pub fn new(sensor: watch::Receiver<SensorSnapshot>) -> Self {
        Self { sensor }
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> SensorSnapshot {
        self.sensor.borrow().clone()
    }
}
