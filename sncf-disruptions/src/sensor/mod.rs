//! Home-automation style sensor for one pair of stations.
//!
//! The sensor exposes a state label and an attribute map, refreshed from
//! a [`JourneySource`](crate::navitia::JourneySource) no more than once
//! every five minutes by default.

mod entity;
mod poller;
mod throttle;

pub use entity::{
    ATTRIBUTION, DEFAULT_NAME, DOMAIN, DeviceInfo, DisruptionSensor, MIN_SECS_BETWEEN_UPDATES,
    SensorConfig, SensorMode, SensorSnapshot, SensorState, UpdateError, UpdateOutcome,
};
pub use poller::{poll_once, run};
pub use throttle::MinInterval;
