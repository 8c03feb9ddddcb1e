//! The disruption sensor entity.
//!
//! Holds the state and attributes a home automation front end displays
//! for one pair of stations, and refreshes them from a journey source at
//! most once per minimum interval.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use tracing::{debug, error, info};

use crate::domain::{Direction, FormatError, NavitiaTime};
use crate::navitia::{JourneyQuery, JourneySource, NavitiaError};
use crate::status::{DisruptionReport, Evaluation, LineStatus, evaluate, extract};

use super::throttle::MinInterval;

/// Integration domain, used in device identifiers.
pub const DOMAIN: &str = "sncf_disruptions";

/// Default sensor name.
pub const DEFAULT_NAME: &str = "SNCF Disruptions";

/// Data source credit shown with every successful update.
pub const ATTRIBUTION: &str = "Données fournies par Navitia";

/// Minimum time between two fetches, in seconds.
pub const MIN_SECS_BETWEEN_UPDATES: i64 = 5 * 60;

/// Which view of the journeys the sensor publishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SensorMode {
    /// Line status label with one entry per train.
    #[default]
    Status,
    /// Count of disrupted journeys with the next departures.
    Disruptions,
}

/// Errors that turn the sensor into its error state.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error(transparent)]
    Transport(#[from] NavitiaError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// What the sensor currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorState {
    Line(LineStatus),
    DisruptionCount(usize),
    /// The last fetch returned no journey.
    Unavailable,
    /// The last fetch failed.
    Error,
}

impl SensorState {
    pub fn icon(&self) -> &'static str {
        match self {
            SensorState::Line(status) => status.icon(),
            SensorState::DisruptionCount(0) => "mdi:train",
            SensorState::DisruptionCount(_) => "mdi:train-variant-alert",
            SensorState::Unavailable => "mdi:cloud-off-outline",
            SensorState::Error => "mdi:alert-circle",
        }
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorState::Line(status) => f.write_str(status.label()),
            SensorState::DisruptionCount(count) => write!(f, "{count}"),
            SensorState::Unavailable => f.write_str("Indisponible"),
            SensorState::Error => f.write_str("Erreur"),
        }
    }
}

impl Serialize for SensorState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Device the sensor is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// (domain, entry id)
    pub identifiers: (String, String),
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub sw_version: &'static str,
}

/// Sensor configuration.
#[derive(Debug, Clone)]
pub struct SensorConfig {
    /// Display name.
    pub name: String,
    /// Identifier of the configuration this sensor belongs to.
    pub entry_id: String,
    /// Station 1 → station 2.
    pub direction: Direction,
    /// Journeys requested per fetch, if limited.
    pub count: Option<u32>,
    pub mode: SensorMode,
    pub min_update_interval: Duration,
}

impl SensorConfig {
    pub fn new(entry_id: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            entry_id: entry_id.into(),
            direction,
            count: None,
            mode: SensorMode::default(),
            min_update_interval: Duration::seconds(MIN_SECS_BETWEEN_UPDATES),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_count(mut self, count: Option<u32>) -> Self {
        self.count = count;
        self
    }

    pub fn with_mode(mut self, mode: SensorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_min_update_interval(mut self, interval: Duration) -> Self {
        self.min_update_interval = interval;
        self
    }
}

/// Result of calling [`DisruptionSensor::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Called again too soon; nothing was fetched.
    Throttled,
    /// State and attributes were replaced with fresh data.
    Refreshed,
    /// The fetch or evaluation failed; the sensor is in its error state.
    Failed,
}

/// Serializable view of the sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub name: String,
    pub unique_id: String,
    /// `None` until the first update.
    pub state: Option<SensorState>,
    pub icon: &'static str,
    pub attributes: Map<String, Value>,
    pub device: DeviceInfo,
}

/// Disruption sensor for one pair of stations.
#[derive(Debug, Clone)]
pub struct DisruptionSensor {
    config: SensorConfig,
    throttle: MinInterval,
    state: Option<SensorState>,
    attributes: Map<String, Value>,
}

impl DisruptionSensor {
    pub fn new(config: SensorConfig) -> Self {
        let throttle = MinInterval::new(config.min_update_interval);
        Self {
            config,
            throttle,
            state: None,
            attributes: Map::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// `{entry_id}_{station1_id}_{station2_id}`
    pub fn unique_id(&self) -> String {
        format!(
            "{}_{}_{}",
            self.config.entry_id,
            self.config.direction.from.id(),
            self.config.direction.to.id()
        )
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: (DOMAIN.to_string(), self.config.entry_id.clone()),
            name: format!(
                "SNCF {}-{}",
                self.config.direction.from.name(),
                self.config.direction.to.name()
            ),
            manufacturer: "SNCF",
            model: "Train Service",
            sw_version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn mode(&self) -> SensorMode {
        self.config.mode
    }

    pub fn state(&self) -> Option<SensorState> {
        self.state
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn icon(&self) -> &'static str {
        self.state.map_or("mdi:train", |state| state.icon())
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            name: self.config.name.clone(),
            unique_id: self.unique_id(),
            state: self.state,
            icon: self.icon(),
            attributes: self.attributes.clone(),
            device: self.device_info(),
        }
    }

    /// Fetch and re-evaluate, unless the last fetch was too recent.
    ///
    /// `now` is the local wall-clock time: it is sent as the search
    /// datetime and shown as the update time.
    pub async fn update<S: JourneySource>(&mut self, source: &S, now: NaiveDateTime) -> UpdateOutcome {
        if !self.throttle.try_acquire(now) {
            debug!(
                remaining_secs = self.throttle.remaining(now).num_seconds(),
                "update throttled"
            );
            return UpdateOutcome::Throttled;
        }

        match self.refresh(source, now).await {
            Ok(()) => {
                info!(sensor = %self.config.name, state = ?self.state.map(|s| s.to_string()), "sensor updated");
                UpdateOutcome::Refreshed
            }
            Err(e) => {
                error!(sensor = %self.config.name, error = %e, "update failed");
                self.set_error(&e);
                UpdateOutcome::Failed
            }
        }
    }

    async fn refresh<S: JourneySource>(&mut self, source: &S, now: NaiveDateTime) -> Result<(), UpdateError> {
        let query = JourneyQuery::new(self.config.direction.clone(), NavitiaTime::from_datetime(now))
            .with_count(self.config.count);
        let response = source.journeys(&query).await?;

        match self.config.mode {
            SensorMode::Status => self.apply_evaluation(evaluate(&response)?, now),
            SensorMode::Disruptions => {
                let report = if response.is_empty() {
                    None
                } else {
                    Some(extract(&response)?)
                };
                self.apply_disruptions(report, now)
            }
        }
        Ok(())
    }

    /// Replace state and attributes with a status evaluation.
    pub fn apply_evaluation(&mut self, evaluation: Evaluation, now: NaiveDateTime) {
        let mut attributes = Map::new();

        match evaluation {
            Evaluation::Unavailable => {
                self.state = Some(SensorState::Unavailable);
            }
            Evaluation::Report(report) => {
                self.state = Some(SensorState::Line(report.line_status));
                attributes.insert("trains".into(), json!(report.trains));
                attributes.insert("trains_supprimes".into(), json!(report.cancelled_count));
                attributes.insert("trains_retardes".into(), json!(report.delayed_count));
            }
        }

        self.attributes = with_footer(attributes, now);
    }

    /// Replace state and attributes with a disruption listing.
    ///
    /// `None` means the response held no journey at all.
    pub fn apply_disruptions(&mut self, report: Option<DisruptionReport>, now: NaiveDateTime) {
        let mut attributes = Map::new();

        match report {
            None => {
                self.state = Some(SensorState::Unavailable);
            }
            Some(report) => {
                self.state = Some(SensorState::DisruptionCount(report.count()));
                attributes.insert("disruptions".into(), json!(report.disruptions));
                attributes.insert("next_departures".into(), json!(report.next_departures));
            }
        }

        self.attributes = with_footer(attributes, now);
    }

    /// Replace state and attributes with the error state.
    pub fn set_error(&mut self, error: &UpdateError) {
        self.state = Some(SensorState::Error);
        let mut attributes = Map::new();
        attributes.insert("error".into(), Value::String(error.to_string()));
        self.attributes = attributes;
    }
}

/// Add the update time and data credit.
fn with_footer(mut attributes: Map<String, Value>, now: NaiveDateTime) -> Map<String, Value> {
    attributes.insert(
        "derniere_maj".into(),
        Value::String(now.format("%H:%M").to_string()),
    );
    attributes.insert("attribution".into(), Value::String(ATTRIBUTION.into()));
    attributes
}
