//! Journey-level disruption listing.
//!
//! The older view of a journeys response: one entry per journey rather
//! than per train, carrying the journey's disruption label and the line
//! message. When a journey has several public transport sections, the
//! last one provides the times and message. This is a separate mode from
//! [`evaluate`](super::evaluate) and the two are never mixed in one report.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::domain::{FormatError, format_time};
use crate::navitia::{Journey, JourneyStatus, JourneysResponse};

/// How many journeys are listed as upcoming departures.
pub const NEXT_DEPARTURES: usize = 5;

/// Disruption label for a whole journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisruptionLabel {
    Cancelled,
    SignificantDelays,
}

impl DisruptionLabel {
    /// The label for a journey status, if it is one worth flagging.
    pub fn for_status(status: &JourneyStatus) -> Option<Self> {
        match status {
            JourneyStatus::NoService => Some(DisruptionLabel::Cancelled),
            JourneyStatus::SignificantDelays => Some(DisruptionLabel::SignificantDelays),
            _ => None,
        }
    }
}

impl fmt::Display for DisruptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisruptionLabel::Cancelled => f.write_str("TRAIN SUPPRIMÉ"),
            DisruptionLabel::SignificantDelays => f.write_str("RETARD IMPORTANT"),
        }
    }
}

impl Serialize for DisruptionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One journey as shown in the disruption listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyInfo {
    /// Departure, `HH:MM`.
    pub depart: String,
    /// Arrival, `HH:MM`.
    pub arrivee: String,
    /// Raw Navitia status code, empty for normal service.
    pub status: JourneyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disruption: Option<DisruptionLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Commercial mode and train number, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train: Option<String>,
}

/// Disrupted journeys and the next few departures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisruptionReport {
    /// Journeys carrying a disruption label, in response order.
    pub disruptions: Vec<JourneyInfo>,
    /// The first [`NEXT_DEPARTURES`] journeys, disrupted or not.
    pub next_departures: Vec<JourneyInfo>,
}

impl DisruptionReport {
    /// Number of disrupted journeys.
    pub fn count(&self) -> usize {
        self.disruptions.len()
    }

    /// Whether no journey was listed at all.
    pub fn is_empty(&self) -> bool {
        self.next_departures.is_empty()
    }
}

/// Build the disruption listing for a response.
pub fn extract(response: &JourneysResponse) -> Result<DisruptionReport, FormatError> {
    let mut report = DisruptionReport::default();

    for journey in response.journeys() {
        let Some(info) = journey_info(journey)? else {
            continue;
        };
        if info.disruption.is_some() {
            report.disruptions.push(info.clone());
        }
        if report.next_departures.len() < NEXT_DEPARTURES {
            report.next_departures.push(info);
        }
    }

    Ok(report)
}

/// Summarize a journey from its last public transport section.
///
/// Every section's times are checked; the last one overwrites the others.
/// Returns `None` for journeys without public transport.
pub fn journey_info(journey: &Journey) -> Result<Option<JourneyInfo>, FormatError> {
    let mut info = None;

    for section in journey.public_transport_sections() {
        info = Some(JourneyInfo {
            depart: format_time(section.departure_date_time.as_deref().unwrap_or_default())?,
            arrivee: format_time(section.arrival_date_time.as_deref().unwrap_or_default())?,
            status: journey.status.clone(),
            disruption: DisruptionLabel::for_status(&journey.status),
            message: section.message().map(str::to_string),
            train: section
                .display_informations
                .as_ref()
                .and_then(|d| d.train_label()),
        });
    }

    Ok(info)
}
