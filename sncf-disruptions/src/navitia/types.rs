//! Navitia journeys API response DTOs.
//!
//! These types map directly to the JSON returned by
//! `/coverage/{region}/journeys`. Only the fields used for disruption
//! tracking are modelled; everything else is ignored on deserialization.
//! Navitia omits fields rather than sending null in most places, hence the
//! liberal use of `Option` and `#[serde(default)]`.

use serde::{Deserialize, Serialize};

/// Section type for legs travelled on a train, bus, tram, etc.
pub const PUBLIC_TRANSPORT: &str = "public_transport";

/// Top-level response of the journeys endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JourneysResponse {
    /// Candidate journeys. Absent when Navitia found no solution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journeys: Option<Vec<Journey>>,

    /// Error object Navitia sends alongside (or instead of) journeys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

impl JourneysResponse {
    /// Build a response from a list of journeys.
    pub fn from_journeys(journeys: Vec<Journey>) -> Self {
        Self {
            journeys: Some(journeys),
            error: None,
        }
    }

    /// The journeys, treating an absent key as empty.
    pub fn journeys(&self) -> &[Journey] {
        self.journeys.as_deref().unwrap_or(&[])
    }

    /// Whether the response carries no journey at all.
    pub fn is_empty(&self) -> bool {
        self.journeys().is_empty()
    }
}

/// Navitia error object, e.g. `{"id": "no_solution", "message": "..."}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
}

/// One possible trip between the two stations.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Journey {
    /// Worst disruption effect affecting this journey.
    #[serde(default)]
    pub status: JourneyStatus,

    /// Legs of the journey, in travel order.
    #[serde(default)]
    pub sections: Vec<Section>,

    /// Total duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,

    /// Number of changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_transfers: Option<u32>,
}

impl Journey {
    /// Sections travelled on public transport, in order.
    pub fn public_transport_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.is_public_transport())
    }
}

/// A single leg of a journey.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Section {
    /// Leg kind: `public_transport`, `street_network`, `transfer`, `waiting`, ...
    #[serde(rename = "type", default)]
    pub section_type: String,

    /// Departure time (`YYYYMMDDThhmmss`). Missing on some non-transport legs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date_time: Option<String>,

    /// Arrival time (`YYYYMMDDThhmmss`). Missing on some non-transport legs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date_time: Option<String>,

    /// Calling points of the vehicle within this leg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_date_times: Option<Vec<StopDateTime>>,

    /// Line and vehicle information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_informations: Option<DisplayInformations>,
}

impl Section {
    pub fn is_public_transport(&self) -> bool {
        self.section_type == PUBLIC_TRANSPORT
    }

    /// Calling points, treating an absent list as empty.
    pub fn stops(&self) -> &[StopDateTime] {
        self.stop_date_times.as_deref().unwrap_or(&[])
    }

    /// Free-text disruption message attached to the line, if any.
    pub fn message(&self) -> Option<&str> {
        self.display_informations
            .as_ref()
            .and_then(|info| info.message.as_deref())
            .filter(|m| !m.is_empty())
    }
}

/// Realtime and scheduled times at one calling point.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StopDateTime {
    /// Realtime departure (`YYYYMMDDThhmmss`).
    #[serde(
        default,
        alias = "departure_date_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub departure_time: Option<String>,

    /// Scheduled departure (`YYYYMMDDThhmmss`).
    #[serde(
        default,
        alias = "base_departure_date_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_departure_time: Option<String>,
}

impl StopDateTime {
    /// Both departure times, when Navitia supplied them.
    pub fn departure_pair(&self) -> Option<(&str, &str)> {
        let base = self.base_departure_time.as_deref().filter(|s| !s.is_empty())?;
        let real = self.departure_time.as_deref().filter(|s| !s.is_empty())?;
        Some((base, real))
    }
}

/// Display information for a public transport leg.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DisplayInformations {
    /// Disruption message, when the line is affected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Commercial mode, e.g. "TER" or "TGV INOUI".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commercial_mode: Option<String>,

    /// Train number as shown to passengers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headsign: Option<String>,
}

impl DisplayInformations {
    /// "TER 860123"-style label, when either part is known.
    pub fn train_label(&self) -> Option<String> {
        match (self.commercial_mode.as_deref(), self.headsign.as_deref()) {
            (Some(mode), Some(headsign)) => Some(format!("{mode} {headsign}")),
            (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
            (None, None) => None,
        }
    }
}

/// Disruption effect reported for a journey.
///
/// Navitia sends an empty string (or nothing) for unaffected journeys and
/// one of the GTFS-RT effect names otherwise. Unknown codes are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum JourneyStatus {
    #[default]
    Normal,
    NoService,
    SignificantDelays,
    ReducedService,
    Detour,
    AdditionalService,
    ModifiedService,
    OtherEffect,
    UnknownEffect,
    StopMoved,
    Other(String),
}

impl JourneyStatus {
    /// The Navitia code, empty for normal service.
    pub fn as_str(&self) -> &str {
        match self {
            JourneyStatus::Normal => "",
            JourneyStatus::NoService => "NO_SERVICE",
            JourneyStatus::SignificantDelays => "SIGNIFICANT_DELAYS",
            JourneyStatus::ReducedService => "REDUCED_SERVICE",
            JourneyStatus::Detour => "DETOUR",
            JourneyStatus::AdditionalService => "ADDITIONAL_SERVICE",
            JourneyStatus::ModifiedService => "MODIFIED_SERVICE",
            JourneyStatus::OtherEffect => "OTHER_EFFECT",
            JourneyStatus::UnknownEffect => "UNKNOWN_EFFECT",
            JourneyStatus::StopMoved => "STOP_MOVED",
            JourneyStatus::Other(code) => code,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, JourneyStatus::NoService)
    }
}

impl From<Option<String>> for JourneyStatus {
    fn from(code: Option<String>) -> Self {
        match code.as_deref().unwrap_or("") {
            "" => JourneyStatus::Normal,
            "NO_SERVICE" => JourneyStatus::NoService,
            "SIGNIFICANT_DELAYS" => JourneyStatus::SignificantDelays,
            "REDUCED_SERVICE" => JourneyStatus::ReducedService,
            "DETOUR" => JourneyStatus::Detour,
            "ADDITIONAL_SERVICE" => JourneyStatus::AdditionalService,
            "MODIFIED_SERVICE" => JourneyStatus::ModifiedService,
            "OTHER_EFFECT" => JourneyStatus::OtherEffect,
            "UNKNOWN_EFFECT" => JourneyStatus::UnknownEffect,
            "STOP_MOVED" => JourneyStatus::StopMoved,
            _ => JourneyStatus::Other(code.unwrap_or_default()),
        }
    }
}

impl From<JourneyStatus> for String {
    fn from(status: JourneyStatus) -> Self {
        status.as_str().to_string()
    }
}
