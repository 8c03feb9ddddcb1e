//! Station references.

use std::fmt;

use serde::Serialize;

/// Error returned when a station reference is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station: {reason}")]
pub struct InvalidStation {
    reason: &'static str,
}

/// A Navitia stop area, identified by its id and a display name.
///
/// Both parts are required and neither may be blank. The id is passed
/// as-is to the journeys endpoint (e.g. `stop_area:SNCF:87391003`).
///
/// # Examples
///
/// ```
/// use sncf_disruptions::domain::StationRef;
///
/// let montparnasse = StationRef::new("stop_area:SNCF:87391003", "Paris Montparnasse").unwrap();
/// assert_eq!(montparnasse.id(), "stop_area:SNCF:87391003");
///
/// assert!(StationRef::new("", "Paris Montparnasse").is_err());
/// assert!(StationRef::new("stop_area:SNCF:87391003", "  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StationRef {
    id: String,
    name: String,
}

impl StationRef {
    /// Create a station reference, trimming surrounding whitespace.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, InvalidStation> {
        let id = id.into().trim().to_string();
        let name = name.into().trim().to_string();

        if id.is_empty() {
            return Err(InvalidStation {
                reason: "id cannot be empty",
            });
        }

        if id.chars().any(char::is_whitespace) {
            return Err(InvalidStation {
                reason: "id cannot contain whitespace",
            });
        }

        if name.is_empty() {
            return Err(InvalidStation {
                reason: "name cannot be empty",
            });
        }

        Ok(Self { id, name })
    }

    /// The Navitia stop area id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The human-readable station name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for StationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A directed pair of stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Direction {
    pub from: StationRef,
    pub to: StationRef,
}

impl Direction {
    pub fn new(from: StationRef, to: StationRef) -> Self {
        Self { from, to }
    }

    /// The same pair travelled the other way.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    /// Outbound then return.
    pub fn both(&self) -> [Direction; 2] {
        [self.clone(), self.reversed()]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.from, self.to)
    }
}
