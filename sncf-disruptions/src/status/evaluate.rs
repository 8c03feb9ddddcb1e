//! Per-train status evaluation.
//!
//! Turns one journeys response into a list of train summaries, one per
//! public transport section, plus delayed/cancelled counts and the line
//! status derived from them. Pure: no clock, no I/O.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::domain::{FormatError, delay_minutes, format_time};
use crate::navitia::{Journey, JourneysResponse, Section, StopDateTime};

use super::line::LineStatus;

/// Punctuality of one train.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStatus {
    /// The journey is not running.
    Cancelled,
    /// Late by this many whole minutes (always positive).
    Delayed(i64),
    OnTime,
}

impl fmt::Display for TrainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainStatus::Cancelled => f.write_str("Supprimé"),
            TrainStatus::Delayed(minutes) => write!(f, "Retard de {minutes} min"),
            TrainStatus::OnTime => f.write_str("À l'heure"),
        }
    }
}

impl Serialize for TrainStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One train as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainSummary {
    /// Departure, `HH:MM`.
    pub depart: String,
    /// Arrival, `HH:MM`.
    pub arrivee: String,
    pub status: TrainStatus,
}

/// Aggregate result of one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Trains in encounter order: journeys outer, sections inner.
    pub trains: Vec<TrainSummary>,
    pub delayed_count: usize,
    pub cancelled_count: usize,
    pub line_status: LineStatus,
}

/// Outcome of evaluating a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The response held no journey; there is nothing to classify.
    Unavailable,
    Report(StatusReport),
}

impl Evaluation {
    pub fn report(&self) -> Option<&StatusReport> {
        match self {
            Evaluation::Unavailable => None,
            Evaluation::Report(report) => Some(report),
        }
    }
}

/// Evaluate every public transport section of every journey.
///
/// Fails when a departure, arrival, or stop timestamp is malformed.
///
/// # Examples
///
/// ```
/// use sncf_disruptions::navitia::JourneysResponse;
/// use sncf_disruptions::status::{Evaluation, evaluate};
///
/// let empty = JourneysResponse::default();
/// assert_eq!(evaluate(&empty).unwrap(), Evaluation::Unavailable);
/// ```
pub fn evaluate(response: &JourneysResponse) -> Result<Evaluation, FormatError> {
    if response.is_empty() {
        return Ok(Evaluation::Unavailable);
    }

    let mut trains = Vec::new();
    let mut delayed_count = 0;
    let mut cancelled_count = 0;

    for journey in response.journeys() {
        for section in journey.public_transport_sections() {
            let summary = summarize(journey, section)?;
            match summary.status {
                TrainStatus::Cancelled => cancelled_count += 1,
                TrainStatus::Delayed(_) => delayed_count += 1,
                TrainStatus::OnTime => {}
            }
            trains.push(summary);
        }
    }

    Ok(Evaluation::Report(StatusReport {
        trains,
        delayed_count,
        cancelled_count,
        line_status: LineStatus::classify(delayed_count, cancelled_count),
    }))
}

/// Summarize one public transport section of a journey.
pub fn summarize(journey: &Journey, section: &Section) -> Result<TrainSummary, FormatError> {
    let depart = format_time(section.departure_date_time.as_deref().unwrap_or_default())?;
    let arrivee = format_time(section.arrival_date_time.as_deref().unwrap_or_default())?;

    let status = if journey.status.is_cancelled() {
        TrainStatus::Cancelled
    } else {
        match first_delay(section.stops())? {
            Some(minutes) => TrainStatus::Delayed(minutes),
            None => TrainStatus::OnTime,
        }
    };

    Ok(TrainSummary {
        depart,
        arrivee,
        status,
    })
}

/// Delay at the first stop that is running late, scanning in order.
///
/// Stops missing either departure time are skipped, as are stops on time
/// or early.
pub fn first_delay(stops: &[StopDateTime]) -> Result<Option<i64>, FormatError> {
    for stop in stops {
        let Some((base, realtime)) = stop.departure_pair() else {
            continue;
        };
        let delay = delay_minutes(base, realtime)?;
        if delay > 0 {
            return Ok(Some(delay));
        }
    }
    Ok(None)
}
