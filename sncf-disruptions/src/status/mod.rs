//! Delay and cancellation status of the trains in a journeys response.
//!
//! [`evaluate`] is the canonical per-train view feeding the line status.
//! [`extract`] is the older per-journey disruption listing, kept as a
//! separate mode.

mod disruptions;
mod evaluate;
mod line;

pub use disruptions::{
    DisruptionLabel, DisruptionReport, JourneyInfo, NEXT_DEPARTURES, extract, journey_info,
};
pub use evaluate::{
    Evaluation, StatusReport, TrainStatus, TrainSummary, evaluate, first_delay, summarize,
};
pub use line::LineStatus;
