//! Coarse line health classification.

use std::fmt;

use serde::Serialize;

/// Health of the line over one poll, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum LineStatus {
    Normal,
    Delayed,
    Disrupted,
    Critical,
}

impl LineStatus {
    /// Classify from the number of delayed and cancelled trains.
    ///
    /// Rules are checked in order and the first match wins:
    /// more than two cancellations is critical; any cancellation or more
    /// than two delays is disrupted; any delay is delayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use sncf_disruptions::status::LineStatus;
    ///
    /// assert_eq!(LineStatus::classify(0, 0), LineStatus::Normal);
    /// assert_eq!(LineStatus::classify(1, 0), LineStatus::Delayed);
    /// assert_eq!(LineStatus::classify(0, 2), LineStatus::Disrupted);
    /// assert_eq!(LineStatus::classify(0, 3), LineStatus::Critical);
    /// ```
    pub fn classify(delayed_count: usize, cancelled_count: usize) -> Self {
        if cancelled_count > 2 {
            LineStatus::Critical
        } else if cancelled_count > 0 || delayed_count > 2 {
            LineStatus::Disrupted
        } else if delayed_count > 0 {
            LineStatus::Delayed
        } else {
            LineStatus::Normal
        }
    }

    /// Label shown as the sensor state.
    pub fn label(self) -> &'static str {
        match self {
            LineStatus::Normal => "Trafic normal",
            LineStatus::Delayed => "Retards",
            LineStatus::Disrupted => "Perturbé",
            LineStatus::Critical => "Fortement perturbé",
        }
    }

    /// Material Design icon for this status.
    pub fn icon(self) -> &'static str {
        match self {
            LineStatus::Normal => "mdi:train",
            LineStatus::Delayed => "mdi:train-clock",
            LineStatus::Disrupted | LineStatus::Critical => "mdi:train-variant-alert",
        }
    }
}

impl From<LineStatus> for &'static str {
    fn from(status: LineStatus) -> Self {
        status.label()
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// More cancellations never make the line look healthier
        #[test]
        fn monotonic_in_cancellations(delayed in 0usize..20, cancelled in 0usize..20, extra in 0usize..20) {
            let before = LineStatus::classify(delayed, cancelled);
            let after = LineStatus::classify(delayed, cancelled + extra);
            prop_assert!(after >= before);
        }

        /// More delays never make the line look healthier
        #[test]
        fn monotonic_in_delays(delayed in 0usize..20, cancelled in 0usize..20, extra in 0usize..20) {
            let before = LineStatus::classify(delayed, cancelled);
            let after = LineStatus::classify(delayed + extra, cancelled);
            prop_assert!(after >= before);
        }

        /// Delays alone never reach critical
        #[test]
        fn delays_alone_cap_at_disrupted(delayed in 0usize..1000) {
            prop_assert!(LineStatus::classify(delayed, 0) <= LineStatus::Disrupted);
        }
    }
}
