//! One-shot text report for both directions between two stations.

use std::fmt;

use chrono::NaiveDateTime;
use tracing::warn;

use crate::domain::{Direction, NavitiaTime};
use crate::navitia::{JourneyQuery, JourneySource};
use crate::sensor::{SensorMode, UpdateError};
use crate::status::{DisruptionLabel, Evaluation, JourneyInfo, evaluate, journey_info};

const RULE_WIDTH: usize = 80;

/// Message printed when a direction has no journey.
pub const NO_JOURNEY: &str = "Aucun trajet trouvé pour cette période.";

/// What was found for one direction.
#[derive(Debug)]
pub enum Outcome {
    Status(Evaluation),
    /// Every journey with public transport, in response order.
    Disruptions(Vec<JourneyInfo>),
    Failed(UpdateError),
}

/// The report for one direction.
#[derive(Debug)]
pub struct DirectionReport {
    pub direction: Direction,
    pub outcome: Outcome,
}

/// Search one direction and evaluate the result.
pub async fn check_direction<S: JourneySource>(
    source: &S,
    direction: Direction,
    now: NaiveDateTime,
    count: Option<u32>,
    mode: SensorMode,
) -> DirectionReport {
    let query =
        JourneyQuery::new(direction.clone(), NavitiaTime::from_datetime(now)).with_count(count);

    let outcome = match fetch(source, &query, mode).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(%direction, error = %e, "journey search failed");
            Outcome::Failed(e)
        }
    };

    DirectionReport { direction, outcome }
}

async fn fetch<S: JourneySource>(
    source: &S,
    query: &JourneyQuery,
    mode: SensorMode,
) -> Result<Outcome, UpdateError> {
    let response = source.journeys(query).await?;

    Ok(match mode {
        SensorMode::Status => Outcome::Status(evaluate(&response)?),
        SensorMode::Disruptions => {
            let mut journeys = Vec::new();
            for journey in response.journeys() {
                if let Some(info) = journey_info(journey)? {
                    journeys.push(info);
                }
            }
            Outcome::Disruptions(journeys)
        }
    })
}

/// Check the outbound direction, then the return.
///
/// A failure in one direction is recorded in its report and does not
/// prevent the other from being checked.
pub async fn check_both_directions<S: JourneySource>(
    source: &S,
    direction: &Direction,
    now: NaiveDateTime,
    count: Option<u32>,
    mode: SensorMode,
) -> Vec<DirectionReport> {
    let mut reports = Vec::with_capacity(2);
    for direction in direction.both() {
        reports.push(check_direction(source, direction, now, count, mode).await);
    }
    reports
}

/// Full report text: a banner followed by each direction.
pub fn render(reports: &[DirectionReport]) -> String {
    let mut out = String::new();
    out.push_str("\n📍 VÉRIFICATION DES HORAIRES ET PERTURBATIONS\n");
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    for report in reports {
        out.push_str(&report.to_string());
    }
    out
}

impl fmt::Display for DirectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "🚂 Trajets de {}", self.direction)?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        match &self.outcome {
            Outcome::Failed(e) => writeln!(f, "Erreur lors de la requête: {e}"),
            Outcome::Status(Evaluation::Unavailable) => writeln!(f, "{NO_JOURNEY}"),
            Outcome::Disruptions(journeys) if journeys.is_empty() => writeln!(f, "{NO_JOURNEY}"),
            Outcome::Status(Evaluation::Report(report)) => {
                for train in &report.trains {
                    writeln!(f, "Départ: {} - Arrivée: {}", train.depart, train.arrivee)?;
                    writeln!(f, "{}", train.status)?;
                    writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
                }
                writeln!(
                    f,
                    "État de la ligne: {} ({} en retard, {} supprimé(s))",
                    report.line_status.label(),
                    report.delayed_count,
                    report.cancelled_count
                )
            }
            Outcome::Disruptions(journeys) => {
                for journey in journeys {
                    writeln!(f, "Départ: {} - Arrivée: {}", journey.depart, journey.arrivee)?;
                    if let Some(label) = journey.disruption {
                        let marker = match label {
                            DisruptionLabel::Cancelled => "🚫",
                            DisruptionLabel::SignificantDelays => "⚠️",
                        };
                        writeln!(f, "{marker} {label}")?;
                    }
                    if let Some(message) = &journey.message {
                        writeln!(f, "ℹ️ {message}")?;
                    }
                    writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationRef;
    use crate::navitia::{JourneysResponse, MockNavitiaClient, NavitiaError};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
    }

    fn paris_chartres() -> Direction {
        Direction::new(
            StationRef::new("stop_area:SNCF:87391003", "Paris Montparnasse").unwrap(),
            StationRef::new("stop_area:SNCF:87394007", "Chartres").unwrap(),
        )
    }

    fn mock() -> MockNavitiaClient {
        MockNavitiaClient::new("data/mock_journeys").unwrap()
    }

    /// Fails every search going to `to`.
    struct FailingTo(&'static str);

    impl JourneySource for FailingTo {
        async fn journeys(&self, query: &JourneyQuery) -> Result<JourneysResponse, NavitiaError> {
            if query.direction.to.id() == self.0 {
                Err(NavitiaError::RateLimited)
            } else {
                Ok(JourneysResponse::default())
            }
        }
    }

    #[tokio::test]
    async fn status_report_both_directions() {
        let reports =
            check_both_directions(&mock(), &paris_chartres(), now(), None, SensorMode::Status).await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].direction.to.name(), "Chartres");
        assert_eq!(reports[1].direction.to.name(), "Paris Montparnasse");

        let text = render(&reports);
        assert!(text.starts_with("\n📍 VÉRIFICATION DES HORAIRES ET PERTURBATIONS\n"));
        assert!(text.contains("🚂 Trajets de Paris Montparnasse → Chartres\n"));
        assert!(text.contains("🚂 Trajets de Chartres → Paris Montparnasse\n"));
        assert!(text.contains("Départ: 07:12 - Arrivée: 08:12\nRetard de 5 min\n"));
        assert!(text.contains("Départ: 07:41 - Arrivée: 08:42\nSupprimé\n"));
        assert!(text.contains("État de la ligne: Perturbé (1 en retard, 1 supprimé(s))"));
        assert!(text.contains("État de la ligne: Trafic normal (0 en retard, 0 supprimé(s))"));
        assert!(!text.contains(NO_JOURNEY));
    }

    #[tokio::test]
    async fn disruptions_report() {
        let report = check_direction(
            &mock(),
            paris_chartres(),
            now(),
            None,
            SensorMode::Disruptions,
        )
        .await;

        let Outcome::Disruptions(journeys) = &report.outcome else {
            panic!("expected a disruption listing, got {:?}", report.outcome);
        };
        assert_eq!(journeys.len(), 3);

        let text = report.to_string();
        assert!(text.contains("⚠️ RETARD IMPORTANT\nℹ️ Retard suite à une panne de signalisation\n"));
        assert!(text.contains("🚫 TRAIN SUPPRIMÉ\nℹ️ Train supprimé\n"));
        assert!(text.contains("Départ: 08:11 - Arrivée: 09:13\n----"));
    }

    #[tokio::test]
    async fn failure_in_one_direction_does_not_stop_the_other() {
        let source = FailingTo("stop_area:SNCF:87394007");
        let reports =
            check_both_directions(&source, &paris_chartres(), now(), None, SensorMode::Status).await;

        assert!(matches!(reports[0].outcome, Outcome::Failed(_)));
        assert!(matches!(
            reports[1].outcome,
            Outcome::Status(Evaluation::Unavailable)
        ));

        let text = render(&reports);
        assert!(text.contains("Erreur lors de la requête: rate limited"));
        assert!(text.contains(NO_JOURNEY));
    }

    #[tokio::test]
    async fn empty_listing() {
        let source = MockNavitiaClient::from_responses(std::iter::empty());
        let report = check_direction(
            &source,
            paris_chartres(),
            now(),
            None,
            SensorMode::Disruptions,
        )
        .await;
        // Unknown pair is a mock error, not an empty listing
        assert!(matches!(report.outcome, Outcome::Failed(_)));

        let empty = DirectionReport {
            direction: paris_chartres(),
            outcome: Outcome::Disruptions(Vec::new()),
        };
        assert!(empty.to_string().ends_with(&format!("{NO_JOURNEY}\n")));
    }
}
