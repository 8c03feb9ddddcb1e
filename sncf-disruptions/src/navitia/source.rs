//! Journey sources.
//!
//! The sensor and the CLI report only need "journeys from A to B around
//! this time". This trait lets them run against the live API or against
//! canned data.

use std::future::Future;

use crate::domain::{Direction, NavitiaTime};

use super::client::NavitiaClient;
use super::error::NavitiaError;
use super::mock::MockNavitiaClient;
use super::types::JourneysResponse;

/// One journeys search.
#[derive(Debug, Clone)]
pub struct JourneyQuery {
    /// Origin and destination.
    pub direction: Direction,

    /// Earliest departure, in Navitia local time.
    pub datetime: NavitiaTime,

    /// Maximum number of journeys to ask for. Omitted from the request when `None`.
    pub count: Option<u32>,
}

impl JourneyQuery {
    pub fn new(direction: Direction, datetime: NavitiaTime) -> Self {
        Self {
            direction,
            datetime,
            count: None,
        }
    }

    pub fn with_count(mut self, count: Option<u32>) -> Self {
        self.count = count;
        self
    }

    /// Query parameters for the journeys endpoint.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("from", self.direction.from.id().to_string()),
            ("to", self.direction.to.id().to_string()),
            ("datetime", self.datetime.to_string()),
            ("data_freshness", "realtime".to_string()),
        ];
        if let Some(count) = self.count {
            params.push(("count", count.to_string()));
        }
        params
    }
}

/// Something that can answer a journeys search.
pub trait JourneySource {
    fn journeys(
        &self,
        query: &JourneyQuery,
    ) -> impl Future<Output = Result<JourneysResponse, NavitiaError>> + Send;
}

/// Source chosen at startup: the live API or a mock directory.
#[derive(Clone)]
pub enum Backend {
    Live(NavitiaClient),
    Mock(MockNavitiaClient),
}

impl JourneySource for Backend {
    async fn journeys(&self, query: &JourneyQuery) -> Result<JourneysResponse, NavitiaError> {
        match self {
            Backend::Live(client) => client.journeys(query).await,
            Backend::Mock(client) => client.journeys(query).await,
        }
    }
}
