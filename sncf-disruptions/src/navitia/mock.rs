//! Mock Navitia client for running without an API token.
//!
//! Loads canned journeys responses from JSON files and serves them as if
//! they were live API answers. Each file is an ordinary Navitia journeys
//! response with two extra top-level keys, `from` and `to`, naming the
//! stop area ids it answers for.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use super::error::NavitiaError;
use super::source::{JourneyQuery, JourneySource};
use super::types::JourneysResponse;

/// One fixture file.
#[derive(Debug, Deserialize)]
struct Fixture {
    from: String,
    to: String,
    #[serde(flatten)]
    response: JourneysResponse,
}

/// Mock client that serves data from JSON files.
#[derive(Clone)]
pub struct MockNavitiaClient {
    /// Pre-loaded responses, keyed by (from id, to id).
    responses: Arc<HashMap<(String, String), JourneysResponse>>,
}

impl MockNavitiaClient {
    /// Create a new mock client by loading every `.json` file in a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, NavitiaError> {
        let data_dir = data_dir.as_ref();
        let mut responses = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            NavitiaError::Mock(format!("failed to read {}: {e}", data_dir.display()))
        })?;

        for entry in entries {
            let entry = entry
                .map_err(|e| NavitiaError::Mock(format!("failed to read directory entry: {e}")))?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let json = std::fs::read_to_string(&path)
                .map_err(|e| NavitiaError::Mock(format!("failed to read {}: {e}", path.display())))?;

            let fixture: Fixture = serde_json::from_str(&json).map_err(|e| {
                NavitiaError::Mock(format!("failed to parse {}: {e}", path.display()))
            })?;

            debug!(path = %path.display(), from = %fixture.from, to = %fixture.to, "loaded fixture");
            responses.insert((fixture.from, fixture.to), fixture.response);
        }

        if responses.is_empty() {
            return Err(NavitiaError::Mock(format!(
                "no fixture files found in {}",
                data_dir.display()
            )));
        }

        Ok(Self {
            responses: Arc::new(responses),
        })
    }

    /// Build a mock from in-memory responses.
    pub fn from_responses(
        responses: impl IntoIterator<Item = ((String, String), JourneysResponse)>,
    ) -> Self {
        Self {
            responses: Arc::new(responses.into_iter().collect()),
        }
    }

    /// Number of (from, to) pairs available.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Look up the canned response for a query. Time and count are ignored.
    pub fn lookup(&self, query: &JourneyQuery) -> Result<JourneysResponse, NavitiaError> {
        let key = (
            query.direction.from.id().to_string(),
            query.direction.to.id().to_string(),
        );
        self.responses.get(&key).cloned().ok_or_else(|| {
            NavitiaError::Mock(format!(
                "no fixture for {} → {}",
                query.direction.from.id(),
                query.direction.to.id()
            ))
        })
    }
}

impl JourneySource for MockNavitiaClient {
    async fn journeys(&self, query: &JourneyQuery) -> Result<JourneysResponse, NavitiaError> {
        self.lookup(query)
    }
}
