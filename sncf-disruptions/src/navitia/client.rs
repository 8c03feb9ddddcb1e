//! Navitia HTTP client.
//!
//! Sends journeys searches to the Navitia API with the static token in the
//! `Authorization` header. One call per search: no retry, no pagination.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use super::error::NavitiaError;
use super::source::{JourneyQuery, JourneySource};
use super::types::JourneysResponse;

/// Default base URL for the Navitia API.
pub const DEFAULT_BASE_URL: &str = "https://api.navitia.io/v1";

/// Coverage region holding SNCF data.
const COVERAGE: &str = "sncf";

/// Navitia error id for a search that found nothing.
const NO_SOLUTION: &str = "no_solution";

/// Configuration for the Navitia client.
#[derive(Debug, Clone)]
pub struct NavitiaConfig {
    /// API token, sent verbatim as the Authorization header
    pub token: String,
    /// Base URL for the API (defaults to production Navitia)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NavitiaConfig {
    /// Create a new config with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Navitia API client.
#[derive(Debug, Clone)]
pub struct NavitiaClient {
    http: reqwest::Client,
    base_url: String,
}

impl NavitiaClient {
    /// Create a new Navitia client with the given configuration.
    pub fn new(config: NavitiaConfig) -> Result<Self, NavitiaError> {
        let mut headers = HeaderMap::new();

        let mut token =
            HeaderValue::from_str(&config.token).map_err(|_| NavitiaError::InvalidToken)?;
        token.set_sensitive(true);
        headers.insert(AUTHORIZATION, token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// URL of the journeys endpoint.
    pub fn journeys_url(&self) -> String {
        format!("{}/coverage/{}/journeys", self.base_url, COVERAGE)
    }

    /// Search journeys for one direction.
    ///
    /// A `no_solution` answer is returned as a response without journeys
    /// rather than as an error.
    pub async fn search(&self, query: &JourneyQuery) -> Result<JourneysResponse, NavitiaError> {
        let url = self.journeys_url();
        debug!(
            from = query.direction.from.id(),
            to = query.direction.to.id(),
            datetime = %query.datetime,
            "requesting journeys"
        );

        let response = self.http.get(&url).query(&query.params()).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(NavitiaError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NavitiaError::RateLimited);
        }

        let body = response.text().await?;

        if !status.is_success() {
            if let Some(empty) = no_solution(&body) {
                debug!(direction = %query.direction, "no journey found");
                return Ok(empty);
            }
            warn!(status = status.as_u16(), "journeys request failed");
            return Err(NavitiaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_response(&body)
    }
}

impl JourneySource for NavitiaClient {
    async fn journeys(&self, query: &JourneyQuery) -> Result<JourneysResponse, NavitiaError> {
        self.search(query).await
    }
}

/// Parse a journeys response body.
pub fn parse_response(body: &str) -> Result<JourneysResponse, NavitiaError> {
    serde_json::from_str(body).map_err(|e| NavitiaError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

/// The body of an error status, if it is Navitia's "no solution" answer.
fn no_solution(body: &str) -> Option<JourneysResponse> {
    let response: JourneysResponse = serde_json::from_str(body).ok()?;
    let is_no_solution = response
        .error
        .as_ref()
        .is_some_and(|error| error.id == NO_SOLUTION);
    is_no_solution.then_some(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = NavitiaConfig::new("test-token")
            .with_base_url("http://localhost:8080/v1/")
            .with_timeout(60);

        assert_eq!(config.token, "test-token");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = NavitiaConfig::new("test-token");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn client_creation() {
        let client = NavitiaClient::new(NavitiaConfig::new("test-token")).unwrap();
        assert_eq!(
            client.journeys_url(),
            "https://api.navitia.io/v1/coverage/sncf/journeys"
        );
    }

    #[test]
    fn reject_token_with_newline() {
        let result = NavitiaClient::new(NavitiaConfig::new("abc\ndef"));
        assert!(matches!(result, Err(NavitiaError::InvalidToken)));
    }

    #[test]
    fn parse_error_keeps_body_prefix() {
        let body = "x".repeat(800);
        match parse_response(&body) {
            Err(NavitiaError::Json { body: Some(b), .. }) => assert_eq!(b.len(), 500),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }

    #[test]
    fn no_solution_is_recognised() {
        let body = r#"{"error": {"id": "no_solution", "message": "no solution found for this journey"}}"#;
        let response = no_solution(body).unwrap();
        assert!(response.is_empty());

        let body = r#"{"error": {"id": "unknown_object", "message": "Invalid id"}}"#;
        assert!(no_solution(body).is_none());

        assert!(no_solution("Service Unavailable").is_none());
    }

    mod served {
        //! Requests against a local stand-in for the journeys endpoint.

        use super::*;
        use crate::domain::{Direction, NavitiaTime, StationRef};
        use axum::{
            Router,
            extract::Query,
            http::{HeaderMap, StatusCode},
            routing::get,
        };
        use std::collections::HashMap;

        /// Answers according to the `from` parameter.
        async fn journeys(
            headers: HeaderMap,
            Query(params): Query<HashMap<String, String>>,
        ) -> (StatusCode, String) {
            if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("good-token") {
                return (StatusCode::UNAUTHORIZED, String::new());
            }
            if params.get("data_freshness").map(String::as_str) != Some("realtime") {
                return (StatusCode::BAD_REQUEST, "missing data_freshness".into());
            }
            match params.get("from").map(String::as_str) {
                Some("stop_area:SNCF:empty") => (
                    StatusCode::NOT_FOUND,
                    r#"{"error": {"id": "no_solution", "message": "no solution"}}"#.into(),
                ),
                Some("stop_area:SNCF:busy") => (StatusCode::TOO_MANY_REQUESTS, String::new()),
                Some("stop_area:SNCF:down") => {
                    (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable".into())
                }
                _ => (
                    StatusCode::OK,
                    r#"{"journeys": [{"status": "", "sections": []}]}"#.into(),
                ),
            }
        }

        async fn serve() -> String {
            let app = Router::new().route("/v1/coverage/sncf/journeys", get(journeys));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{addr}/v1")
        }

        fn query(from: &str) -> JourneyQuery {
            let direction = Direction::new(
                StationRef::new(from, "A").unwrap(),
                StationRef::new("stop_area:SNCF:87394007", "B").unwrap(),
            );
            JourneyQuery::new(direction, NavitiaTime::parse("20240115T070000").unwrap())
        }

        async fn client(token: &str) -> NavitiaClient {
            NavitiaClient::new(NavitiaConfig::new(token).with_base_url(serve().await)).unwrap()
        }

        #[tokio::test]
        async fn successful_search() {
            let client = client("good-token").await;
            let response = client.search(&query("stop_area:SNCF:87391003")).await.unwrap();
            assert_eq!(response.journeys().len(), 1);
        }

        #[tokio::test]
        async fn bad_token_is_unauthorized() {
            let client = client("bad-token").await;
            let result = client.search(&query("stop_area:SNCF:87391003")).await;
            assert!(matches!(result, Err(NavitiaError::Unauthorized)));
        }

        #[tokio::test]
        async fn no_solution_is_empty() {
            let client = client("good-token").await;
            let response = client.search(&query("stop_area:SNCF:empty")).await.unwrap();
            assert!(response.is_empty());
        }

        #[tokio::test]
        async fn error_statuses() {
            let client = client("good-token").await;

            let result = client.search(&query("stop_area:SNCF:busy")).await;
            assert!(matches!(result, Err(NavitiaError::RateLimited)));

            match client.search(&query("stop_area:SNCF:down")).await {
                Err(NavitiaError::Api { status, message }) => {
                    assert_eq!(status, 503);
                    assert_eq!(message, "Service Unavailable");
                }
                other => panic!("expected API error, got {other:?}"),
            }
        }
    }
}
