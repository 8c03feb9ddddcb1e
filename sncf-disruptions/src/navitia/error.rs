//! Navitia client error types.

/// Errors from fetching journeys.
#[derive(Debug, thiserror::Error)]
pub enum NavitiaError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Token rejected by the API
    #[error("unauthorized: check the Navitia token")]
    Unauthorized,

    /// Request quota exhausted
    #[error("rate limited by Navitia API")]
    RateLimited,

    /// Token cannot be sent as an HTTP header
    #[error("invalid token format")]
    InvalidToken,

    /// Mock source has nothing for the requested pair or could not load
    #[error("mock data: {0}")]
    Mock(String),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(" (body: {body})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = NavitiaError::Unauthorized;
        assert_eq!(err.to_string(), "unauthorized: check the Navitia token");

        let err = NavitiaError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = NavitiaError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(
            err.to_string(),
            "JSON parse error: expected value (body: <html>)"
        );

        let err = NavitiaError::Json {
            message: "expected value".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "JSON parse error: expected value");

        let err = NavitiaError::Mock("no fixture for a → b".into());
        assert_eq!(err.to_string(), "mock data: no fixture for a → b");
    }
}
