//! Navitia journeys API client.
//!
//! This module provides an HTTP client for the Navitia journey planner
//! (SNCF coverage), a mock client serving canned responses, and the
//! [`JourneySource`] trait both implement.
//!
//! Key characteristics of Navitia:
//! - Times are local `YYYYMMDDThhmmss` strings without offset
//! - The token goes in the `Authorization` header as-is, without a scheme
//! - "Nothing found" is reported as an error object with id `no_solution`

mod client;
mod error;
mod mock;
mod source;
mod types;

pub use client::{DEFAULT_BASE_URL, NavitiaClient, NavitiaConfig, parse_response};
pub use error::NavitiaError;
pub use mock::MockNavitiaClient;
pub use source::{Backend, JourneyQuery, JourneySource};
pub use types::{
    ApiErrorBody, DisplayInformations, Journey, JourneyStatus, JourneysResponse,
    PUBLIC_TRANSPORT, Section, StopDateTime,
};
