//! SNCF train disruption monitor.
//!
//! Polls the Navitia journeys API for the trains between two stations and
//! reports delays and cancellations, either as a periodically refreshed
//! sensor or as a one-shot report.

pub mod config;
pub mod domain;
pub mod navitia;
pub mod report;
pub mod sensor;
pub mod status;
pub mod web;
