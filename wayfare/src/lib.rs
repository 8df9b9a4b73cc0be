//! Expose wayfare's internal API for use in integration tests and for callers
//! that drive the planner session from their own front end.
pub mod cli;
pub mod error;
pub mod output;
pub mod planner;
pub mod preferences;
