//! HTML page rendering for wayfare.
//!
//! The core formatter in `wayfare_format` produces fragments. This crate wraps
//! them in the snapshot, chat and page templates, preferring overrides from
//! the configured template directory over the embedded defaults.
pub mod template;
