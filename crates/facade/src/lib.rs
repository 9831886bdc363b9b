//! HTTP facade over cluster scheduling state
//!
//! Library half of the `schedview` binary so the router can be driven
//! directly from integration tests.

pub mod api;
pub mod config;
pub mod error;
