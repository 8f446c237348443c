//! Backend test support utilities
//!
//! Shared by the backend's unit and integration tests: one logging setup
//! for every test binary and assertions for problem-details responses.

pub mod logging;
pub mod problem_details;
