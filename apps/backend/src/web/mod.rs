//! Web boundary helpers shared by middleware, extractors and errors.

pub mod client_ip;
pub mod trace_ctx;
