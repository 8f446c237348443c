//! Business operations for countries, states and cities.
//!
//! Every function takes a connection (usually the request transaction) and
//! returns `DomainError`. Writes record their outbox row on the same
//! connection so both commit together.

pub mod cities;
pub mod countries;
pub mod outbox;
pub mod states;

pub use outbox::{EventContext, EventType};
