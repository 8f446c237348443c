//! Request types for the geo registry and the field rules they enforce.
//!
//! Everything here is pure: uniqueness and existence checks that need the
//! database live in `services`.

pub mod city;
pub mod country;
pub mod state;
pub mod validation;

pub use city::{CityCreate, CityUpdate};
pub use country::{CountryCreate, CountryUpdate};
pub use state::{StateCreate, StateUpdate};
