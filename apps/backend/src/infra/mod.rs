//! Infrastructure layer: state construction and DB error translation.

pub mod db_errors;
pub mod state;
