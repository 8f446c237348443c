pub mod db;
pub mod provision;
