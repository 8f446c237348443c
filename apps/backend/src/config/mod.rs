//! Backend process configuration from the environment.

pub mod server;

pub use server::ServerConfig;
