use std::env;

use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Listen address for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Reads `BACKEND_HOST` and `BACKEND_PORT`, falling back to `0.0.0.0:8000`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(env::var("BACKEND_HOST").ok(), env::var("BACKEND_PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Result<Self, AppError> {
        let host = host
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match port {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'"))
            })?,
        };
        Ok(Self { host, port })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn unset_vars_use_defaults() {
        assert_eq!(ServerConfig::from_vars(None, None).unwrap(), ServerConfig::default());
    }

    #[test]
    fn explicit_values_win() {
        let cfg = ServerConfig::from_vars(Some("127.0.0.1".into()), Some("9000".into())).unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 9000);
    }

    #[test]
    #[serial]
    fn from_env_reads_backend_vars() {
        std::env::set_var("BACKEND_HOST", "127.0.0.1");
        std::env::set_var("BACKEND_PORT", "8081");
        let cfg = ServerConfig::from_env();
        std::env::remove_var("BACKEND_HOST");
        std::env::remove_var("BACKEND_PORT");

        assert_eq!(
            cfg.unwrap(),
            ServerConfig {
                host: "127.0.0.1".into(),
                port: 8081,
            }
        );
    }

    #[test]
    fn bad_port_is_config_error() {
        let err = ServerConfig::from_vars(None, Some("http".into())).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
