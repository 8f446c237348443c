use std::io;
use std::path::{Path, PathBuf};

use db_infra::{DbInfraError, ProvisionError};
use thiserror::Error;

/// Exit code for malformed invocations, matching clap's usage errors.
pub const USAGE_EXIT_CODE: i32 = 2;

#[derive(Debug, Error)]
pub enum DevtaskError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with code {code}")]
    ToolFailed { program: String, code: i32 },
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error(transparent)]
    Db(#[from] DbInfraError),
    #[error(transparent)]
    Provision(#[from] ProvisionError),
}

impl DevtaskError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => USAGE_EXIT_CODE,
            Self::ToolFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}
