//! Package manager provisioning: download the installer, run it without
//! PATH edits, then move its executables into the system bin directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::DevtaskError;
use crate::runner::{Invocation, ProcessRunner};

pub const DEFAULT_URL: &str = "https://astral.sh/uv/install.sh";
pub const DEFAULT_NO_MODIFY_PATH_VAR: &str = "INSTALLER_NO_MODIFY_PATH";
pub const DEFAULT_TARGET_DIR: &str = "/usr/local/bin";
pub const DEFAULT_BINARIES: [&str; 2] = ["uv", "uvx"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerSpec {
    pub url: String,
    /// Set to `1` while the script runs
    pub no_modify_path_var: String,
    /// Where the script leaves its executables. `None` when neither an
    /// override nor a home directory was available.
    pub source_dir: Option<PathBuf>,
    pub target_dir: PathBuf,
    pub binaries: Vec<String>,
}

impl InstallerSpec {
    pub fn source_dir(&self) -> Result<&Path, DevtaskError> {
        self.source_dir.as_deref().ok_or_else(|| {
            DevtaskError::config("INSTALLER_SOURCE_DIR is unset and HOME is unknown")
        })
    }
}

pub async fn fetch_script(url: &str, dest: &Path) -> Result<(), DevtaskError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let body = response.bytes().await?;
    tokio::fs::write(dest, &body)
        .await
        .map_err(|e| DevtaskError::io(dest, e))?;
    info!(url, bytes = body.len(), dest = %dest.display(), "installer=downloaded");
    Ok(())
}

pub fn run_script<R>(script: &Path, spec: &InstallerSpec, runner: &mut R) -> Result<(), DevtaskError>
where
    R: ProcessRunner + ?Sized,
{
    let invocation = Invocation::new("sh")
        .arg(script.to_string_lossy())
        .env(spec.no_modify_path_var.as_str(), "1");
    let cwd = script.parent().unwrap_or_else(|| Path::new("."));

    let code = runner.run(&invocation, cwd)?;
    if code != 0 {
        return Err(DevtaskError::ToolFailed {
            program: invocation.to_string(),
            code,
        });
    }
    Ok(())
}

/// Move every binary from `source_dir` to `target_dir`, returning the new
/// paths. Stops at the first binary that cannot be moved.
pub fn relocate(spec: &InstallerSpec) -> Result<Vec<PathBuf>, DevtaskError> {
    let source_dir = spec.source_dir()?;
    fs::create_dir_all(&spec.target_dir).map_err(|e| DevtaskError::io(&spec.target_dir, e))?;

    let mut moved = Vec::with_capacity(spec.binaries.len());
    for binary in &spec.binaries {
        let from = source_dir.join(binary);
        let to = spec.target_dir.join(binary);
        move_file(&from, &to)?;
        info!(from = %from.display(), to = %to.display(), "installer=relocated");
        moved.push(to);
    }
    Ok(moved)
}

fn move_file(from: &Path, to: &Path) -> Result<(), DevtaskError> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(DevtaskError::io(from, e)),
        Err(e) => {
            warn!(error = %e, from = %from.display(), "rename failed, copying instead");
            copy_then_remove(from, to)
        }
    }
}

/// rename(2) cannot cross filesystems. `fs::copy` carries the mode bits over.
fn copy_then_remove(from: &Path, to: &Path) -> Result<(), DevtaskError> {
    fs::copy(from, to).map_err(|e| DevtaskError::io(to, e))?;
    fs::remove_file(from).map_err(|e| DevtaskError::io(from, e))
}

/// Fetch, run and relocate. The downloaded script is removed afterwards.
pub async fn install<R>(spec: &InstallerSpec, runner: &mut R) -> Result<Vec<PathBuf>, DevtaskError>
where
    R: ProcessRunner + ?Sized,
{
    spec.source_dir()?;
    let script = std::env::temp_dir().join(format!("devtask-installer-{}.sh", std::process::id()));
    fetch_script(&spec.url, &script).await?;

    let ran = run_script(&script, spec, runner);
    if let Err(e) = fs::remove_file(&script) {
        warn!(error = %e, path = %script.display(), "failed to remove installer script");
    }
    ran?;

    relocate(spec)
}
