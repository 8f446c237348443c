use std::env;
use std::path::PathBuf;

use crate::error::DevtaskError;
use crate::installer::{
    InstallerSpec, DEFAULT_BINARIES, DEFAULT_NO_MODIFY_PATH_VAR, DEFAULT_TARGET_DIR, DEFAULT_URL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevtaskConfig {
    /// Working directory for every catalogue task
    pub project_dir: PathBuf,
    pub installer: InstallerSpec,
}

impl DevtaskConfig {
    pub fn from_env() -> Result<Self, DevtaskError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DevtaskError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let project_dir = match get("DEVTASK_PROJECT_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir()
                .map_err(|e| DevtaskError::config(format!("cannot resolve current directory: {e}")))?,
        };
        if !project_dir.is_dir() {
            return Err(DevtaskError::config(format!(
                "DEVTASK_PROJECT_DIR is not a directory: {}",
                project_dir.display()
            )));
        }

        // Only install-tool needs this, so a missing HOME is reported there.
        let source_dir = get("INSTALLER_SOURCE_DIR")
            .or_else(|| get("XDG_BIN_HOME"))
            .map(PathBuf::from)
            .or_else(|| get("HOME").map(|home| PathBuf::from(home).join(".local/bin")));

        let binaries = match get("INSTALLER_BINARIES") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_BINARIES.iter().map(|b| b.to_string()).collect(),
        };

        Ok(Self {
            project_dir,
            installer: InstallerSpec {
                url: get("INSTALLER_URL").unwrap_or_else(|| DEFAULT_URL.to_string()),
                no_modify_path_var: get("INSTALLER_NO_MODIFY_PATH_VAR")
                    .unwrap_or_else(|| DEFAULT_NO_MODIFY_PATH_VAR.to_string()),
                source_dir,
                target_dir: get("INSTALLER_TARGET_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR)),
                binaries,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serial_test::serial;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_follow_home() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().to_string_lossy().to_string();
        let cfg = DevtaskConfig::from_lookup(lookup(&[
            ("DEVTASK_PROJECT_DIR", project.as_str()),
            ("HOME", "/home/dev"),
        ]))
        .unwrap();

        assert_eq!(cfg.project_dir, dir.path());
        assert_eq!(cfg.installer.url, DEFAULT_URL);
        assert_eq!(cfg.installer.no_modify_path_var, "INSTALLER_NO_MODIFY_PATH");
        assert_eq!(
            cfg.installer.source_dir,
            Some(PathBuf::from("/home/dev/.local/bin"))
        );
        assert_eq!(cfg.installer.target_dir, PathBuf::from("/usr/local/bin"));
        assert_eq!(cfg.installer.binaries, vec!["uv", "uvx"]);
    }

    #[test]
    fn installer_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().to_string_lossy().to_string();
        let cfg = DevtaskConfig::from_lookup(lookup(&[
            ("DEVTASK_PROJECT_DIR", project.as_str()),
            ("INSTALLER_SOURCE_DIR", "/opt/out"),
            ("INSTALLER_TARGET_DIR", "/opt/bin"),
            ("INSTALLER_BINARIES", "tool, tool-x"),
            ("INSTALLER_NO_MODIFY_PATH_VAR", "TOOL_NO_MODIFY_PATH"),
        ]))
        .unwrap();

        assert_eq!(cfg.installer.source_dir, Some(PathBuf::from("/opt/out")));
        assert_eq!(cfg.installer.target_dir, PathBuf::from("/opt/bin"));
        assert_eq!(cfg.installer.binaries, vec!["tool", "tool-x"]);
        assert_eq!(cfg.installer.no_modify_path_var, "TOOL_NO_MODIFY_PATH");
    }

    #[test]
    fn blank_home_leaves_source_dir_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().to_string_lossy().to_string();
        let cfg = DevtaskConfig::from_lookup(lookup(&[
            ("DEVTASK_PROJECT_DIR", project.as_str()),
            ("HOME", ""),
            ("XDG_BIN_HOME", " "),
        ]))
        .unwrap();

        assert_eq!(cfg.installer.source_dir, None);
        assert!(cfg.installer.source_dir().is_err());
    }

    #[test]
    fn missing_project_dir_is_config_error() {
        let err = DevtaskConfig::from_lookup(lookup(&[
            ("DEVTASK_PROJECT_DIR", "/definitely/not/here"),
            ("HOME", "/home/dev"),
        ]))
        .unwrap_err();
        assert!(matches!(err, DevtaskError::Config { .. }));
    }

    #[test]
    #[serial]
    fn from_env_defaults_to_current_dir() {
        std::env::remove_var("DEVTASK_PROJECT_DIR");
        std::env::set_var("INSTALLER_SOURCE_DIR", "/tmp/installer-out");
        let cfg = DevtaskConfig::from_env();
        std::env::remove_var("INSTALLER_SOURCE_DIR");

        let cfg = cfg.unwrap();
        assert_eq!(cfg.project_dir, std::env::current_dir().unwrap());
        assert_eq!(
            cfg.installer.source_dir,
            Some(PathBuf::from("/tmp/installer-out"))
        );
    }
}
