//! External process execution behind a trait so the dispatcher can be
//! driven without spawning anything.

use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::error::DevtaskError;

/// One external tool call: program, discrete argv entries and extra
/// environment. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

pub trait ProcessRunner {
    /// Run to completion in `cwd` and return the exit code.
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<i32, DevtaskError>;
}

/// Spawns real processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<i32, DevtaskError> {
        debug!(command = %invocation, cwd = %cwd.display(), "spawn");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .current_dir(cwd)
            .status()
            .map_err(|source| DevtaskError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        Ok(exit_code(status))
    }
}

/// A process terminated by a signal has no code; report it as 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_args_with_spaces() {
        let inv = Invocation::new("sea-orm-cli").args(["migrate", "generate", "add users table"]);
        assert_eq!(inv.to_string(), r#"sea-orm-cli migrate generate "add users table""#);
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_exit_codes() {
        let cwd = std::env::temp_dir();
        let mut runner = SystemRunner;

        assert_eq!(runner.run(&Invocation::new("true"), &cwd).unwrap(), 0);
        let inv = Invocation::new("sh").args(["-c", "exit 3"]);
        assert_eq!(runner.run(&inv, &cwd).unwrap(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn signal_termination_maps_to_one() {
        let inv = Invocation::new("sh").args(["-c", "kill -TERM $$"]);
        let code = SystemRunner.run(&inv, &std::env::temp_dir()).unwrap();
        assert_eq!(code, 1);
    }

    #[cfg(unix)]
    #[test]
    fn env_is_passed_to_child() {
        let inv = Invocation::new("sh")
            .args(["-c", r#"test "$DEVTASK_PROBE" = "1""#])
            .env("DEVTASK_PROBE", "1");
        assert_eq!(SystemRunner.run(&inv, &std::env::temp_dir()).unwrap(), 0);
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let inv = Invocation::new("devtask-no-such-program");
        let err = SystemRunner.run(&inv, &std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, DevtaskError::Spawn { .. }));
    }
}
