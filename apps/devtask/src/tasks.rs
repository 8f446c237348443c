//! The task catalogue and the fail-fast sequencer.

use std::path::Path;

use tracing::{info, warn};

use crate::error::DevtaskError;
use crate::runner::{Invocation, ProcessRunner};

pub const MIGRATION_DIR: &str = "packages/migration";
pub const MESSAGE_MAX_CHARS: usize = 200;

/// Name and summary of every subcommand, in listing order.
pub const CATALOGUE: &[(&str, &str)] = &[
    ("lint", "Run clippy on every target, warnings are errors"),
    ("check", "Check formatting"),
    ("test", "Run the whole test suite"),
    ("test-fast", "Run library unit tests only"),
    ("cov", "Coverage report"),
    ("cov-html", "Coverage report as HTML"),
    ("serve", "Start the backend"),
    ("dev", "Alias of serve"),
    ("migrate", "Apply pending migrations"),
    ("migrate-reset", "Roll back every migration"),
    ("migrate-down", "Roll back the last migration"),
    ("migration-create <MESSAGE>", "Generate a new migration"),
    ("db-reset-test", "Reset the test database"),
    ("script <NAME>", "Run a db-script maintenance command"),
    ("ci", "check, then test"),
    ("ready", "lint, then test"),
    ("bootstrap [--skip-if-exists]", "Create schemas, roles and the test database"),
    ("install-tool", "Install the package manager into the system bin directory"),
];

/// Help text printed when no subcommand is given.
pub fn listing() -> String {
    let width = CATALOGUE.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::from("Available commands:\n");
    for (name, about) in CATALOGUE {
        out.push_str(&format!("  {name:<width$}  {about}\n"));
    }
    out
}

/// Free-text migration name: trimmed, non-empty, bounded, no control
/// characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationMessage(String);

impl MigrationMessage {
    pub fn parse(raw: &str) -> Result<Self, DevtaskError> {
        let message = raw.trim();
        if message.is_empty() {
            return Err(DevtaskError::invalid("migration message must not be empty"));
        }
        if message.chars().count() > MESSAGE_MAX_CHARS {
            return Err(DevtaskError::invalid(format!(
                "migration message must be at most {MESSAGE_MAX_CHARS} characters"
            )));
        }
        if message.chars().any(char::is_control) {
            return Err(DevtaskError::invalid(
                "migration message must not contain control characters",
            ));
        }
        Ok(Self(message.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A `db-script` subcommand name, `[A-Za-z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptName(String);

impl ScriptName {
    pub fn parse(raw: &str) -> Result<Self, DevtaskError> {
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DevtaskError::invalid(format!(
                "script name must match [A-Za-z0-9_-]+, got '{raw}'"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single catalogue entry that maps to exactly one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Lint,
    Check,
    Test,
    TestFast,
    Cov,
    CovHtml,
    Serve,
    Migrate,
    MigrateReset,
    MigrateDown,
    MigrationCreate(MigrationMessage),
    DbResetTest,
    Script(ScriptName),
}

fn cargo<const N: usize>(args: [&str; N]) -> Invocation {
    Invocation::new("cargo").args(args)
}

fn migration_cli(command: &str) -> Invocation {
    cargo(["run", "-p", "migration-cli", "--bin", "migration", "--"]).arg(command)
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Task::Lint => "lint",
            Task::Check => "check",
            Task::Test => "test",
            Task::TestFast => "test-fast",
            Task::Cov => "cov",
            Task::CovHtml => "cov-html",
            Task::Serve => "serve",
            Task::Migrate => "migrate",
            Task::MigrateReset => "migrate-reset",
            Task::MigrateDown => "migrate-down",
            Task::MigrationCreate(_) => "migration-create",
            Task::DbResetTest => "db-reset-test",
            Task::Script(_) => "script",
        }
    }

    pub fn invocation(&self) -> Invocation {
        match self {
            Task::Lint => cargo(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]),
            Task::Check => cargo(["fmt", "--all", "--", "--check"]),
            Task::Test => cargo(["test", "--workspace"]),
            Task::TestFast => cargo(["test", "--workspace", "--lib"]),
            Task::Cov => cargo(["llvm-cov", "--workspace"]),
            Task::CovHtml => cargo(["llvm-cov", "--workspace", "--html"]),
            Task::Serve => cargo(["run", "-p", "backend", "--bin", "backend"]),
            Task::Migrate => migration_cli("up"),
            Task::MigrateReset => migration_cli("reset"),
            Task::MigrateDown => migration_cli("down"),
            Task::MigrationCreate(message) => Invocation::new("sea-orm-cli")
                .args(["migrate", "generate", "--migration-dir", MIGRATION_DIR])
                .arg(message.as_str()),
            Task::DbResetTest => {
                cargo(["run", "-p", "migration-cli", "--bin", "db-script", "--", "reset-test-db"])
            }
            Task::Script(name) => {
                cargo(["run", "-q", "-p", "migration-cli", "--bin", "db-script", "--"]).arg(name.as_str())
            }
        }
    }
}

/// Run `tasks` in order in `cwd`. The first non-zero exit stops the
/// sequence and becomes the result; otherwise the last code is returned.
pub fn run_sequence<R>(tasks: &[Task], runner: &mut R, cwd: &Path) -> Result<i32, DevtaskError>
where
    R: ProcessRunner + ?Sized,
{
    let mut code = 0;
    for task in tasks {
        let invocation = task.invocation();
        info!(task = task.name(), command = %invocation, "task=start");
        code = runner.run(&invocation, cwd)?;
        if code != 0 {
            warn!(task = task.name(), code, "task=failed");
            return Ok(code);
        }
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_trimmed_and_bounded() {
        assert_eq!(
            MigrationMessage::parse("  add users table ").unwrap().as_str(),
            "add users table"
        );
        assert!(MigrationMessage::parse("   ").is_err());
        assert!(MigrationMessage::parse(&"x".repeat(200)).is_ok());
        assert!(MigrationMessage::parse(&"x".repeat(201)).is_err());
        assert!(MigrationMessage::parse("add\nusers").is_err());
    }

    #[test]
    fn message_keeps_shell_metacharacters_verbatim() {
        let message = MigrationMessage::parse("drop; $(rm -rf /) `x`").unwrap();
        let inv = Task::MigrationCreate(message).invocation();
        assert_eq!(inv.args.last().map(String::as_str), Some("drop; $(rm -rf /) `x`"));
    }

    #[test]
    fn script_names_are_restricted() {
        assert!(ScriptName::parse("check-db").is_ok());
        assert!(ScriptName::parse("inspect_tables2").is_ok());
        assert!(ScriptName::parse("").is_err());
        assert!(ScriptName::parse("reset-test-db; ls").is_err());
        assert!(ScriptName::parse("../x").is_err());
    }

    #[test]
    fn catalogue_invocations() {
        assert_eq!(
            Task::Lint.invocation().to_string(),
            "cargo clippy --workspace --all-targets -- -D warnings"
        );
        assert_eq!(Task::Check.invocation().to_string(), "cargo fmt --all -- --check");
        assert_eq!(
            Task::MigrateDown.invocation().to_string(),
            "cargo run -p migration-cli --bin migration -- down"
        );
        let script = Task::Script(ScriptName::parse("check-db").unwrap());
        assert_eq!(
            script.invocation().to_string(),
            "cargo run -q -p migration-cli --bin db-script -- check-db"
        );
    }

    #[test]
    fn listing_names_every_command() {
        let text = listing();
        for (name, _) in CATALOGUE {
            assert!(text.contains(name), "missing {name}");
        }
    }
}
