use clap::{Parser, Subcommand};

use crate::error::DevtaskError;
use crate::tasks::{MigrationMessage, ScriptName, Task};

#[derive(Debug, Parser)]
#[command(name = "devtask")]
#[command(about = "Developer task runner for the geo registry workspace")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    Lint,
    Check,
    Test,
    TestFast,
    Cov,
    CovHtml,
    Serve,
    Dev,
    Migrate,
    MigrateReset,
    MigrateDown,
    MigrationCreate {
        message: String,
    },
    DbResetTest,
    Script {
        name: String,
    },
    /// check, then test
    Ci,
    /// lint, then test
    Ready,
    /// Create the schemas, roles and test database
    Bootstrap {
        /// Skip database/role creation when the object already exists
        #[arg(long)]
        skip_if_exists: bool,
    },
    InstallTool,
}

/// What a parsed command resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    List,
    Tasks(Vec<Task>),
    Bootstrap { skip_if_exists: bool },
    InstallTool,
}

impl Plan {
    /// Expands aliases and composites and validates free-text arguments.
    pub fn resolve(command: Option<Command>) -> Result<Self, DevtaskError> {
        let Some(command) = command else {
            return Ok(Plan::List);
        };
        let tasks = match command {
            Command::Lint => vec![Task::Lint],
            Command::Check => vec![Task::Check],
            Command::Test => vec![Task::Test],
            Command::TestFast => vec![Task::TestFast],
            Command::Cov => vec![Task::Cov],
            Command::CovHtml => vec![Task::CovHtml],
            Command::Serve | Command::Dev => vec![Task::Serve],
            Command::Migrate => vec![Task::Migrate],
            Command::MigrateReset => vec![Task::MigrateReset],
            Command::MigrateDown => vec![Task::MigrateDown],
            Command::MigrationCreate { message } => {
                vec![Task::MigrationCreate(MigrationMessage::parse(&message)?)]
            }
            Command::DbResetTest => vec![Task::DbResetTest],
            Command::Script { name } => vec![Task::Script(ScriptName::parse(&name)?)],
            Command::Ci => vec![Task::Check, Task::Test],
            Command::Ready => vec![Task::Lint, Task::Test],
            Command::Bootstrap { skip_if_exists } => return Ok(Plan::Bootstrap { skip_if_exists }),
            Command::InstallTool => return Ok(Plan::InstallTool),
        };
        Ok(Plan::Tasks(tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("devtask").chain(args.iter().copied()))
    }

    #[test]
    fn subcommands_are_kebab_case() {
        assert_eq!(parse(&["test-fast"]).unwrap().command, Some(Command::TestFast));
        assert_eq!(parse(&["db-reset-test"]).unwrap().command, Some(Command::DbResetTest));
        assert_eq!(
            parse(&["migration-create", "add users table"]).unwrap().command,
            Some(Command::MigrationCreate {
                message: "add users table".into()
            })
        );
        assert_eq!(
            parse(&["bootstrap", "--skip-if-exists"]).unwrap().command,
            Some(Command::Bootstrap {
                skip_if_exists: true
            })
        );
    }

    #[test]
    fn unknown_subcommand_is_usage_error() {
        let err = parse(&["deploy"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn migration_create_requires_message() {
        let err = parse(&["migration-create"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_subcommand_lists() {
        assert_eq!(Plan::resolve(parse(&[]).unwrap().command).unwrap(), Plan::List);
    }

    #[test]
    fn composites_expand_in_order() {
        assert_eq!(
            Plan::resolve(Some(Command::Ci)).unwrap(),
            Plan::Tasks(vec![Task::Check, Task::Test])
        );
        assert_eq!(
            Plan::resolve(Some(Command::Ready)).unwrap(),
            Plan::Tasks(vec![Task::Lint, Task::Test])
        );
        assert_eq!(
            Plan::resolve(Some(Command::Dev)).unwrap(),
            Plan::Tasks(vec![Task::Serve])
        );
    }

    #[test]
    fn bad_script_name_is_rejected() {
        let err = Plan::resolve(Some(Command::Script {
            name: "check-db && ls".into(),
        }))
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
