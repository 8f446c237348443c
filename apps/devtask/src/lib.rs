//! Developer task runner: the command catalogue, database bootstrap and
//! package manager installer.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod installer;
pub mod runner;
pub mod tasks;

use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Command, Plan};
pub use config::DevtaskConfig;
pub use error::DevtaskError;
pub use runner::{Invocation, ProcessRunner, SystemRunner};

/// Resolve and run one command line, returning the process exit code.
pub async fn execute<R>(
    command: Option<Command>,
    config: &DevtaskConfig,
    runner: &mut R,
) -> Result<i32, DevtaskError>
where
    R: ProcessRunner + ?Sized,
{
    match Plan::resolve(command)? {
        Plan::List => {
            print!("{}", tasks::listing());
            Ok(0)
        }
        Plan::Tasks(tasks) => tasks::run_sequence(&tasks, runner, &config.project_dir),
        Plan::Bootstrap { skip_if_exists } => {
            bootstrap::run(skip_if_exists).await?;
            Ok(0)
        }
        Plan::InstallTool => {
            installer::install(&config.installer, runner).await?;
            Ok(0)
        }
    }
}

/// Plain stdout logging without timestamps or targets. `RUST_LOG` overrides
/// `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter(filter)
        .init();
}
