use clap::Parser;
use db_infra::config::db::load_dotenv;
use devtask::{execute, init_tracing, Cli, DevtaskConfig, SystemRunner};
use tracing::error;

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing("devtask=info,db_infra=info,sqlx=warn");

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let config = match DevtaskConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(e.exit_code());
        }
    };

    let code = match execute(cli.command, &config, &mut SystemRunner).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "devtask failed");
            e.exit_code()
        }
    };
    std::process::exit(code);
}
