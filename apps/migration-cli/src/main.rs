use clap::Parser;
use db_infra::config::db::load_dotenv;
use db_infra::orchestrate_migration;
use migration::MigrationCommand;
use migration_cli::{init_tracing, Env};

#[derive(Parser)]
#[command(name = "migration")]
#[command(about = "Geo registry database migration tool")]
struct Args {
    /// Migration command to run: up | down | fresh | reset | refresh | status
    command: String,

    /// Database profile (local uses DATABASE_URL, test uses DATABASE_URL_TEST)
    #[arg(short, long, value_enum, default_value = "local")]
    env: Env,
}

fn parse_command(raw: &str) -> Option<MigrationCommand> {
    match raw {
        "up" => Some(MigrationCommand::Up),
        "down" => Some(MigrationCommand::Down),
        "fresh" => Some(MigrationCommand::Fresh),
        "reset" => Some(MigrationCommand::Reset),
        "refresh" => Some(MigrationCommand::Refresh),
        "status" => Some(MigrationCommand::Status),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing("migration=info,db_infra=info,sqlx=warn");

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let Some(command) = parse_command(&args.command) else {
        eprintln!(
            "Unknown command: {}. Use: up | down | fresh | reset | refresh | status",
            args.command
        );
        std::process::exit(2);
    };

    if let Err(e) = orchestrate_migration(args.env.into(), command).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command("up"), Some(MigrationCommand::Up));
        assert_eq!(parse_command("status"), Some(MigrationCommand::Status));
        assert_eq!(parse_command("sideways"), None);
    }

    #[test]
    fn env_flag_defaults_to_local() {
        let args = Args::try_parse_from(["migration", "up"]).unwrap();
        assert_eq!(args.env, Env::Local);

        let args = Args::try_parse_from(["migration", "--env", "test", "fresh"]).unwrap();
        assert_eq!(args.env, Env::Test);
        assert_eq!(args.command, "fresh");
    }
}
