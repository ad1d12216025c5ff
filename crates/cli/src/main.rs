mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seedbed")]
#[command(about = "Track and replay environment-scoped database seed scripts", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pending database seeds
    Run {
        /// Paths to the seed root directories (defaults from configuration)
        paths: Vec<PathBuf>,

        /// The environment to seed
        #[arg(long)]
        env: Option<String>,

        /// The database name to use
        #[arg(long)]
        database_name: Option<String>,

        /// Dump the SQL statements that would be run
        #[arg(long)]
        pretend: bool,

        /// Force the operation to run when in production
        #[arg(long)]
        force: bool,
    },

    /// Show the status of each seed
    Status {
        /// Paths to the seed root directories
        paths: Vec<PathBuf>,

        /// The environment to report on
        #[arg(long)]
        env: Option<String>,

        /// The database name to use
        #[arg(long)]
        database_name: Option<String>,
    },

    /// Create the seed repository table
    Install {
        /// The database name to use
        #[arg(long)]
        database_name: Option<String>,
    },

    /// Roll back the most recent seed batches
    Rollback {
        /// Paths to the seed root directories
        paths: Vec<PathBuf>,

        /// Number of batches to roll back
        #[arg(long, default_value_t = 1)]
        steps: usize,

        /// The environment to roll back
        #[arg(long)]
        env: Option<String>,

        /// The database name to use
        #[arg(long)]
        database_name: Option<String>,

        /// Force the operation to run when in production
        #[arg(long)]
        force: bool,
    },

    /// Roll back every seed that has run
    Reset {
        /// Paths to the seed root directories
        paths: Vec<PathBuf>,

        /// The environment to reset
        #[arg(long)]
        env: Option<String>,

        /// The database name to use
        #[arg(long)]
        database_name: Option<String>,

        /// Force the operation to run when in production
        #[arg(long)]
        force: bool,
    },

    /// Reset and re-run all seeds
    Refresh {
        /// Paths to the seed root directories
        paths: Vec<PathBuf>,

        /// The environment to refresh
        #[arg(long)]
        env: Option<String>,

        /// The database name to use
        #[arg(long)]
        database_name: Option<String>,

        /// Force the operation to run when in production
        #[arg(long)]
        force: bool,
    },

    /// Generate a new seed file
    Make {
        /// Seed name
        name: String,

        /// Target directory (defaults to the first configured root)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Environment subdirectory to generate into (defaults to "all")
        #[arg(long)]
        env: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            paths,
            env,
            database_name,
            pretend,
            force,
        } => commands::run::execute(paths, env, database_name, pretend, force).await,
        Commands::Status {
            paths,
            env,
            database_name,
        } => commands::status::execute(paths, env, database_name).await,
        Commands::Install { database_name } => commands::install::execute(database_name).await,
        Commands::Rollback {
            paths,
            steps,
            env,
            database_name,
            force,
        } => commands::rollback::execute(paths, steps, env, database_name, force).await,
        Commands::Reset {
            paths,
            env,
            database_name,
            force,
        } => commands::reset::execute(paths, env, database_name, force).await,
        Commands::Refresh {
            paths,
            env,
            database_name,
            force,
        } => commands::refresh::execute(paths, env, database_name, force).await,
        Commands::Make { name, dir, env } => commands::make::execute(&name, dir, env),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::parse_from([
            "seedbed", "run", "db/seeders", "--env", "staging", "--pretend", "--force",
        ]);
        match cli.command {
            Commands::Run {
                paths,
                env,
                pretend,
                force,
                ..
            } => {
                assert_eq!(paths, vec![PathBuf::from("db/seeders")]);
                assert_eq!(env.as_deref(), Some("staging"));
                assert!(pretend);
                assert!(force);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn rollback_defaults_to_one_step() {
        let cli = Cli::parse_from(["seedbed", "rollback"]);
        match cli.command {
            Commands::Rollback { steps, .. } => assert_eq!(steps, 1),
            _ => panic!("expected rollback command"),
        }
    }
}
