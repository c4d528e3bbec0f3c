use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedrelay::app::AppContext;
use feedrelay::cli::{commands, Cli, Commands};
use feedrelay::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.database {
        config.database_path = Some(path);
    }

    let ctx = AppContext::new(config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            commands::run(&ctx).await?;
        }
        Commands::Check => {
            commands::check(&ctx).await?;
        }
        Commands::Status { limit } => {
            commands::status(&ctx, limit)?;
        }
    }

    Ok(())
}
