pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feedrelay")]
#[command(about = "Relay new feed items to a Telegram channel", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/feedrelay/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database holding the delivered links
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the feed and post new items until interrupted (default)
    Run,
    /// Fetch the feed once and show which items are new, without posting
    Check,
    /// Show delivery history
    Status {
        /// Number of recent records to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}
