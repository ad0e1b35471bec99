use anyhow::Result;
use clap::{Parser, Subcommand};

use loandash::cli;

#[derive(Debug, Parser)]
#[command(name = "loandash")]
#[command(about = "Cross-filtering terminal dashboard for loan-request statistics")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive dashboard: click chart categories to filter, repaint on every change
    Watch {
        /// Initial filter, as KEY=VALUE (repeatable)
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },
    /// Run one refresh cycle and print the dashboard
    Show {
        /// Filter, as KEY=VALUE (repeatable)
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check endpoint reachability, config files and the refresh journal
    Health,
    /// Show the latest refresh cycles from the journal
    History {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write a default config file to ~/.loandash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Watch { filters } => cli::run_watch(&filters),
        Commands::Show { filters, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_show(&filters, fmt)
        }
        Commands::Health => cli::run_health(),
        Commands::History { limit } => cli::run_history(limit),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
        },
    }
}
