//! Anew CLI - multi-perspective news summaries in the terminal
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anew::logging::{self, LogTarget};
use anew::summary::Topic;
use anew::{render, ui, ApiClient, Config, HomeView};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "anew")]
#[command(author, version, about = "Multi-perspective news summaries in the terminal", long_about = None)]
struct Cli {
    /// Path to a config file (defaults to ./anew.toml, then ~/.config/anew/anew.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Backend base URL, overriding config and ANEW_API_URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Ping,
    /// Fetch the current summary and print it
    Show {
        /// Print the raw JSON response instead of the rendered page
        #[arg(long)]
        raw: bool,
    },
    /// Print the JSON Schema of the topic list
    Schema,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.clone().or_else(Config::find_config_file);
    let mut config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::from_env()?,
    };
    if let Some(url) = &cli.base_url {
        config.set_base_url(url)?;
    }

    let target = match cli.command {
        None => LogTarget::File,
        Some(_) => LogTarget::Stderr,
    };
    logging::init(&config.log.level, target);
    match &config_path {
        Some(path) => tracing::debug!(
            path = %path.display(),
            base_url = %config.api.base_url,
            "loaded config"
        ),
        None => tracing::debug!(base_url = %config.api.base_url, "no config file, using defaults"),
    }

    match cli.command {
        Some(Commands::Ping) => {
            let client = ApiClient::new(&config.api)?;
            let pong = client.ping().await?;
            println!("{}", serde_json::to_string_pretty(&pong)?);
        }
        Some(Commands::Show { raw }) => {
            let client = ApiClient::new(&config.api)?;

            if raw {
                let body = client.get_summary_raw().await?;
                println!("{}", serde_json::to_string_pretty(&body)?);
                return Ok(());
            }

            let mut view = HomeView::new();
            let state = view.settle(client.get_summary().await);
            let page = render::page(state, &config.display);
            print!("{}", page);

            if matches!(page, render::Page::Error(_)) {
                std::process::exit(1);
            }
        }
        Some(Commands::Schema) => {
            let schema = schemars::schema_for!(Vec<Topic>);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
        None => {
            // Default: Launch the TUI
            let client = ApiClient::new(&config.api)?;
            ui::run(client, config.display).await?;
        }
    }

    Ok(())
}
