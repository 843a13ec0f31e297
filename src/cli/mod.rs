//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;

use crate::{config, logging, tui};

mod commands;

#[derive(Parser)]
#[command(name = "dj-console")]
#[command(version)]
#[command(about = "Terminal console for dj-kubelet")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Gateway base URL (overrides config)
    #[arg(long, env = "DJ_CONSOLE_BASE_URL")]
    base_url: Option<String>,

    /// Identity provider segment of the login path (overrides config)
    #[arg(long)]
    provider: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the current user profile
    User {
        /// Print the raw profile document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the external login page in the browser
    Login {
        /// Print the login URL without opening a browser
        #[arg(long)]
        print_only: bool,
    },

    /// Log out from the gateway
    Logout,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = config::Config::load().context("load config")?;

    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(provider) = cli.provider {
        config.provider = provider;
    }

    // Fail early on an unusable base URL rather than on the first request.
    Url::parse(config.effective_base_url())
        .with_context(|| format!("invalid base URL: {}", config.base_url))?;

    let _log_guard = logging::init(&config::paths::console_home())?;

    // default to the session view
    let Some(command) = cli.command else {
        return tui::run(&config);
    };

    match command {
        Commands::User { json } => commands::session::user(&config, json).await,
        Commands::Login { print_only } => commands::session::login(&config, print_only),
        Commands::Logout => commands::session::logout(&config).await,
        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
