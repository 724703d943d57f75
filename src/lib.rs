pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod domain;
pub mod models;
pub mod presentation;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Commands};
pub use config::Config;
use config::LogFormat;
use state::AppState;

/// Resolves configuration for `cli`: explicit file or search paths, then env.
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from_path(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };

    if let Some(level) = &cli.log_level {
        config.general.log_level.clone_from(level);
    }
    Ok(config)
}

/// Installs the global subscriber. Logs go to stderr; stdout is the UI.
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let json = config.general.log_format == LogFormat::Json;
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let fmt_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(())
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config)?;

    if let Some(Commands::Init { path }) = &cli.command {
        if Config::create_default_if_missing(path)? {
            println!("Wrote default config to {}", path.display());
        } else {
            println!("Config already exists at {}", path.display());
        }
        return Ok(());
    }

    config.validate()?;
    let trending_limit = config.search.trending_limit;
    let state = AppState::from_config(config)?;

    let mut stdout = std::io::stdout();
    let result = match cli.command {
        None | Some(Commands::Interactive) => {
            info!("Starting interactive search");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session::run_interactive(&state, stdin, &mut stdout).await
        }
        Some(Commands::Search { query }) => {
            session::run_search(&state, &query.join(" "), &mut stdout).await
        }
        Some(Commands::Trending { limit }) => {
            session::run_trending(&state, limit.unwrap_or(trending_limit), &mut stdout).await
        }
        Some(Commands::Init { .. }) => Ok(()),
    };

    state.shutdown().await;
    result
}
