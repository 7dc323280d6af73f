use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use swap_app::app::App;
use swap_app::cli::Cli;
use swap_app::commands;
use swap_app::config::AppConfig;
use swap_app::logging;
use swap_app::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?.apply_overrides(cli.overrides());
    logging::init_logging(&config.log_level);
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration loaded");

    let state_file = config.state_file.clone();
    let mut state = AppState::load(&state_file)?;
    let app = App::open(config).await?;
    info!(backend = %app.config.database.backend, user_id = %state.user_id, "ready");

    let before = state.clone();
    let mut stdout = io::stdout().lock();
    let result = commands::dispatch(cli.command, &app, &mut state, &mut stdout).await;

    if state != before {
        state.save(&state_file).context("Failed to save state")?;
    }
    result
}
