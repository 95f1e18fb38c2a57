//! Trust Arena - console trust-or-betray game
//!
//! Plays rounds against the configured agents until interrupted, printing
//! every agent's decision and the resulting scores.

mod config;
mod display;
mod error;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trust_logic::{AgentError, Game, GameError};

use crate::config::{Args, Settings};
use crate::display::Format;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let settings = Settings::resolve(&args).context("invalid configuration")?;
    let mut game = settings
        .build_game(args.format)
        .context("cannot start the session")?;

    run(&mut game, &settings, args.format, args.rounds)
}

fn run(game: &mut Game, settings: &Settings, format: Format, rounds: Option<u64>) -> Result<()> {
    let stdout = io::stdout();

    while rounds.map_or(true, |limit| game.rounds_played() < limit) {
        let result = match game.play_round() {
            Ok(result) => result,
            Err(GameError::Agent { agent, source: AgentError::InputClosed }) => {
                let rounds = game.rounds_played();
                info!(%agent, rounds, "operator input closed, ending session");
                return Ok(());
            }
            Err(e) => return Err(e).context("round failed"),
        };

        display::render(&mut stdout.lock(), &result, format, settings.dialect)
            .context("cannot write round output")?;
    }

    info!(rounds = game.rounds_played(), "round limit reached");
    Ok(())
}
