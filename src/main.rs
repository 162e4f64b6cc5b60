#[macro_use]
extern crate impl_ops;

mod agents;
mod attacks;
mod boards;
mod chess_errors;
mod config;
mod coordinates;
mod game;
mod moves;
mod pieces;
mod positions;
mod scorer;
mod utils;

use agents::*;
use chess_errors::*;
use config::*;
use game::*;
use positions::Position;
use scorer::PlaceholderScorer;
use tracing::{error, info};

// ---------------------------------------------
// Main
// ---------------------------------------------

fn build_agent(kind: AgentKind, seed: Option<u64>) -> Box<dyn Agent> {
    let rng = utils::seeded_rng(seed);
    match kind {
        AgentKind::Human => Box::new(HumanAgent::new()),
        AgentKind::Random => Box::new(RandomAgent::new(rng)),
        AgentKind::Scorer => Box::new(ScorerAgent::new(PlaceholderScorer::new(rng))),
    }
}

fn run() -> ChessResult<()> {
    let config = GameConfig::from_env()?;
    let start = match &config.fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::standard_start(),
    };
    info!(fen = %start.to_fen(), white = ?config.white, black = ?config.black, "starting game");

    // distinct streams for the two sides when seeded
    let white = build_agent(config.white, config.seed);
    let black = build_agent(config.black, config.seed.map(|s| s.wrapping_add(1)));

    let opening: Vec<&str> = config.moves.iter().map(String::as_str).collect();
    let history = GameHistory::replay(start, &opening)?;
    let mut game = Game::from_history(white, black, history);
    let outcome = game.play(config.max_plies)?;

    if let Some(position) = game.history().current() {
        println!("{}", position);
        println!("{}", position.to_fen());
    }
    println!("{}", game.history().move_list());
    println!("{}", outcome);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_core=info".into()),
        )
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
