//! Flip Wars: a tile-flipping game against the computer.
//!
//! ## Usage
//!
//! - `flipwars` - Watch a demo game
//! - `flipwars protocol` - Start the text protocol server on stdin/stdout
//! - `flipwars demo --size 6 --difficulty predictive` - Demo with options
//! - `flipwars --difficulty easy --lock-policy immunity` - Preset with an override

use std::thread;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::Level;

use flipwars::adjacency::Pattern;
use flipwars::board::Side;
use flipwars::config::{Difficulty, LockPolicy, Scoring, SessionConfig, TieBreak};
use flipwars::constants::DEFAULT_GRID_SIZE;
use flipwars::protocol::ProtocolEngine;
use flipwars::session::{Completion, EndReason, GameSession, GameStatus};

/// Flip Wars: a tile-flipping game engine
#[derive(Parser)]
#[command(name = "flipwars")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Board side length
    #[arg(global = true, short, long, default_value_t = DEFAULT_GRID_SIZE)]
    size: usize,

    #[arg(global = true, short, long, value_enum, default_value_t = Difficulty::Hard)]
    difficulty: Difficulty,

    /// Which tiles an activation flips
    #[arg(global = true, short, long, value_enum, default_value_t = Pattern::Orthogonal)]
    pattern: Pattern,

    /// Seed for reproducible games
    #[arg(global = true, long)]
    seed: Option<u64>,

    /// Override the preset's lock policy
    #[arg(global = true, long, value_enum)]
    lock_policy: Option<LockPolicy>,

    /// Override the preset's tie-break
    #[arg(global = true, long, value_enum)]
    tie_break: Option<TieBreak>,

    /// Override the preset's tile values
    #[arg(global = true, long, value_enum)]
    scoring: Option<Scoring>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(global = true, short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the line protocol server for use with front ends
    Protocol,
    /// Play a full game where the human follows the engine's hints
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let session = GameSession::new(session_config(&cli)).context("failed to start a game")?;

    match cli.command {
        Some(Commands::Protocol) => {
            let mut engine = ProtocolEngine::new(session);
            engine.run().context("protocol I/O failed")?;
        }
        Some(Commands::Demo) | None => run_demo(session)?,
    }
    Ok(())
}

/// The difficulty preset with any per-field overrides applied.
fn session_config(cli: &Cli) -> SessionConfig {
    let mut config = SessionConfig::new(cli.size, cli.pattern, cli.difficulty);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(policy) = cli.lock_policy {
        config.engine.lock_policy = policy;
    }
    if let Some(tie_break) = cli.tie_break {
        config.engine.tie_break = tie_break;
    }
    if let Some(scoring) = cli.scoring {
        config.engine.scoring = scoring;
    }
    config
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run_demo(mut session: GameSession) -> Result<()> {
    let size = session.config().grid_size;
    println!("Flip Wars: {size}x{size}, {:?}\n", session.config().pattern);
    println!("{}", session.board());

    while session.status() == GameStatus::InProgress {
        let Some(tile) = session.hint()? else {
            println!("Human has no legal move.");
            break;
        };
        session.play_human(tile)?;
        println!("Human plays {tile}");
        println!("{}", session.board());
        if session.status() != GameStatus::InProgress {
            break;
        }

        // The search runs off the game thread; the session only sees the result.
        let pending = session.dispatch()?;
        let computed = thread::spawn(move || pending.compute())
            .join()
            .map_err(|_| anyhow!("search thread panicked"))??;
        match session.complete(computed)? {
            Completion::Applied { tile, fallback, .. } => {
                let note = if fallback { " (fallback)" } else { "" };
                println!("Computer plays {tile}{note}");
            }
            Completion::Stale => println!("Computer move discarded"),
        }
        println!("{}", session.board());

        let (human, computer) = session.counts();
        println!(
            "Round {}: human {human}, computer {computer}, score {:.1}\n",
            session.board().turns_played,
            session.evaluate(Side::Human)?,
        );
    }

    if let GameStatus::Finished(outcome) = session.status() {
        let how = match outcome.reason {
            EndReason::Sweep => "sweep",
            EndReason::TurnLimit => "turn limit",
        };
        match outcome.winner {
            Some(side) => println!("Winner: {side} ({how})"),
            None => println!("Draw ({how})"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipwars::config::EngineConfig;

    #[test]
    fn test_defaults_use_the_preset() {
        let cli = Cli::try_parse_from(["flipwars"]).unwrap();
        let config = session_config(&cli);
        assert_eq!(config.grid_size, DEFAULT_GRID_SIZE);
        assert_eq!(config.engine, EngineConfig::preset(Difficulty::Hard));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_overrides_replace_preset_fields() {
        let cli = Cli::try_parse_from([
            "flipwars",
            "demo",
            "--difficulty",
            "easy",
            "--lock-policy",
            "immunity",
            "--tie-break",
            "lowest-index",
            "--scoring",
            "tile-count",
            "--seed",
            "3",
        ])
        .unwrap();
        let config = session_config(&cli);
        let easy = EngineConfig::preset(Difficulty::Easy);
        assert_eq!(config.engine.lock_policy, LockPolicy::Immunity);
        assert_eq!(config.engine.tie_break, TieBreak::LowestIndex);
        assert_eq!(config.engine.scoring, Scoring::TileCount);
        assert_eq!(config.engine.blunder_probability, easy.blunder_probability);
        assert_eq!(config.seed, Some(3));
        assert!(GameSession::new(config).is_ok());
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["flipwars", "--lock-policy", "sometimes"]).is_err());
    }
}
