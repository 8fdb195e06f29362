//! Flip Wars: a tile-flipping game engine.
//!
//! Activating a tile inverts it and its neighbours. This crate decides the
//! computer's moves with a greedy heuristic search over simulated boards,
//! restricted by a short-term memory of recently played tiles.
//!
//! ## Modules
//!
//! - [`constants`] - Grid limits, heuristic weights and engine parameters
//! - [`adjacency`] - Which tiles an activation flips
//! - [`board`] - Board state and flip propagation
//! - [`lock`] - Recently activated tiles (tabu list)
//! - [`heuristic`] - Positional tile values
//! - [`eval`] - Differential board evaluation
//! - [`simulate`] - Hypothetical moves on board copies
//! - [`selector`] - Move selection with lookahead, traps and blunders
//! - [`config`] - Engine presets and session settings
//! - [`session`] - A game between a human and the computer
//! - [`protocol`] - Line-based text protocol
//! - [`error`] - Error type
//!
//! ## Example
//!
//! ```
//! use flipwars::adjacency::Pattern;
//! use flipwars::config::{Difficulty, SessionConfig};
//! use flipwars::session::{GameSession, GameStatus};
//!
//! let config = SessionConfig::new(4, Pattern::Orthogonal, Difficulty::Hard).with_seed(7);
//! let mut session = GameSession::new(config).unwrap();
//!
//! // Follow the engine's advice, then let the computer answer
//! let tile = session.hint().unwrap().unwrap();
//! if session.play_human(tile).unwrap() == GameStatus::InProgress {
//!     session.play_computer().unwrap();
//! }
//! println!("{}", session.board());
//! ```

pub mod adjacency;
pub mod board;
pub mod config;
pub mod constants;
pub mod error;
pub mod eval;
pub mod heuristic;
pub mod lock;
pub mod protocol;
pub mod selector;
pub mod session;
pub mod simulate;
