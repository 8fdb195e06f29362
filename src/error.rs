//! Error type shared by the engine and the session.

use thiserror::Error;

use crate::board::Side;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("tile {tile} is outside the board (0..{tiles})")]
    InvalidTileIndex { tile: usize, tiles: usize },

    #[error("grid size {0} is not supported")]
    InvalidGridSize(usize),

    #[error("tile {tile} is locked for {countdown} more move(s)")]
    TileLocked { tile: usize, countdown: usize },

    #[error("it is the {0}'s turn")]
    OutOfTurn(Side),

    #[error("the game is over")]
    GameOver,

    #[error("configuration error: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
