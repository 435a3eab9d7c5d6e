use thiserror::Error;

use crate::game::GameState;
use crate::track::DesignStep;

/// Top-level error type for the racing core.
#[derive(Debug, Error)]
pub enum RaceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Track(#[from] TrackError),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Errors raised while validating configuration payloads.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{parameter} = {value} must be positive")]
    NotPositive { parameter: &'static str, value: f64 },

    #[error("world area is empty: ({left}, {top}) .. ({right}, {bottom})")]
    EmptyArea {
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    },
}

/// Errors related to track construction and queries.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("track is not ready: design step is {0:?}")]
    NotReady(DesignStep),

    #[error("vertex ({x}, {y}) of polygon {polygon} was rejected")]
    VertexRejected { polygon: usize, x: f64, y: f64 },

    #[error("polygon {0} did not close")]
    PolygonNotClosed(usize),

    #[error("no valid start line through ({x}, {y})")]
    NoStartLine { x: f64, y: f64 },
}

/// Errors raised when the game is driven outside its state machine.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("game already started (state {0:?})")]
    AlreadyStarted(GameState),

    #[error("operation not valid in state {0:?}")]
    InvalidState(GameState),

    #[error("no players in the session")]
    NoPlayers,

    #[error("player has no recorded arrows")]
    NoArrows,
}

/// Convenience type alias for results using [`RaceError`].
pub type Result<T> = std::result::Result<T, RaceError>;
