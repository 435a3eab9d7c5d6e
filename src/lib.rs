pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod math;
pub mod session;
pub mod track;
pub mod world_area;

pub use config::{AreaBounds, GameConfig, TrackConfig};
pub use error::{RaceError, Result};
pub use game::{Game, GameEvent, GameState, Player, PlayerId, PlayerType, TurnType};
pub use session::Session;
pub use track::{DesignStep, Polygon, Track};
