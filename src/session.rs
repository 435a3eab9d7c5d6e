use crate::config::{GameConfig, TrackConfig};
use crate::error::{GameError, Result, TrackError};
use crate::game::Game;
use crate::track::{DesignStep, Polygon, Track};

/// Owns the track while it is designed and the game once the race begins.
#[derive(Debug)]
pub struct Session {
    track: Option<Track>,
    game: Option<Game>,
}

impl Session {
    /// Opens a session with an empty track in design mode.
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` does not validate.
    pub fn new(config: &TrackConfig) -> Result<Self> {
        let mut track = Track::new(config)?;
        track.enable_design_mode(true);
        Ok(Self::from_track(track))
    }

    /// Opens a session around an existing track, such as a preset map.
    #[must_use]
    pub fn from_track(track: Track) -> Self {
        Self {
            track: Some(track),
            game: None,
        }
    }

    /// The track, in either phase.
    #[must_use]
    pub fn track(&self) -> Option<&Track> {
        self.track
            .as_ref()
            .or_else(|| self.game.as_ref().map(Game::track))
    }

    /// The track while no race is running.
    pub fn track_mut(&mut self) -> Option<&mut Track> {
        self.track.as_mut()
    }

    #[must_use]
    pub fn is_racing(&self) -> bool {
        self.game.is_some()
    }

    /// Hands the ready track to a new [`Game`].
    ///
    /// # Errors
    ///
    /// Returns a config error for `config`, or [`TrackError::NotReady`] when
    /// the track is still being designed. The session is left unchanged on
    /// error.
    pub fn begin_race(&mut self, config: GameConfig) -> Result<&mut Game> {
        config.validate()?;
        if let Some(game) = &self.game {
            return Err(GameError::AlreadyStarted(game.state()).into());
        }
        match self.track.take() {
            Some(track) if track.is_ready() => {
                let game = Game::new(track, config)?;
                tracing::info!(
                    start_positions = game.track().start_positions().len(),
                    "race begins"
                );
                Ok(self.game.insert(game))
            }
            other => {
                let step = other
                    .as_ref()
                    .map_or(DesignStep::Draw(Polygon::Outer), Track::design_step);
                self.track = other;
                Err(TrackError::NotReady(step).into())
            }
        }
    }

    /// Ends the race and returns the track to the session.
    pub fn end_race(&mut self) {
        if let Some(game) = self.game.take() {
            self.track = Some(game.into_track());
        }
    }

    #[must_use]
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut Game> {
        self.game.as_mut()
    }
}
