mod event;
mod moves;
mod player;

pub use event::GameEvent;
pub use player::{OffTrackData, Player, PlayerId, PlayerType, TurnType};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::config::GameConfig;
use crate::error::{GameError, Result, TrackError};
use crate::math::line_2d::on_segment;
use crate::math::{Arrow, WorldPoint};
use crate::track::Track;
use event::Observers;

/// Race lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Collecting players.
    WaitingPlayers,
    /// Each player picks a start position in turn.
    StartSelection,
    /// Players move in turn.
    Playing,
    Stopped,
}

/// Race bookkeeping for one player.
#[derive(Debug, Clone)]
pub struct PlayerInfo {
    player: Player,
    arrows: Vec<Arrow>,
    laps: u32,
    start_line_cross_count: i32,
    /// Last driven move, not yet checked for a lap.
    pending_move: Option<Arrow>,
}

impl PlayerInfo {
    fn new(player: Player) -> Self {
        Self {
            player,
            arrows: Vec::new(),
            laps: 0,
            start_line_cross_count: 0,
            pending_move: None,
        }
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Every arrow driven so far, oldest first.
    #[must_use]
    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    #[must_use]
    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Net signed start-line crossings.
    #[must_use]
    pub fn start_line_cross_count(&self) -> i32 {
        self.start_line_cross_count
    }

    fn reset_race(&mut self) {
        self.player.reset_race();
        self.arrows.clear();
        self.laps = 0;
        self.start_line_cross_count = 0;
        self.pending_move = None;
    }
}

/// Turn-based race over a ready [`Track`].
///
/// Driven by [`Game::update`] with elapsed logical time. Each turn the active
/// player either confirms a move or is auto-resolved when the turn timer runs
/// out.
#[derive(Debug)]
pub struct Game {
    track: Track,
    config: GameConfig,
    players: SlotMap<PlayerId, PlayerInfo>,
    /// Turn order.
    order: Vec<PlayerId>,
    start_taken: Vec<bool>,
    state: GameState,
    /// Index into `order` of the active player.
    current: Option<usize>,
    turn_timer: f64,
    rng: StdRng,
    observers: Observers,
}

impl Game {
    /// Creates a game waiting for players on `track`.
    ///
    /// # Errors
    ///
    /// Returns a config error for an invalid `config` and
    /// [`TrackError::NotReady`] when `track` is still being designed.
    pub fn new(track: Track, config: GameConfig) -> Result<Self> {
        config.validate()?;
        if !track.is_ready() {
            return Err(TrackError::NotReady(track.design_step()).into());
        }
        let rng = config
            .rng_seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let start_taken = vec![false; track.start_positions().len()];
        Ok(Self {
            track,
            config,
            players: SlotMap::with_key(),
            order: Vec::new(),
            start_taken,
            state: GameState::WaitingPlayers,
            current: None,
            turn_timer: 0.0,
            rng,
            observers: Observers::default(),
        })
    }

    #[must_use]
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Gives the track back, ending the game.
    #[must_use]
    pub fn into_track(self) -> Track {
        self.track
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Seconds elapsed in the current turn.
    #[must_use]
    pub fn turn_timer(&self) -> f64 {
        self.turn_timer
    }

    /// Registers a handler for [`GameEvent`]s.
    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) {
        self.observers.subscribe(handler);
    }

    /// Adds a player while waiting for players, up to one per start position.
    pub fn add_player(&mut self, kind: PlayerType) -> Option<PlayerId> {
        if self.state != GameState::WaitingPlayers || self.order.len() >= self.start_taken.len() {
            return None;
        }
        let mut player = Player::new(kind);
        player.set_color(self.order.len());
        let id = self.players.insert(PlayerInfo::new(player));
        self.order.push(id);
        tracing::info!(player = ?id, kind = ?kind, "player joined");
        Some(id)
    }

    /// Removes a player outside a running race.
    pub fn remove_player(&mut self, id: PlayerId) -> bool {
        if matches!(self.state, GameState::StartSelection | GameState::Playing) {
            return false;
        }
        if self.players.remove(id).is_none() {
            return false;
        }
        self.order.retain(|&p| p != id);
        tracing::info!(player = ?id, "player left");
        true
    }

    /// Player ids in turn order.
    #[must_use]
    pub fn player_ids(&self) -> &[PlayerId] {
        &self.order
    }

    #[must_use]
    pub fn player_info(&self, id: PlayerId) -> Option<&PlayerInfo> {
        self.players.get(id)
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id).map(|i| &i.player)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id).map(|i| &mut i.player)
    }

    /// Every arrow `id` has driven; empty for an unknown player.
    #[must_use]
    pub fn arrows(&self, id: PlayerId) -> &[Arrow] {
        self.players.get(id).map_or(&[], |i| &i.arrows)
    }

    #[must_use]
    pub fn laps(&self, id: PlayerId) -> u32 {
        self.players.get(id).map_or(0, |i| i.laps)
    }

    /// Which start positions have been claimed.
    #[must_use]
    pub fn start_positions_taken(&self) -> &[bool] {
        &self.start_taken
    }

    #[must_use]
    pub fn active_player_id(&self) -> Option<PlayerId> {
        self.current.and_then(|i| self.order.get(i).copied())
    }

    #[must_use]
    pub fn active_player(&self) -> Option<&Player> {
        self.active_player_id().and_then(|id| self.player(id))
    }

    pub fn active_player_mut(&mut self) -> Option<&mut Player> {
        let id = self.active_player_id()?;
        self.player_mut(id)
    }

    #[must_use]
    pub fn is_grid_point_on_track(&self, p: &crate::math::GridPoint) -> bool {
        self.track.is_grid_point_on_track(p)
    }

    #[must_use]
    pub fn is_world_point_on_track(&self, wp: &WorldPoint) -> bool {
        self.track.is_world_point_on_track(wp)
    }

    /// Starts start-position selection and activates the first player.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyStarted`] while a race is running and
    /// [`GameError::NoPlayers`] with nobody joined.
    pub fn start(&mut self) -> std::result::Result<(), GameError> {
        if matches!(self.state, GameState::StartSelection | GameState::Playing) {
            return Err(GameError::AlreadyStarted(self.state));
        }
        if self.order.is_empty() {
            return Err(GameError::NoPlayers);
        }
        for info in self.players.values_mut() {
            info.reset_race();
        }
        self.start_taken.fill(false);
        self.current = None;
        self.turn_timer = 0.0;
        self.set_state(GameState::StartSelection);
        self.next_turn()
    }

    /// Halts a running race.
    pub fn stop(&mut self) {
        if self.state == GameState::Stopped {
            return;
        }
        if let Some(p) = self.active_player_mut() {
            p.end_turn();
        }
        self.current = None;
        self.set_state(GameState::Stopped);
    }

    /// Stops the race and drops every player.
    pub fn reset(&mut self) {
        self.stop();
        self.players.clear();
        self.order.clear();
        self.start_taken.fill(false);
        self.turn_timer = 0.0;
        self.set_state(GameState::WaitingPlayers);
    }

    /// Advances the game by `dt` seconds of logical time.
    ///
    /// While waiting, the race starts once every start position has a player.
    /// During a race, the active player's move is applied when confirmed or
    /// when the turn timer reaches the limit.
    ///
    /// # Errors
    ///
    /// Propagates [`GameError`]s from turn processing.
    pub fn update(&mut self, dt: f64) -> std::result::Result<(), GameError> {
        match self.state {
            GameState::WaitingPlayers => {
                if !self.order.is_empty() && self.order.len() == self.start_taken.len() {
                    self.start()?;
                }
                Ok(())
            }
            GameState::Stopped => Ok(()),
            GameState::StartSelection | GameState::Playing => {
                self.turn_timer += dt;
                let ready = self.active_player().is_some_and(Player::action_ready);
                if ready || self.turn_timer >= self.config.turn_time_limit {
                    self.process_player_selection()?;
                    self.next_turn()?;
                }
                Ok(())
            }
        }
    }

    fn set_state(&mut self, state: GameState) {
        if self.state == state {
            return;
        }
        self.state = state;
        tracing::info!(state = ?state, "game state changed");
        self.observers.notify(&GameEvent::StateChanged(state));
    }

    fn current_id(&self) -> std::result::Result<PlayerId, GameError> {
        self.active_player_id().ok_or(GameError::NoPlayers)
    }

    fn info_mut(&mut self, id: PlayerId) -> std::result::Result<&mut PlayerInfo, GameError> {
        self.players.get_mut(id).ok_or(GameError::NoPlayers)
    }

    fn disqualify(&mut self, id: PlayerId, reason: &'static str) -> std::result::Result<(), GameError> {
        self.info_mut(id)?.player.activate_turn(TurnType::Finished);
        tracing::info!(player = ?id, reason, "player disqualified");
        Ok(())
    }

    /// Applies the active player's move: the confirmed point when it is legal,
    /// otherwise a substitute.
    fn process_player_selection(&mut self) -> std::result::Result<(), GameError> {
        let id = self.current_id()?;
        let legal = self.player_vectors()?;
        let chosen = self.players[id]
            .player
            .action_point()
            .and_then(|p| legal.iter().find(|a| a.to == p).copied());

        match self.state {
            GameState::StartSelection => {
                let Some(arrow) = chosen else {
                    return self.disqualify(id, "no start position chosen");
                };
                let slot = self
                    .track
                    .start_positions()
                    .iter()
                    .zip(&self.start_taken)
                    .position(|(sp, taken)| !taken && sp.arrow() == arrow);
                if let Some(slot) = slot {
                    self.start_taken[slot] = true;
                }
                let info = self.info_mut(id)?;
                info.arrows.push(arrow);
                info.player.set_last_arrow(arrow);
                tracing::debug!(player = ?id, x = arrow.from.x, y = arrow.from.y, "start position taken");
                Ok(())
            }
            GameState::Playing => {
                let arrow = match chosen {
                    Some(a) => a,
                    None => match self.auto_select_player_vector(&legal) {
                        Some(a) => {
                            tracing::debug!(player = ?id, x = a.to.x, y = a.to.y, "move auto-selected");
                            a
                        }
                        None => return self.disqualify(id, "no legal move"),
                    },
                };
                self.drive(id, arrow)
            }
            state => Err(GameError::InvalidState(state)),
        }
    }

    /// Records a driven move and updates the off-track and anti-cheat state.
    fn drive(&mut self, id: PlayerId, arrow: Arrow) -> std::result::Result<(), GameError> {
        let on_track = self.track.is_grid_point_on_track(&arrow.to);
        let crossing = self.track.compute_crossing_index(&arrow.from, &arrow.to);
        let shortcut = self
            .track
            .start_line_crossing(&arrow.from, &arrow.to, true)
            .filter(|(_, point)| {
                // Hits on the start segment itself are counted by `check_win`.
                let on_line = self
                    .track
                    .start_line()
                    .is_some_and(|sl| on_segment(&sl.p1, point, &sl.p2));
                !on_line && !self.track.is_world_point_on_track(point)
            })
            .map_or(0, |(sign, _)| sign);

        let info = self.info_mut(id)?;
        info.arrows.push(arrow);
        info.player.set_last_arrow(arrow);
        info.pending_move = Some(arrow);

        let was_off = info.player.off_track().off_track;
        if !on_track && !was_off {
            *info.player.off_track_mut() = OffTrackData {
                off_track: true,
                crossing,
            };
            let freeze = Arrow::new(arrow.to, arrow.to);
            info.arrows.push(freeze);
            info.player.set_last_arrow(freeze);
            tracing::debug!(player = ?id, x = arrow.to.x, y = arrow.to.y, "player left the track");
        } else if on_track && was_off {
            *info.player.off_track_mut() = OffTrackData::default();
            tracing::debug!(player = ?id, x = arrow.to.x, y = arrow.to.y, "player back on track");
        }
        info.start_line_cross_count += shortcut;
        Ok(())
    }

    /// Ends the active turn and activates the next unfinished player.
    fn next_turn(&mut self) -> std::result::Result<(), GameError> {
        if self.order.is_empty() {
            self.set_state(GameState::Stopped);
        }
        if matches!(self.state, GameState::WaitingPlayers | GameState::Stopped) {
            return Ok(());
        }

        if let Some(id) = self.active_player_id() {
            self.info_mut(id)?.player.end_turn();
            if self.check_win(id) {
                self.info_mut(id)?.player.activate_turn(TurnType::Finished);
                tracing::info!(player = ?id, laps = self.laps(id), "player won");
            }
        }

        let n = self.order.len();
        let mut next = self.current.map_or(0, |c| c + 1);
        next = self.first_unfinished(next);
        if next == n {
            if self.state == GameState::StartSelection {
                self.set_state(GameState::Playing);
            }
            next = self.first_unfinished(0);
            if next == n {
                self.current = None;
                self.set_state(GameState::Stopped);
                return Ok(());
            }
        }

        self.current = Some(next);
        self.turn_timer = 0.0;
        let id = self.order[next];
        let turn = if self.state == GameState::StartSelection {
            TurnType::SelectStart
        } else {
            TurnType::Move
        };
        self.info_mut(id)?.player.activate_turn(turn);
        let moves = self.player_vectors()?;
        tracing::debug!(player = ?id, moves = moves.len(), "turn advanced");
        self.info_mut(id)?.player.set_allowed_vectors(moves);
        self.observers.notify(&GameEvent::TurnAdvanced { player: id });
        Ok(())
    }

    fn first_unfinished(&self, from: usize) -> usize {
        (from..self.order.len())
            .find(|&i| !self.players[self.order[i]].player.is_finished())
            .unwrap_or(self.order.len())
    }

    /// Counts the last driven move against the start line; `true` once the
    /// target lap count is reached.
    fn check_win(&mut self, id: PlayerId) -> bool {
        let target = self.config.target_laps;
        let Some(info) = self.players.get(id) else {
            return false;
        };
        if info.arrows.len() < 2 {
            return false;
        }
        let Some(mv) = info.pending_move else {
            return false;
        };
        let cross = self.track.check_start_line_cross(&mv.from, &mv.to, false);
        let Some(info) = self.players.get_mut(id) else {
            return false;
        };
        info.pending_move = None;
        info.start_line_cross_count += cross;
        if cross > 0 && info.start_line_cross_count > 0 {
            info.laps += 1;
            tracing::debug!(player = ?id, laps = info.laps, "lap completed");
            return info.laps >= target;
        }
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::math::GridPoint;
    use crate::track::tests::{config as track_config, ring_track};

    pub(crate) fn game_config() -> GameConfig {
        GameConfig {
            rng_seed: Some(7),
            ..GameConfig::default()
        }
    }

    pub(crate) fn gp(x: i32, y: i32) -> GridPoint {
        GridPoint::new(x, y)
    }

    /// Puts a lone player mid-race with the given history.
    pub(crate) fn racing(arrows: &[Arrow]) -> (Game, PlayerId) {
        let mut game = Game::new(ring_track(), game_config()).unwrap();
        let id = game.add_player(PlayerType::Human).unwrap();
        game.start().unwrap();
        game.state = GameState::Playing;
        let info = game.players.get_mut(id).unwrap();
        info.arrows = arrows.to_vec();
        info.player.set_last_arrow(*arrows.last().unwrap());
        info.player.activate_turn(TurnType::Move);
        let moves = game.player_vectors().unwrap();
        game.players[id].player.set_allowed_vectors(moves);
        (game, id)
    }

    fn confirm(game: &mut Game, p: GridPoint) {
        let player = game.active_player_mut().unwrap();
        player.select_next_point(p);
        player.confirm_next_point();
    }

    #[test]
    fn requires_ready_track() {
        let track = Track::new(&track_config()).unwrap();
        let err = Game::new(track, game_config()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::RaceError::Track(TrackError::NotReady(_))
        ));
    }

    #[test]
    fn players_capped_by_start_positions() {
        let mut game = Game::new(ring_track(), game_config()).unwrap();
        for _ in 0..9 {
            assert!(game.add_player(PlayerType::Ai).is_some());
        }
        assert!(game.add_player(PlayerType::Ai).is_none());
        let colors: Vec<_> = game
            .player_ids()
            .iter()
            .map(|&id| game.player(id).unwrap().color())
            .collect();
        assert_eq!(colors, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn full_lobby_starts_on_update() {
        let mut game = Game::new(ring_track(), game_config()).unwrap();
        for _ in 0..9 {
            game.add_player(PlayerType::Human);
        }
        game.update(0.0).unwrap();
        assert_eq!(game.state(), GameState::StartSelection);
        assert_eq!(game.active_player().unwrap().turn(), TurnType::SelectStart);
    }

    #[test]
    fn start_without_players_fails() {
        let mut game = Game::new(ring_track(), game_config()).unwrap();
        assert_eq!(game.start(), Err(GameError::NoPlayers));
        game.update(1.0).unwrap();
        assert_eq!(game.state(), GameState::WaitingPlayers);
    }

    #[test]
    fn start_selection_claims_positions() {
        let mut game = Game::new(ring_track(), game_config()).unwrap();
        let a = game.add_player(PlayerType::Human).unwrap();
        let b = game.add_player(PlayerType::Human).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        game.subscribe(move |e| sink.borrow_mut().push(*e));

        game.start().unwrap();
        assert_eq!(game.start(), Err(GameError::AlreadyStarted(GameState::StartSelection)));
        assert_eq!(game.active_player_id(), Some(a));
        assert_eq!(game.active_player().unwrap().valid_moves().len(), 9);

        confirm(&mut game, gp(5, 16));
        game.update(0.0).unwrap();
        assert_eq!(game.arrows(a), &[Arrow::new(gp(5, 15), gp(5, 16))]);
        assert!(game.start_positions_taken()[2]);
        assert_eq!(game.active_player_id(), Some(b));
        assert_eq!(game.active_player().unwrap().valid_moves().len(), 8);

        confirm(&mut game, gp(3, 16));
        game.update(0.0).unwrap();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.active_player_id(), Some(a));
        assert_eq!(game.active_player().unwrap().turn(), TurnType::Move);

        assert_eq!(
            *events.borrow(),
            vec![
                GameEvent::StateChanged(GameState::StartSelection),
                GameEvent::TurnAdvanced { player: a },
                GameEvent::TurnAdvanced { player: b },
                GameEvent::StateChanged(GameState::Playing),
                GameEvent::TurnAdvanced { player: a },
            ]
        );
    }

    #[test]
    fn timeout_in_start_selection_disqualifies() {
        let mut game = Game::new(ring_track(), game_config()).unwrap();
        let a = game.add_player(PlayerType::Human).unwrap();
        game.start().unwrap();
        game.update(10.0).unwrap();
        assert_eq!(game.state(), GameState::StartSelection);
        assert!((game.turn_timer() - 10.0).abs() < 1e-12);
        game.update(25.0).unwrap();
        assert!(game.player(a).unwrap().is_finished());
        assert_eq!(game.state(), GameState::Stopped);
    }

    #[test]
    fn illegal_start_choice_disqualifies() {
        let mut game = Game::new(ring_track(), game_config()).unwrap();
        let a = game.add_player(PlayerType::Human).unwrap();
        game.start().unwrap();
        confirm(&mut game, gp(20, 20));
        game.update(0.0).unwrap();
        assert!(game.player(a).unwrap().is_finished());
        assert!(game.arrows(a).is_empty());
    }

    #[test]
    fn crossing_start_line_wins() {
        let (mut game, id) = racing(&[
            Arrow::new(gp(5, 9), gp(5, 11)),
            Arrow::new(gp(5, 11), gp(5, 13)),
        ]);
        confirm(&mut game, gp(5, 16));
        game.update(0.0).unwrap();
        assert_eq!(game.laps(id), 1);
        assert!(game.player(id).unwrap().is_finished());
        assert_eq!(game.state(), GameState::Stopped);
    }

    #[test]
    fn crossing_backwards_does_not_count() {
        let (mut game, id) = racing(&[
            Arrow::new(gp(5, 19), gp(5, 17)),
            Arrow::new(gp(5, 17), gp(5, 16)),
        ]);
        confirm(&mut game, gp(5, 14));
        game.update(0.0).unwrap();
        assert_eq!(game.laps(id), 0);
        assert_eq!(game.player_info(id).unwrap().start_line_cross_count(), -1);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.active_player().unwrap().turn(), TurnType::Move);
    }

    #[test]
    fn crossing_through_start_line_end_counts_once() {
        let (mut game, id) = racing(&[Arrow::new(gp(2, 13), gp(2, 13))]);
        // Passes exactly through the start line's outer end at (25, 150).
        game.drive(id, Arrow::new(gp(2, 13), gp(3, 17))).unwrap();
        assert_eq!(game.player_info(id).unwrap().start_line_cross_count(), 0);
        assert!(game.check_win(id));
        assert_eq!(game.player_info(id).unwrap().start_line_cross_count(), 1);
        assert_eq!(game.laps(id), 1);
    }

    #[test]
    fn shortcut_through_the_infield_is_counted_on_drive() {
        let (mut game, id) = racing(&[Arrow::new(gp(20, 13), gp(20, 13))]);
        game.drive(id, Arrow::new(gp(20, 13), gp(20, 17))).unwrap();
        assert_eq!(game.player_info(id).unwrap().start_line_cross_count(), 1);
        assert!(!game.check_win(id));
        assert_eq!(game.player_info(id).unwrap().start_line_cross_count(), 1);
        assert_eq!(game.laps(id), 0);
    }

    #[test]
    fn leaving_track_freezes_and_records_exit() {
        let (mut game, id) = racing(&[
            Arrow::new(gp(4, 10), gp(4, 10)),
            Arrow::new(gp(4, 10), gp(3, 10)),
        ]);
        confirm(&mut game, gp(2, 10));
        game.update(0.0).unwrap();
        let arrows = game.arrows(id);
        assert_eq!(arrows[arrows.len() - 2], Arrow::new(gp(3, 10), gp(2, 10)));
        assert_eq!(arrows[arrows.len() - 1], Arrow::new(gp(2, 10), gp(2, 10)));
        let player = game.player(id).unwrap();
        assert!(player.off_track().off_track);
        let exit = player.off_track().crossing.unwrap();
        assert!((exit.position - (3.0 + 180.0 / 260.0)).abs() < 1e-9);
        // Off track, only unit moves remain.
        assert!(player.valid_moves().iter().all(|a| a.length() <= 1));

        confirm(&mut game, gp(3, 9));
        game.update(0.0).unwrap();
        assert!(!game.player(id).unwrap().off_track().off_track);
    }

    #[test]
    fn timeout_auto_selects_and_resets_timer() {
        let (mut game, id) = racing(&[
            Arrow::new(gp(5, 17), gp(6, 18)),
            Arrow::new(gp(6, 18), gp(7, 19)),
        ]);
        game.update(29.0).unwrap();
        assert_eq!(game.arrows(id).len(), 2);
        game.update(1.0).unwrap();
        assert_eq!(game.arrows(id).last(), Some(&Arrow::new(gp(7, 19), gp(8, 20))));
        assert!(game.turn_timer().abs() < 1e-12);
    }

    #[test]
    fn reset_returns_to_lobby() {
        let (mut game, _) = racing(&[Arrow::new(gp(5, 15), gp(5, 16))]);
        game.reset();
        assert_eq!(game.state(), GameState::WaitingPlayers);
        assert!(game.player_ids().is_empty());
        assert!(game.start_positions_taken().iter().all(|t| !t));
    }

    #[test]
    fn stopped_game_can_restart() {
        let (mut game, id) = racing(&[Arrow::new(gp(5, 15), gp(5, 16))]);
        game.stop();
        assert_eq!(game.state(), GameState::Stopped);
        assert!(game.active_player_id().is_none());
        game.start().unwrap();
        assert_eq!(game.state(), GameState::StartSelection);
        assert!(game.arrows(id).is_empty());
        assert_eq!(game.active_player_id(), Some(id));
    }
}
