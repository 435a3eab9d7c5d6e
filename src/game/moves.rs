use rand::seq::SliceRandom;

use super::{Game, GameState};
use crate::error::GameError;
use crate::math::line_2d::{cross, on_segment};
use crate::math::{Arrow, GridVector, Vector2};
use crate::track::CrossingIndex;

impl Game {
    /// Legal moves for the active player.
    ///
    /// During start selection these are the arrows of the unclaimed start
    /// positions. While racing they are the arrows ending in the 3x3
    /// neighbourhood of `last.to + last.direction`, within the length limit,
    /// not re-entering the track ahead of where it was left, and with a free
    /// path.
    ///
    /// # Errors
    ///
    /// [`GameError::NoPlayers`] without an active player,
    /// [`GameError::NoArrows`] when a racing player has no history and
    /// [`GameError::InvalidState`] outside a race.
    pub fn player_vectors(&self) -> Result<Vec<Arrow>, GameError> {
        match self.state {
            GameState::StartSelection => Ok(self
                .track
                .start_positions()
                .iter()
                .zip(&self.start_taken)
                .filter(|(_, taken)| !**taken)
                .map(|(sp, _)| sp.arrow())
                .collect()),
            GameState::Playing => {
                let id = self.current_id()?;
                let info = &self.players[id];
                let last = *info.arrows.last().ok_or(GameError::NoArrows)?;
                let off = info.player.off_track();
                let max_len = if off.off_track {
                    self.config.off_track_arrow_length
                } else {
                    self.config.max_arrow_length
                };
                let center = last.to.offset(last.direction());

                let mut moves = Vec::new();
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let arrow = Arrow::new(last.to, center.offset(GridVector::new(dx, dy)));
                        if arrow.length() > max_len {
                            continue;
                        }
                        if let (true, Some(exit)) = (off.off_track, off.crossing) {
                            if self.track.is_grid_point_on_track(&arrow.to)
                                && self.reenters_ahead(&exit, &arrow)
                            {
                                continue;
                            }
                        }
                        if self.path_is_free(&arrow) {
                            moves.push(arrow);
                        }
                    }
                }
                Ok(moves)
            }
            state => Err(GameError::InvalidState(state)),
        }
    }

    /// `true` when `arrow` neither ends on nor passes through another
    /// player's position and crosses the boundary at most once.
    #[must_use]
    pub fn path_is_free(&self, arrow: &Arrow) -> bool {
        let grid = self.track.grid();
        let p1 = grid.grid_to_world(&arrow.from);
        let p2 = grid.grid_to_world(&arrow.to);
        for info in self.players.values() {
            let Some(last) = info.arrows.last() else {
                continue;
            };
            if arrow.from == last.to {
                continue;
            }
            if arrow.to == last.to || on_segment(&p1, &grid.grid_to_world(&last.to), &p2) {
                return false;
            }
        }
        self.track.intersections_count(&arrow.from, &arrow.to) <= 1
    }

    /// Picks a move for a player who did not choose in time.
    ///
    /// Prefers repeating the previous vector, then the shortest move in the
    /// same direction, then a random legal move.
    pub fn auto_select_player_vector(&mut self, moves: &[Arrow]) -> Option<Arrow> {
        let last = self
            .active_player_id()
            .and_then(|id| self.players[id].arrows.last().copied());
        if let Some(last) = last {
            let dir = last.direction();
            if let Some(same) = moves.iter().find(|a| a.direction() == dir) {
                return Some(*same);
            }
            let dir_f = to_f64(dir);
            let aligned = moves
                .iter()
                .filter(|a| {
                    let d = to_f64(a.direction());
                    cross(&d, &dir_f) == 0.0 && d.dot(&dir_f) > 0.0
                })
                .min_by_key(|a| a.length());
            if let Some(a) = aligned {
                return Some(*a);
            }
        }
        moves.choose(&mut self.rng).copied()
    }

    /// Whether re-entering with `arrow` would land ahead of `exit` in the race
    /// direction. Crossings on the other polygon never count as ahead.
    fn reenters_ahead(&self, exit: &CrossingIndex, arrow: &Arrow) -> bool {
        let Some(entry) = self.track.compute_crossing_index(&arrow.from, &arrow.to) else {
            return false;
        };
        if entry.polygon != exit.polygon {
            return false;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.track.poly_length(exit.polygon) as f64;
        let mut delta = entry.position - exit.position;
        if delta > n / 2.0 {
            delta -= n;
        } else if delta < -n / 2.0 {
            delta += n;
        }
        delta * f64::from(self.track.poly_direction(exit.polygon)) > 0.0
    }
}

fn to_f64(v: GridVector) -> Vector2 {
    Vector2::new(f64::from(v.x), f64::from(v.y))
}
