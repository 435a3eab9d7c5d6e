use serde::{Deserialize, Serialize};

use crate::math::{Arrow, GridPoint};
use crate::track::CrossingIndex;

slotmap::new_key_type! {
    /// Unique identifier for a player in a game.
    pub struct PlayerId;
}

/// Who drives a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerType {
    Human,
    Ai,
    Network,
}

/// Per-turn state of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnType {
    Inactive,
    /// Choosing a start position.
    SelectStart,
    /// Choosing a move.
    Move,
    /// Won or disqualified; skipped for the rest of the race.
    Finished,
}

/// Off-track bookkeeping: whether the player is off track and where they left it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OffTrackData {
    pub off_track: bool,
    /// Boundary crossing recorded when the player left the track.
    pub crossing: Option<CrossingIndex>,
}

/// A participant's turn-level state.
///
/// The game activates a turn, hands over the allowed moves, and reads back the
/// selected point once the player confirms it.
#[derive(Debug, Clone)]
pub struct Player {
    kind: PlayerType,
    color: usize,
    turn: TurnType,
    has_action: bool,
    selected: Option<GridPoint>,
    allowed: Vec<Arrow>,
    last_arrow: Option<Arrow>,
    off_track: OffTrackData,
}

impl Player {
    #[must_use]
    pub fn new(kind: PlayerType) -> Self {
        Self {
            kind,
            color: 0,
            turn: TurnType::Inactive,
            has_action: false,
            selected: None,
            allowed: Vec::new(),
            last_arrow: None,
            off_track: OffTrackData::default(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PlayerType {
        self.kind
    }

    /// Palette index assigned on joining.
    #[must_use]
    pub fn color(&self) -> usize {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: usize) {
        self.color = color;
    }

    #[must_use]
    pub fn turn(&self) -> TurnType {
        self.turn
    }

    /// Starts a turn of the given kind and clears any previous selection.
    pub fn activate_turn(&mut self, turn: TurnType) {
        self.turn = turn;
        self.has_action = false;
        self.selected = None;
    }

    /// Ends the current turn. A finished player stays finished.
    pub fn end_turn(&mut self) {
        if self.turn != TurnType::Finished {
            self.turn = TurnType::Inactive;
        }
    }

    #[must_use]
    pub fn is_turn_active(&self) -> bool {
        matches!(self.turn, TurnType::SelectStart | TurnType::Move)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.turn == TurnType::Finished
    }

    /// Replaces the allowed-move set for this turn.
    pub fn set_allowed_vectors(&mut self, moves: Vec<Arrow>) {
        self.allowed = moves;
    }

    #[must_use]
    pub fn valid_moves(&self) -> &[Arrow] {
        &self.allowed
    }

    /// Marks a point as the intended move target; may be changed until confirmed.
    pub fn select_next_point(&mut self, p: GridPoint) {
        if self.is_turn_active() && !self.has_action {
            self.selected = Some(p);
        }
    }

    /// Locks in the selected point. No-op without an active turn, a
    /// selection, or when already confirmed.
    pub fn confirm_next_point(&mut self) {
        if self.is_turn_active() && !self.has_action && self.selected.is_some() {
            self.has_action = true;
        }
    }

    /// `true` once a selection has been confirmed this turn.
    #[must_use]
    pub fn action_ready(&self) -> bool {
        self.has_action
    }

    /// The selected target, confirmed or not.
    #[must_use]
    pub fn action_point(&self) -> Option<GridPoint> {
        self.selected
    }

    #[must_use]
    pub fn last_arrow(&self) -> Option<Arrow> {
        self.last_arrow
    }

    pub(crate) fn set_last_arrow(&mut self, arrow: Arrow) {
        self.last_arrow = Some(arrow);
    }

    #[must_use]
    pub fn off_track(&self) -> &OffTrackData {
        &self.off_track
    }

    pub(crate) fn off_track_mut(&mut self) -> &mut OffTrackData {
        &mut self.off_track
    }

    /// Clears race progress so the player can join a new race.
    pub(crate) fn reset_race(&mut self) {
        self.turn = TurnType::Inactive;
        self.has_action = false;
        self.selected = None;
        self.allowed.clear();
        self.last_arrow = None;
        self.off_track = OffTrackData::default();
    }
}
