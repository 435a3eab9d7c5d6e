use std::hash::{Hash, Hasher};

use super::{GridVector, WorldPoint};

/// Screen/world mapping: `screen = (world + translation) * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Screen to world unit ratio.
    pub scale: f64,
    /// World-space offset along X.
    pub trans_x: f64,
    /// World-space offset along Y.
    pub trans_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            trans_x: 0.0,
            trans_y: 0.0,
        }
    }
}

impl Transform {
    /// Creates a transform from scale and world-space offset.
    #[must_use]
    pub fn new(scale: f64, trans_x: f64, trans_y: f64) -> Self {
        Self {
            scale,
            trans_x,
            trans_y,
        }
    }

    /// Maps a world point onto the screen.
    #[must_use]
    pub fn world_to_screen(&self, p: &WorldPoint) -> ScreenPoint {
        ScreenPoint::new(
            (p.x + self.trans_x) * self.scale,
            (p.y + self.trans_y) * self.scale,
        )
    }

    /// Maps a screen point back into world space.
    #[must_use]
    pub fn screen_to_world(&self, p: &ScreenPoint) -> WorldPoint {
        WorldPoint::new(p.x / self.scale - self.trans_x, p.y / self.scale - self.trans_y)
    }
}

/// A point in screen (pixel) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An integer grid location.
///
/// `distance` is the snap residual left over when a world point was rounded
/// onto this grid point, relative to the cell size, in `[0, sqrt(2)/2]`.
/// It does not take part in equality or hashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
    pub distance: f64,
}

impl GridPoint {
    /// Creates a grid point with zero snap residual.
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            distance: 0.0,
        }
    }

    /// Creates a grid point carrying a snap residual.
    #[must_use]
    pub fn with_distance(x: i32, y: i32, distance: f64) -> Self {
        Self { x, y, distance }
    }

    /// Returns this point displaced by `dir`.
    #[must_use]
    pub fn offset(&self, dir: GridVector) -> Self {
        Self::new(self.x + dir.x, self.y + dir.y)
    }

    /// Returns the displacement from `self` to `other`.
    #[must_use]
    pub fn vector_to(&self, other: &GridPoint) -> GridVector {
        GridVector::new(other.x - self.x, other.y - self.y)
    }
}

impl PartialEq for GridPoint {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for GridPoint {}

impl Hash for GridPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

/// A directed move between two grid points: one player's action for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arrow {
    pub from: GridPoint,
    pub to: GridPoint,
}

impl Arrow {
    #[must_use]
    pub fn new(from: GridPoint, to: GridPoint) -> Self {
        Self { from, to }
    }

    /// Builds the arrow starting at `p` and displaced by `dir`.
    #[must_use]
    pub fn from_point_and_dir(p: GridPoint, dir: GridVector) -> Self {
        Self::new(p, p.offset(dir))
    }

    /// Delta vector from `from` to `to`.
    #[must_use]
    pub fn direction(&self) -> GridVector {
        self.from.vector_to(&self.to)
    }

    /// Chebyshev length of the move.
    #[must_use]
    pub fn length(&self) -> i32 {
        let d = self.direction();
        d.x.abs().max(d.y.abs())
    }

    /// Returns `true` for a zero-length arrow.
    #[must_use]
    pub fn is_stationary(&self) -> bool {
        self.from == self.to
    }
}
