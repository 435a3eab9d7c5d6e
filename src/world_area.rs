use crate::grid::Grid;
use crate::math::{GridPoint, WorldPoint};

/// The rectangular region the track must be drawn in.
///
/// Corners are given in grid units; containment is strict, so points lying on
/// the border are outside.
#[derive(Debug, Clone)]
pub struct WorldArea {
    top_left: GridPoint,
    bottom_right: GridPoint,
    world_min: WorldPoint,
    world_max: WorldPoint,
}

impl WorldArea {
    #[must_use]
    pub fn new(grid: &Grid, top_left: GridPoint, bottom_right: GridPoint) -> Self {
        Self {
            top_left,
            bottom_right,
            world_min: grid.grid_to_world(&top_left),
            world_max: grid.grid_to_world(&bottom_right),
        }
    }

    #[must_use]
    pub fn top_left(&self) -> GridPoint {
        self.top_left
    }

    #[must_use]
    pub fn bottom_right(&self) -> GridPoint {
        self.bottom_right
    }

    /// World-space top-left corner.
    #[must_use]
    pub fn world_min(&self) -> WorldPoint {
        self.world_min
    }

    /// World-space bottom-right corner.
    #[must_use]
    pub fn world_max(&self) -> WorldPoint {
        self.world_max
    }

    #[must_use]
    pub fn contains_point(&self, wp: &WorldPoint) -> bool {
        wp.x > self.world_min.x
            && wp.y > self.world_min.y
            && wp.x < self.world_max.x
            && wp.y < self.world_max.y
    }
}
