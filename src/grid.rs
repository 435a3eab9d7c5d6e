use crate::math::{GridPoint, ScreenPoint, Transform, WorldPoint};

/// Maps between grid, world and screen coordinates.
///
/// Grid points sit at integer multiples of `cell_size` in world space; the
/// screen mapping is controlled by a mutable [`Transform`].
#[derive(Debug, Clone)]
pub struct Grid {
    cell_size: f64,
    transform: Transform,
}

impl Grid {
    /// Creates a grid with the given world-space cell size and an identity transform.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            transform: Transform::default(),
        }
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    #[must_use]
    pub fn grid_to_world(&self, p: &GridPoint) -> WorldPoint {
        WorldPoint::new(
            f64::from(p.x) * self.cell_size,
            f64::from(p.y) * self.cell_size,
        )
    }

    /// Snaps a world point to the nearest grid point.
    ///
    /// The returned point's `distance` is the residual to the snapped location,
    /// relative to the cell size.
    #[must_use]
    pub fn world_to_grid(&self, wp: &WorldPoint) -> GridPoint {
        let (x, fx) = snap_axis(wp.x / self.cell_size);
        let (y, fy) = snap_axis(wp.y / self.cell_size);
        GridPoint::with_distance(x, y, fx.hypot(fy))
    }

    #[must_use]
    pub fn grid_to_screen(&self, p: &GridPoint) -> ScreenPoint {
        let sp = self.transform.world_to_screen(&self.grid_to_world(p));
        ScreenPoint::new(sp.x.floor(), sp.y.floor())
    }

    #[must_use]
    pub fn screen_to_grid(&self, p: &ScreenPoint) -> GridPoint {
        self.world_to_grid(&self.transform.screen_to_world(p))
    }
}

/// Rounds a grid-unit coordinate, returning the integer and the residual.
/// Exact halves round down.
#[allow(clippy::cast_possible_truncation)]
fn snap_axis(g: f64) -> (i32, f64) {
    let base = g.floor();
    let frac = g - base;
    if frac > 0.5 {
        (base as i32 + 1, 1.0 - frac)
    } else {
        (base as i32, frac)
    }
}
