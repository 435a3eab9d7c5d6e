use crate::math::line_2d::orientation;
use crate::math::{Arrow, GridPoint, GridVector, Vector2, WorldPoint};

use super::{Polygon, Track, TrackIntersection};

/// Directions tried when sweeping for the start line: horizontal, vertical
/// and both diagonals.
const SWEEP_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// A start slot: a grid point plus the unit heading of the initial arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartPosition {
    pub position: GridPoint,
    pub direction: GridVector,
}

impl StartPosition {
    /// The arrow a player starting here is placed on.
    #[must_use]
    pub fn arrow(&self) -> Arrow {
        Arrow::from_point_and_dir(self.position, self.direction)
    }
}

/// The placed start line.
///
/// `p1` lies on one polygon and `p2` on the other; `forward` is the grid
/// direction perpendicular to the line that counts as racing forward.
#[derive(Debug, Clone, PartialEq)]
pub struct StartLine {
    pub p1: WorldPoint,
    pub p2: WorldPoint,
    /// Orientation of (inner hit, outer hit, touch point).
    pub orientation: i32,
    pub forward: GridVector,
    /// Sweep direction along the line.
    pub direction: GridVector,
    pub positions: Vec<StartPosition>,
}

#[derive(Debug, Clone, Copy)]
struct Sweep {
    direction: GridVector,
    back: TrackIntersection,
    front: TrackIntersection,
    steps: u32,
    distance: f64,
}

impl Track {
    /// Recomputes the start line from the floating vertex.
    ///
    /// The touch point snaps to the grid and must lie on track. From there a
    /// line is swept both ways along each of the four directions until it
    /// meets a boundary; directions whose two hits land on the same polygon
    /// are discarded and the shortest remaining one wins.
    pub(super) fn update_start_line(&mut self) {
        self.start_line = None;
        let touch = self.grid.world_to_grid(&self.floating);
        if !self.is_grid_point_on_track(&touch) {
            return;
        }

        let best = SWEEP_DIRECTIONS
            .iter()
            .filter_map(|&(dx, dy)| self.sweep(&touch, GridVector::new(dx, dy)))
            .fold(None::<Sweep>, |best, s| match best {
                Some(b) if b.distance <= s.distance => Some(b),
                _ => Some(s),
            });
        let Some(sweep) = best else {
            return;
        };

        let (outer, inner) = if sweep.back.polygon == Polygon::Outer {
            (sweep.back.point, sweep.front.point)
        } else {
            (sweep.front.point, sweep.back.point)
        };
        let line_orientation = orientation(&inner, &outer, &self.floating);
        if line_orientation == 0 {
            return;
        }

        let p1 = sweep.back.point;
        let normal = GridVector::new(-sweep.direction.y, sweep.direction.x);
        // Forward faces the touch point, the same point `line_orientation` was
        // taken against, so `poly_direction` stays consistent with it.
        let side = (self.floating - p1).dot(&Vector2::new(f64::from(normal.x), f64::from(normal.y)));
        let forward = if side > 0.0 { normal } else { -normal };

        let mut positions = Vec::new();
        let mut p = self.grid.world_to_grid(&p1);
        for _ in 0..sweep.steps {
            let slot = StartPosition {
                position: GridPoint::new(p.x, p.y),
                direction: forward,
            };
            if self.is_grid_point_on_track(&slot.position)
                && self
                    .intersect_line(&slot.position, &slot.position.offset(forward))
                    .is_none()
            {
                positions.push(slot);
            }
            p = p.offset(sweep.direction);
        }
        if positions.is_empty() {
            return;
        }

        tracing::debug!(
            x = touch.x,
            y = touch.y,
            positions = positions.len(),
            orientation = line_orientation,
            "start line placed"
        );
        self.start_line = Some(StartLine {
            p1,
            p2: sweep.front.point,
            orientation: line_orientation,
            forward,
            direction: sweep.direction,
            positions,
        });
    }

    /// Walks from `touch` in both senses of `dir` until the boundary is met.
    fn sweep(&self, touch: &GridPoint, dir: GridVector) -> Option<Sweep> {
        let (back_steps, back) = self.walk_until_hit(touch, -dir)?;
        let (front_steps, front) = self.walk_until_hit(touch, dir)?;
        if back.polygon == front.polygon {
            return None;
        }
        let steps = back_steps + front_steps;
        let mut distance = f64::from(steps);
        if dir.x != 0 && dir.y != 0 {
            distance *= std::f64::consts::SQRT_2;
        }
        Some(Sweep {
            direction: dir,
            back,
            front,
            steps,
            distance,
        })
    }

    fn walk_until_hit(&self, touch: &GridPoint, dir: GridVector) -> Option<(u32, TrackIntersection)> {
        let tl = self.area.top_left();
        let br = self.area.bottom_right();
        let limit = u32::try_from((br.x - tl.x) + (br.y - tl.y)).unwrap_or(0);
        let mut p = GridPoint::new(touch.x, touch.y);
        for step in 1..=limit {
            p = p.offset(dir);
            if let Some(hit) = self.intersect_line(touch, &p) {
                return Some((step, hit));
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::{ring_track, wp};
    use super::super::DesignStep;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn shortest_sweep_crosses_left_strip() {
        let track = ring_track();
        let sl = track.start_line().unwrap();
        assert_relative_eq!(sl.p1.x, 25.0, epsilon = 1e-9);
        assert_relative_eq!(sl.p1.y, 150.0, epsilon = 1e-9);
        assert_relative_eq!(sl.p2.x, 120.0, epsilon = 1e-9);
        assert_eq!(sl.direction, GridVector::new(1, 0));
        // Touch point sits below the line.
        assert_eq!(sl.forward, GridVector::new(0, 1));
        assert_eq!(sl.orientation, -1);
    }

    #[test]
    fn start_arrows_point_forward() {
        let track = ring_track();
        let first = track.start_positions()[0];
        assert_eq!(
            first.arrow(),
            Arrow::new(GridPoint::new(3, 15), GridPoint::new(3, 16))
        );
    }

    #[test]
    fn touch_above_line_flips_forward() {
        let mut track = ring_track();
        track.design_mode = true;
        track.step = DesignStep::StartLine;
        track.pointer_touch(true, 69.8, 149.7);
        let sl = track.start_line().unwrap();
        assert_eq!(sl.forward, GridVector::new(0, -1));
        assert_eq!(sl.orientation, 1);
    }

    #[test]
    fn touch_off_track_places_nothing() {
        let mut track = ring_track();
        track.design_mode = true;
        track.step = DesignStep::StartLine;
        track.pointer_touch(true, 200.0, 150.0);
        assert!(track.start_line().is_none());
        // Release without a line keeps the design step.
        track.pointer_touch(false, 200.0, 150.0);
        assert_eq!(track.design_step(), DesignStep::StartLine);
        assert!(!track.is_ready());
    }

    #[test]
    fn collinear_touch_is_rejected() {
        let mut track = ring_track();
        track.design_mode = true;
        track.step = DesignStep::StartLine;
        let touch = wp(70.0, 150.0);
        track.pointer_touch(true, touch.x, touch.y);
        assert!(track.start_line().is_none());
    }
}
