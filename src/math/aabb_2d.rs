use super::WorldPoint;

/// An axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum (top-left) corner.
    pub min: WorldPoint,
    /// Maximum (bottom-right) corner.
    pub max: WorldPoint,
}

impl Aabb2 {
    /// Smallest rectangle containing both points.
    #[must_use]
    pub fn from_corners(a: &WorldPoint, b: &WorldPoint) -> Self {
        Self {
            min: WorldPoint::new(a.x.min(b.x), a.y.min(b.y)),
            max: WorldPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Returns a copy grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: WorldPoint::new(self.min.x - margin, self.min.y - margin),
            max: WorldPoint::new(self.max.x + margin, self.max.y + margin),
        }
    }
}
