use crate::config::TrackConfig;
use crate::error::{Result, TrackError};
use crate::math::WorldPoint;

use super::{Polygon, Track};

impl Track {
    /// Builds a ready track by replaying design input.
    ///
    /// Each outline is tapped vertex by vertex and closed by tapping its first
    /// vertex again, then `start_touch` places the start line. Every vertex goes
    /// through the same validation as interactive drawing.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::VertexRejected`] for a vertex that fails
    /// validation, [`TrackError::PolygonNotClosed`] when an outline cannot be
    /// closed, and [`TrackError::NoStartLine`] when no start line fits through
    /// `start_touch`.
    pub fn from_outline(
        config: &TrackConfig,
        outer: &[WorldPoint],
        inner: &[WorldPoint],
        start_touch: WorldPoint,
    ) -> Result<Self> {
        let mut track = Self::new(config)?;
        track.enable_design_mode(true);
        for (polygon, outline) in [(Polygon::Outer, outer), (Polygon::Inner, inner)] {
            for p in outline {
                let before = track.poly_length(polygon);
                track.tap(p);
                if track.poly_length(polygon) != before + 1 || track.is_closed(polygon) {
                    return Err(TrackError::VertexRejected {
                        polygon: polygon.index(),
                        x: p.x,
                        y: p.y,
                    }
                    .into());
                }
            }
            if let Some(first) = outline.first() {
                track.tap(first);
            }
            if !track.is_closed(polygon) {
                return Err(TrackError::PolygonNotClosed(polygon.index()).into());
            }
        }
        track.tap(&start_touch);
        if !track.is_ready() {
            return Err(TrackError::NoStartLine {
                x: start_touch.x,
                y: start_touch.y,
            }
            .into());
        }
        Ok(track)
    }

    fn tap(&mut self, p: &WorldPoint) {
        self.pointer_touch(true, p.x, p.y);
        self.pointer_touch(false, p.x, p.y);
    }
}
