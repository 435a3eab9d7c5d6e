mod builder;
pub mod partition;
mod query;
mod start_line;

pub use partition::TrackPartition;
pub use query::{CrossingIndex, TrackIntersection};
pub use start_line::{StartLine, StartPosition};

use crate::config::TrackConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::math::line_2d::{clockwiseness, orientation};
use crate::math::{GridPoint, WorldPoint, TOLERANCE};
use crate::world_area::WorldArea;

/// One of the two closed boundaries of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Polygon {
    /// Outer boundary.
    Outer,
    /// Inner boundary (the hole).
    Inner,
}

impl Polygon {
    /// Array index of this polygon: 0 for outer, 1 for inner.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Outer => 0,
            Self::Inner => 1,
        }
    }
}

/// Stable handle to a track vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexRef {
    pub polygon: Polygon,
    pub vertex: usize,
}

impl VertexRef {
    #[must_use]
    pub fn new(polygon: Polygon, vertex: usize) -> Self {
        Self { polygon, vertex }
    }
}

/// Interactive track design progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignStep {
    /// Vertices are being laid for the given polygon.
    Draw(Polygon),
    /// Both polygons are closed; waiting for a start-line touch.
    StartLine,
    /// Frozen and playable.
    Ready,
}

#[derive(Debug, Clone, Default)]
struct PolygonData {
    vertices: Vec<WorldPoint>,
    /// Winding sign cached on close.
    orientation: i32,
    closed: bool,
}

/// A racing track: an outer and an inner closed polygon plus a start line.
///
/// The track is drawn vertex by vertex through [`Track::pointer_moved`] and
/// [`Track::pointer_touch`] while in design mode, then frozen once a start
/// line has been placed. Every geometry query goes through the
/// [`TrackPartition`] so only a local neighbourhood of edges is visited.
#[derive(Debug, Clone)]
pub struct Track {
    grid: Grid,
    area: WorldArea,
    resolution: f64,
    partition: TrackPartition,
    design_mode: bool,
    pointer_pressed: bool,
    step: DesignStep,
    floating: WorldPoint,
    polys: [PolygonData; 2],
    start_line: Option<StartLine>,
}

impl Track {
    /// Creates an empty track.
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` does not validate.
    pub fn new(config: &TrackConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.cell_size);
        let a = config.area;
        let area = WorldArea::new(
            &grid,
            GridPoint::new(a.left, a.top),
            GridPoint::new(a.right, a.bottom),
        );
        let partition = TrackPartition::new(&area, config.cell_size, config.partition_cell_span);
        Ok(Self {
            grid,
            area,
            resolution: config.resolution,
            partition,
            design_mode: false,
            pointer_pressed: false,
            step: DesignStep::Draw(Polygon::Outer),
            floating: WorldPoint::origin(),
            polys: [PolygonData::default(), PolygonData::default()],
            start_line: None,
        })
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access, for updating the screen transform.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[must_use]
    pub fn world_area(&self) -> &WorldArea {
        &self.area
    }

    /// Clears both polygons, the partition and the start line.
    pub fn reset(&mut self) {
        self.polys = [PolygonData::default(), PolygonData::default()];
        self.partition.clear();
        self.start_line = None;
        self.pointer_pressed = false;
        self.step = DesignStep::Draw(Polygon::Outer);
    }

    /// Enabling starts a fresh design from the outer polygon; disabling stops
    /// accepting pointer input.
    pub fn enable_design_mode(&mut self, enable: bool) {
        if enable {
            self.reset();
        }
        self.design_mode = enable;
    }

    #[must_use]
    pub fn is_in_design_mode(&self) -> bool {
        self.design_mode
    }

    #[must_use]
    pub fn design_step(&self) -> DesignStep {
        self.step
    }

    /// Last pointer location, possibly snapped onto the first vertex.
    #[must_use]
    pub fn floating_vertex(&self) -> WorldPoint {
        self.floating
    }

    /// The polygon currently being drawn, if any.
    #[must_use]
    pub fn current_polygon(&self) -> Option<Polygon> {
        match self.step {
            DesignStep::Draw(p) => Some(p),
            DesignStep::StartLine | DesignStep::Ready => None,
        }
    }

    /// `true` once the track is frozen and has a start line.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.step == DesignStep::Ready && !self.design_mode && self.start_line.is_some()
    }

    /// The placed start line, if any.
    #[must_use]
    pub fn start_line(&self) -> Option<&StartLine> {
        self.start_line.as_ref()
    }

    /// Starting slots; empty until the track is ready.
    #[must_use]
    pub fn start_positions(&self) -> &[StartPosition] {
        match &self.start_line {
            Some(sl) if self.is_ready() => &sl.positions,
            _ => &[],
        }
    }

    /// Number of vertices in `polygon`.
    #[must_use]
    pub fn poly_length(&self, polygon: Polygon) -> usize {
        self.polys[polygon.index()].vertices.len()
    }

    #[must_use]
    pub fn poly_vertex(&self, polygon: Polygon, index: usize) -> Option<WorldPoint> {
        self.polys[polygon.index()].vertices.get(index).copied()
    }

    #[must_use]
    pub fn poly_vertices(&self, polygon: Polygon) -> &[WorldPoint] {
        &self.polys[polygon.index()].vertices
    }

    /// Cached winding sign; 0 until the polygon is closed.
    #[must_use]
    pub fn poly_orientation(&self, polygon: Polygon) -> i32 {
        self.polys[polygon.index()].orientation
    }

    #[must_use]
    pub fn is_closed(&self, polygon: Polygon) -> bool {
        self.polys[polygon.index()].closed
    }

    /// Pointer motion in world space.
    ///
    /// While the pointer is held in a draw step, a vertex is committed each
    /// time the pointer travels `cell_size / resolution` from the last one.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if !self.design_mode {
            return;
        }
        self.floating = WorldPoint::new(x, y);
        match self.step {
            DesignStep::Draw(polygon) => {
                let last = self.polys[polygon.index()].vertices.last().copied();
                match last {
                    Some(last) if self.pointer_pressed && self.validate_vertex(polygon, false) => {
                        let min_dist = self.grid.cell_size() / self.resolution;
                        if nalgebra::distance(&self.floating, &last) >= min_dist {
                            self.push_vertex(polygon);
                        }
                    }
                    _ => {
                        self.check_close_snap(polygon);
                    }
                }
            }
            DesignStep::StartLine => self.update_start_line(),
            DesignStep::Ready => {}
        }
    }

    /// Pointer press (`on == true`) or release in world space.
    pub fn pointer_touch(&mut self, on: bool, x: f64, y: f64) {
        if !self.design_mode {
            return;
        }
        self.pointer_pressed = on;
        self.floating = WorldPoint::new(x, y);
        match self.step {
            DesignStep::Draw(polygon) => {
                if !on {
                    return;
                }
                let closing = self.check_close_snap(polygon);
                if !self.validate_vertex(polygon, closing) {
                    tracing::trace!(polygon = polygon.index(), x, y, "design vertex rejected");
                    return;
                }
                if closing {
                    self.close_polygon(polygon);
                } else {
                    self.push_vertex(polygon);
                }
            }
            DesignStep::StartLine => {
                if on {
                    self.update_start_line();
                } else if self.start_line.is_some() {
                    self.design_mode = false;
                    self.step = DesignStep::Ready;
                    tracing::info!(
                        start_positions = self.start_positions().len(),
                        "track ready"
                    );
                }
            }
            DesignStep::Ready => {}
        }
    }

    /// Snaps the floating vertex onto the first vertex when it comes within one
    /// grid cell of it and the polygon has at least three vertices.
    fn check_close_snap(&mut self, polygon: Polygon) -> bool {
        let verts = &self.polys[polygon.index()].vertices;
        if verts.len() >= 3 && nalgebra::distance(&self.floating, &verts[0]) < self.grid.cell_size() {
            self.floating = verts[0];
            return true;
        }
        false
    }

    /// Checks the floating vertex can extend `polygon`: it must be inside the
    /// world area, the new edge must not touch earlier edges (apart from the
    /// connected last edge and, when closing, the first edge), and the first
    /// inner vertex must lie inside the outer polygon.
    fn validate_vertex(&self, polygon: Polygon, closing: bool) -> bool {
        if !self.area.contains_point(&self.floating) {
            return false;
        }
        let verts = &self.polys[polygon.index()].vertices;
        if let Some(last) = verts.last() {
            if nalgebra::distance(last, &self.floating) < TOLERANCE {
                return false;
            }
            let len = verts.len();
            if len >= 2 {
                let prev = verts[len - 2];
                let folds_back = orientation(&prev, last, &self.floating) == 0
                    && (*last - prev).dot(&(self.floating - *last)) < 0.0;
                if folds_back {
                    return false;
                }
            }
            let connected = |v: VertexRef| {
                v.polygon == polygon && (v.vertex + 2 == len || (closing && v.vertex == 0))
            };
            if self.first_hit(last, &self.floating, connected).is_some() {
                return false;
            }
        }
        if polygon == Polygon::Inner
            && verts.is_empty()
            && !self.point_inside_polygon(&self.floating, Polygon::Outer)
        {
            return false;
        }
        true
    }

    fn push_vertex(&mut self, polygon: Polygon) {
        let idx = self.polys[polygon.index()].vertices.len();
        let id = VertexRef::new(polygon, idx);
        self.partition.add_vertex(id, &self.floating);
        if let Some(last) = self.polys[polygon.index()].vertices.last().copied() {
            self.partition
                .add_segment(VertexRef::new(polygon, idx - 1), id, &last, &self.floating);
        }
        self.polys[polygon.index()].vertices.push(self.floating);
    }

    fn close_polygon(&mut self, polygon: Polygon) {
        let data = &mut self.polys[polygon.index()];
        let (Some(&first), Some(&last)) = (data.vertices.first(), data.vertices.last()) else {
            return;
        };
        let last_idx = data.vertices.len() - 1;
        data.closed = true;
        data.orientation = if clockwiseness(&data.vertices) > 0 { 1 } else { -1 };
        let orientation = data.orientation;
        self.partition.add_segment(
            VertexRef::new(polygon, last_idx),
            VertexRef::new(polygon, 0),
            &last,
            &first,
        );
        self.step = match polygon {
            Polygon::Outer => DesignStep::Draw(Polygon::Inner),
            Polygon::Inner => DesignStep::StartLine,
        };
        tracing::debug!(
            polygon = polygon.index(),
            vertices = last_idx + 1,
            orientation,
            "polygon closed"
        );
    }

    /// Edge leaving vertex `v`, wrapping to vertex 0 on a closed polygon.
    fn edge(&self, v: VertexRef) -> Option<(WorldPoint, WorldPoint)> {
        let data = &self.polys[v.polygon.index()];
        let n = data.vertices.len();
        let next = if v.vertex + 1 < n {
            v.vertex + 1
        } else if data.closed && n > 2 {
            0
        } else {
            return None;
        };
        Some((*data.vertices.get(v.vertex)?, data.vertices[next]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::config::AreaBounds;

    /// 10 world units per cell, 40x30 cell area.
    pub(crate) fn config() -> TrackConfig {
        TrackConfig {
            cell_size: 10.0,
            resolution: 2.0,
            area: AreaBounds {
                left: 0,
                top: 0,
                right: 40,
                bottom: 30,
            },
            partition_cell_span: 5,
        }
    }

    pub(crate) fn wp(x: f64, y: f64) -> WorldPoint {
        WorldPoint::new(x, y)
    }

    /// Outer rectangle with its left edge off the grid (x = 25), inner
    /// rectangle on grid lines, start line across the left strip.
    pub(crate) fn ring_track() -> Track {
        let outer = [wp(25.0, 20.0), wp(380.0, 20.0), wp(380.0, 280.0), wp(25.0, 280.0)];
        let inner = [wp(120.0, 100.0), wp(280.0, 100.0), wp(280.0, 200.0), wp(120.0, 200.0)];
        Track::from_outline(&config(), &outer, &inner, wp(70.3, 150.2)).unwrap()
    }

    fn tap(track: &mut Track, x: f64, y: f64) {
        track.pointer_touch(true, x, y);
        track.pointer_touch(false, x, y);
    }

    #[test]
    fn design_walks_through_steps() {
        let mut track = Track::new(&config()).unwrap();
        track.enable_design_mode(true);
        assert_eq!(track.design_step(), DesignStep::Draw(Polygon::Outer));
        for (x, y) in [(25.0, 20.0), (380.0, 20.0), (380.0, 280.0), (25.0, 280.0)] {
            tap(&mut track, x, y);
        }
        assert_eq!(track.poly_length(Polygon::Outer), 4);
        assert!(!track.is_closed(Polygon::Outer));
        // Within a cell of the first vertex: snaps and closes.
        tap(&mut track, 28.0, 23.0);
        assert!(track.is_closed(Polygon::Outer));
        assert_eq!(track.poly_length(Polygon::Outer), 4);
        assert_eq!(track.poly_orientation(Polygon::Outer), 1);
        assert_eq!(track.design_step(), DesignStep::Draw(Polygon::Inner));
        assert_eq!(track.current_polygon(), Some(Polygon::Inner));
    }

    #[test]
    fn rejects_vertex_outside_world_area() {
        let mut track = Track::new(&config()).unwrap();
        track.enable_design_mode(true);
        tap(&mut track, -5.0, 20.0);
        assert_eq!(track.poly_length(Polygon::Outer), 0);
        tap(&mut track, 400.0, 20.0);
        assert_eq!(track.poly_length(Polygon::Outer), 0);
    }

    #[test]
    fn rejects_self_intersecting_edge() {
        let mut track = Track::new(&config()).unwrap();
        track.enable_design_mode(true);
        for (x, y) in [(50.0, 50.0), (250.0, 50.0), (250.0, 250.0)] {
            tap(&mut track, x, y);
        }
        // Crosses the first edge.
        tap(&mut track, 150.0, 10.0);
        assert_eq!(track.poly_length(Polygon::Outer), 3);
        // A non-crossing vertex is accepted.
        tap(&mut track, 50.0, 250.0);
        assert_eq!(track.poly_length(Polygon::Outer), 4);
    }

    #[test]
    fn inner_polygon_must_start_inside_outer() {
        let mut track = Track::new(&config()).unwrap();
        track.enable_design_mode(true);
        for (x, y) in [(50.0, 50.0), (250.0, 50.0), (250.0, 250.0), (50.0, 250.0), (50.0, 50.0)] {
            tap(&mut track, x, y);
        }
        assert_eq!(track.current_polygon(), Some(Polygon::Inner));
        tap(&mut track, 300.0, 150.0);
        assert_eq!(track.poly_length(Polygon::Inner), 0);
        tap(&mut track, 100.0, 100.0);
        assert_eq!(track.poly_length(Polygon::Inner), 1);
        // An inner edge may not cross the outer boundary.
        tap(&mut track, 300.0, 100.0);
        assert_eq!(track.poly_length(Polygon::Inner), 1);
    }

    #[test]
    fn live_drag_commits_at_minimum_spacing() {
        let mut track = Track::new(&config()).unwrap();
        track.enable_design_mode(true);
        track.pointer_touch(true, 50.0, 50.0);
        // min spacing = 10 / 2 = 5 world units
        track.pointer_moved(53.0, 50.0);
        assert_eq!(track.poly_length(Polygon::Outer), 1);
        track.pointer_moved(56.0, 50.0);
        assert_eq!(track.poly_length(Polygon::Outer), 2);
        track.pointer_touch(false, 56.0, 50.0);
        track.pointer_moved(80.0, 50.0);
        assert_eq!(track.poly_length(Polygon::Outer), 2);
    }

    #[test]
    fn pointer_ignored_outside_design_mode() {
        let mut track = Track::new(&config()).unwrap();
        tap(&mut track, 50.0, 50.0);
        assert_eq!(track.poly_length(Polygon::Outer), 0);
    }

    #[test]
    fn ring_track_is_ready_with_start_positions() {
        let track = ring_track();
        assert!(track.is_ready());
        assert!(!track.is_in_design_mode());
        let positions = track.start_positions();
        assert_eq!(positions.len(), 9);
        assert_eq!(positions[0].position, GridPoint::new(3, 15));
        assert_eq!(positions[8].position, GridPoint::new(11, 15));
        assert!(positions.iter().all(|p| p.direction == crate::math::GridVector::new(0, 1)));
    }

    #[test]
    fn reset_clears_everything() {
        let mut track = ring_track();
        track.reset();
        assert!(!track.is_ready());
        assert_eq!(track.poly_length(Polygon::Outer), 0);
        assert!(track.start_line().is_none());
        assert!(track.start_positions().is_empty());
    }
}
