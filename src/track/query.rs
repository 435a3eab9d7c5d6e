use crate::math::line_2d::{
    intersection_point, on_segment, orientation, segment_intersect, segment_intersect_line,
    Intersection,
};
use crate::math::{Aabb2, GridPoint, Vector2, WorldPoint};

use super::{Polygon, Track, VertexRef};

/// First boundary contact along a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackIntersection {
    pub point: WorldPoint,
    pub polygon: Polygon,
}

/// Fractional position along a polygon's vertex sequence.
///
/// `position` is the index of the crossed edge's start vertex plus the
/// fraction of that edge travelled before the crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingIndex {
    pub polygon: Polygon,
    pub position: f64,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct EdgeHit {
    pub(super) edge: VertexRef,
    pub(super) point: WorldPoint,
}

/// Whether a ray or move crossing an edge counts toward a crossing total.
///
/// Touching an edge's start vertex counts only for upward edges and touching
/// its end vertex only for downward ones, so a crossing through a shared
/// vertex is counted once.
fn counts_as_crossing(res: Intersection, v1: &WorldPoint, v2: &WorldPoint) -> bool {
    match res {
        Intersection::Middle => true,
        Intersection::Endpoint1 => v2.y > v1.y,
        Intersection::Endpoint2 => v2.y < v1.y,
        _ => false,
    }
}

impl Track {
    /// Winding-number containment test against one closed polygon.
    ///
    /// A horizontal ray is cast from just left of the world area to `p`. Points
    /// on the boundary, outside the world area, or tested against an
    /// unfinished polygon are reported as outside.
    #[must_use]
    pub fn point_inside_polygon(&self, p: &WorldPoint, polygon: Polygon) -> bool {
        let data = &self.polys[polygon.index()];
        if !data.closed || data.vertices.len() < 3 || !self.area.contains_point(p) {
            return false;
        }
        let start = WorldPoint::new(self.area.world_min().x - 1.0, p.y);
        let query = Aabb2::from_corners(&start, p).expanded(1.0);
        let mut wn = 0;
        for v in self.partition.polygon_vertices_in_area(polygon, &query) {
            let Some((v1, v2)) = self.edge(v) else {
                continue;
            };
            if on_segment(&v1, p, &v2) {
                return false;
            }
            if v1.x >= p.x && v2.x >= p.x {
                continue;
            }
            if !counts_as_crossing(segment_intersect(&v1, &v2, &start, p), &v1, &v2) {
                continue;
            }
            wn += if orientation(&v1, &v2, p) == data.orientation {
                1
            } else {
                -1
            };
        }
        wn != 0
    }

    /// `true` when the world point lies strictly between the two polygons.
    #[must_use]
    pub fn is_world_point_on_track(&self, wp: &WorldPoint) -> bool {
        self.point_inside_polygon(wp, Polygon::Outer) && !self.point_inside_polygon(wp, Polygon::Inner)
    }

    #[must_use]
    pub fn is_grid_point_on_track(&self, p: &GridPoint) -> bool {
        self.is_world_point_on_track(&self.grid.grid_to_world(p))
    }

    /// Number of boundary edges the move `p1 -> p2` crosses.
    #[must_use]
    pub fn intersections_count(&self, p1: &GridPoint, p2: &GridPoint) -> usize {
        let wp1 = self.grid.grid_to_world(p1);
        let wp2 = self.grid.grid_to_world(p2);
        self.partition
            .vertices_in_area(&Aabb2::from_corners(&wp1, &wp2))
            .into_iter()
            .filter_map(|v| self.edge(v))
            .filter(|(v1, v2)| counts_as_crossing(segment_intersect(v1, v2, &wp1, &wp2), v1, v2))
            .count()
    }

    /// First boundary contact on the grid segment `p1 -> p2`.
    #[must_use]
    pub fn intersect_line(&self, p1: &GridPoint, p2: &GridPoint) -> Option<TrackIntersection> {
        let wp1 = self.grid.grid_to_world(p1);
        let wp2 = self.grid.grid_to_world(p2);
        self.intersect_line_w(&wp1, &wp2, false)
    }

    /// First boundary contact on the world segment `p1 -> p2`.
    ///
    /// With `skip_last_segment`, the edge most recently laid on the polygon
    /// being drawn is ignored.
    #[must_use]
    pub fn intersect_line_w(
        &self,
        p1: &WorldPoint,
        p2: &WorldPoint,
        skip_last_segment: bool,
    ) -> Option<TrackIntersection> {
        let last_edge = self
            .current_polygon()
            .filter(|_| skip_last_segment)
            .and_then(|poly| {
                let len = self.poly_length(poly);
                (len >= 2).then(|| VertexRef::new(poly, len - 2))
            });
        self.first_hit(p1, p2, |v| Some(v) == last_edge)
            .map(|hit| TrackIntersection {
                point: hit.point,
                polygon: hit.edge.polygon,
            })
    }

    /// Locates where the move `p1 -> p2` first crosses the boundary.
    #[must_use]
    pub fn compute_crossing_index(&self, p1: &GridPoint, p2: &GridPoint) -> Option<CrossingIndex> {
        let wp1 = self.grid.grid_to_world(p1);
        let wp2 = self.grid.grid_to_world(p2);
        let hit = self.first_hit(&wp1, &wp2, |_| false)?;
        let (a, b) = self.edge(hit.edge)?;
        let len = nalgebra::distance(&a, &b);
        #[allow(clippy::cast_precision_loss)]
        let base = hit.edge.vertex as f64;
        Some(CrossingIndex {
            polygon: hit.edge.polygon,
            position: base + nalgebra::distance(&a, &hit.point) / len,
        })
    }

    /// Whether travelling along `polygon` in increasing vertex order matches
    /// the race direction: `+1` if so, `-1` if reversed, `0` with no start line.
    #[must_use]
    pub fn poly_direction(&self, polygon: Polygon) -> i32 {
        match &self.start_line {
            Some(sl) if self.polys[polygon.index()].orientation == sl.orientation => 1,
            Some(_) => -1,
            None => 0,
        }
    }

    /// Signed crossing of the start line by the move `from -> to`.
    ///
    /// `+1` crosses in the race direction, `-1` against it, `0` when the move
    /// misses the line, runs along it, or merely starts on it. With `extended`
    /// the start line is treated as an infinite line.
    #[must_use]
    pub fn check_start_line_cross(&self, from: &GridPoint, to: &GridPoint, extended: bool) -> i32 {
        self.start_line_crossing(from, to, extended)
            .map_or(0, |(sign, _)| sign)
    }

    /// Like [`Track::check_start_line_cross`], also returning the crossing point.
    #[must_use]
    pub fn start_line_crossing(
        &self,
        from: &GridPoint,
        to: &GridPoint,
        extended: bool,
    ) -> Option<(i32, WorldPoint)> {
        let sl = self.start_line.as_ref()?;
        let fw = self.grid.grid_to_world(from);
        let tw = self.grid.grid_to_world(to);
        let res = if extended {
            segment_intersect_line(&fw, &tw, &sl.p1, &sl.p2)
        } else {
            segment_intersect(&fw, &tw, &sl.p1, &sl.p2)
        };
        if matches!(
            res,
            Intersection::None | Intersection::Overlap | Intersection::Endpoint1
        ) {
            return None;
        }
        let forward = Vector2::new(f64::from(sl.forward.x), f64::from(sl.forward.y));
        let sign = if (tw - fw).dot(&forward) > 0.0 { 1 } else { -1 };
        let point = intersection_point(&fw, &tw, &sl.p1, &sl.p2, extended).unwrap_or(tw);
        Some((sign, point))
    }

    /// Boundary edge contact on `p1 -> p2` closest to `p1`, ignoring edges
    /// for which `skip` returns `true`.
    pub(super) fn first_hit(
        &self,
        p1: &WorldPoint,
        p2: &WorldPoint,
        skip: impl Fn(VertexRef) -> bool,
    ) -> Option<EdgeHit> {
        let mut best: Option<(f64, EdgeHit)> = None;
        for v in self.partition.vertices_in_area(&Aabb2::from_corners(p1, p2)) {
            if skip(v) {
                continue;
            }
            let Some((a, b)) = self.edge(v) else {
                continue;
            };
            if !segment_intersect(p1, p2, &a, &b).exists() {
                continue;
            }
            let point = intersection_point(p1, p2, &a, &b, false).unwrap_or_else(|| {
                if nalgebra::distance(p1, &a) <= nalgebra::distance(p1, &b) {
                    a
                } else {
                    b
                }
            });
            let d = nalgebra::distance(p1, &point);
            if best.as_ref().map_or(true, |(bd, _)| d < *bd) {
                best = Some((d, EdgeHit { edge: v, point }));
            }
        }
        best.map(|(_, hit)| hit)
    }
}
