use std::collections::BTreeSet;

use crate::math::line_2d::orientation;
use crate::math::{Aabb2, WorldPoint};
use crate::world_area::WorldArea;

use super::{Polygon, VertexRef};

/// Uniform-grid spatial index over polygon vertices and edges.
///
/// Each cell holds the ids of the vertices whose incident edges overlap it, so
/// geometry queries only visit a local neighbourhood. Ids are stable
/// `(polygon, vertex)` handles; vertices are append-only, so a handle is never
/// invalidated short of [`TrackPartition::clear`].
#[derive(Debug, Clone)]
pub struct TrackPartition {
    cells: Vec<BTreeSet<VertexRef>>,
    rows: usize,
    cols: usize,
    /// Partition cell edge, in grid cells.
    span: f64,
    /// Grid cell edge, in world units.
    cell_size: f64,
    /// Grid-unit origin of the partition.
    left: f64,
    top: f64,
}

impl TrackPartition {
    /// Creates an empty partition covering `area` with cells `span` grid cells wide.
    #[must_use]
    pub fn new(area: &WorldArea, cell_size: f64, span: u32) -> Self {
        let tl = area.top_left();
        let br = area.bottom_right();
        let span_i = i32::try_from(span.max(1)).unwrap_or(i32::MAX);
        let rows = usize::try_from((br.y - tl.y) / span_i).unwrap_or(0) + 1;
        let cols = usize::try_from((br.x - tl.x) / span_i).unwrap_or(0) + 1;
        Self {
            cells: vec![BTreeSet::new(); rows * cols],
            rows,
            cols,
            span: f64::from(span.max(1)),
            cell_size,
            left: f64::from(tl.x),
            top: f64::from(tl.y),
        }
    }

    /// Records a vertex in the cell containing it.
    pub fn add_vertex(&mut self, id: VertexRef, v: &WorldPoint) {
        let (row, col) = self.world_to_cell(v);
        self.cell_mut(row, col).insert(id);
    }

    /// Records both endpoint ids of the edge `p1..p2` in every cell it overlaps.
    ///
    /// A cell is skipped only when all four of its corners lie strictly on the
    /// same side of the edge's supporting line.
    pub fn add_segment(&mut self, a: VertexRef, b: VertexRef, p1: &WorldPoint, p2: &WorldPoint) {
        let (r1, c1) = self.world_to_cell(p1);
        let (r2, c2) = self.world_to_cell(p2);
        for row in r1.min(r2)..=r1.max(r2) {
            for col in c1.min(c2)..=c1.max(c2) {
                let corners = [
                    self.cell_to_world(row, col),
                    self.cell_to_world(row, col + 1),
                    self.cell_to_world(row + 1, col),
                    self.cell_to_world(row + 1, col + 1),
                ];
                let sides = corners.map(|c| orientation(p1, p2, &c));
                if sides.iter().all(|&o| o > 0) || sides.iter().all(|&o| o < 0) {
                    continue;
                }
                let cell = self.cell_mut(row, col);
                cell.insert(a);
                cell.insert(b);
            }
        }
    }

    /// Union of the cell contents overlapping `area`, clamped to the partition.
    #[must_use]
    pub fn vertices_in_area(&self, area: &Aabb2) -> BTreeSet<VertexRef> {
        let (r1, c1) = self.world_to_cell(&area.min);
        let (r2, c2) = self.world_to_cell(&area.max);
        let mut out = BTreeSet::new();
        for row in r1..=r2 {
            for col in c1..=c2 {
                out.extend(self.cells[row * self.cols + col].iter().copied());
            }
        }
        out
    }

    /// Vertex ids of one polygon overlapping `area`.
    #[must_use]
    pub fn polygon_vertices_in_area(&self, polygon: Polygon, area: &Aabb2) -> BTreeSet<VertexRef> {
        let mut all = self.vertices_in_area(area);
        all.retain(|v| v.polygon == polygon);
        all
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Number of `(rows, cols)` in the partition.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> &mut BTreeSet<VertexRef> {
        &mut self.cells[row * self.cols + col]
    }

    fn world_to_cell(&self, wp: &WorldPoint) -> (usize, usize) {
        let row = (wp.y / self.cell_size - self.top) / self.span;
        let col = (wp.x / self.cell_size - self.left) / self.span;
        (clamp_index(row, self.rows), clamp_index(col, self.cols))
    }

    #[allow(clippy::cast_precision_loss)]
    fn cell_to_world(&self, row: usize, col: usize) -> WorldPoint {
        WorldPoint::new(
            (col as f64 * self.span + self.left) * self.cell_size,
            (row as f64 * self.span + self.top) * self.cell_size,
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_index(v: f64, len: usize) -> usize {
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        (v.floor() as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::math::GridPoint;

    fn partition() -> TrackPartition {
        // 20x20 grid cells of 10 world units, partition cells of 5 grid cells.
        let grid = Grid::new(10.0);
        let area = WorldArea::new(&grid, GridPoint::new(0, 0), GridPoint::new(20, 20));
        TrackPartition::new(&area, 10.0, 5)
    }

    fn id(vertex: usize) -> VertexRef {
        VertexRef::new(Polygon::Outer, vertex)
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Aabb2 {
        Aabb2::from_corners(&WorldPoint::new(x0, y0), &WorldPoint::new(x1, y1))
    }

    #[test]
    fn dimensions_cover_area() {
        assert_eq!(partition().dimensions(), (5, 5));
    }

    #[test]
    fn vertex_lands_in_its_cell() {
        let mut p = partition();
        p.add_vertex(id(0), &WorldPoint::new(75.0, 120.0));
        assert!(p.vertices_in_area(&rect(60.0, 110.0, 70.0, 130.0)).contains(&id(0)));
        assert!(p.vertices_in_area(&rect(0.0, 0.0, 40.0, 40.0)).is_empty());
    }

    #[test]
    fn diagonal_segment_skips_cells_it_misses() {
        let mut p = partition();
        let a = WorldPoint::new(10.0, 10.0);
        let b = WorldPoint::new(140.0, 140.0);
        p.add_segment(id(0), id(1), &a, &b);
        // Cell (0,2) spans x in [100,150), y in [0,50): fully above the diagonal.
        assert!(p.vertices_in_area(&rect(110.0, 10.0, 120.0, 20.0)).is_empty());
        // Cell (1,1) lies on the diagonal.
        let hit = p.vertices_in_area(&rect(60.0, 60.0, 70.0, 70.0));
        assert!(hit.contains(&id(0)) && hit.contains(&id(1)));
    }

    #[test]
    fn query_is_clamped_to_partition() {
        let mut p = partition();
        p.add_vertex(id(3), &WorldPoint::new(195.0, 195.0));
        let all = p.vertices_in_area(&rect(-1000.0, -1000.0, 1000.0, 1000.0));
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn polygon_filter_and_clear() {
        let mut p = partition();
        p.add_vertex(id(0), &WorldPoint::new(25.0, 25.0));
        p.add_vertex(VertexRef::new(Polygon::Inner, 0), &WorldPoint::new(26.0, 26.0));
        let area = rect(20.0, 20.0, 30.0, 30.0);
        assert_eq!(p.polygon_vertices_in_area(Polygon::Inner, &area).len(), 1);
        assert_eq!(p.vertices_in_area(&area).len(), 2);
        p.clear();
        assert!(p.vertices_in_area(&area).is_empty());
    }
}
