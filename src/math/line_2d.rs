use super::{Vector2, WorldPoint, ORIENTATION_EPSILON, TOLERANCE};

/// Slack allowed on segment parameters when locating an intersection point.
const PARAM_EPSILON: f64 = 1e-6;

/// Classification of how two segments (or a segment and a line) meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intersection {
    /// The segments do not meet.
    None,
    /// The segments cross at a point interior to both.
    Middle,
    /// The first segment's first endpoint lies on the other one.
    Endpoint1,
    /// The first segment's second endpoint lies on the other one.
    Endpoint2,
    /// The second segment's first endpoint lies on the first one.
    Endpoint3,
    /// The second segment's second endpoint lies on the first one.
    Endpoint4,
    /// The segments are collinear and share more than one point.
    Overlap,
}

impl Intersection {
    /// Returns `true` for every result other than [`Intersection::None`].
    #[must_use]
    pub fn exists(self) -> bool {
        self != Self::None
    }
}

/// 2D cross product `a x b`.
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Orientation of the ordered triple `(p, q, r)`.
///
/// Sign of `(q - p) x (r - q)`: `+1` for a clockwise turn on a Y-down screen,
/// `-1` for counter-clockwise, `0` when collinear within
/// [`ORIENTATION_EPSILON`].
#[must_use]
pub fn orientation(p: &WorldPoint, q: &WorldPoint, r: &WorldPoint) -> i32 {
    let val = cross(&(q - p), &(r - q));
    if val.abs() < ORIENTATION_EPSILON {
        0
    } else if val > 0.0 {
        1
    } else {
        -1
    }
}

/// Sum of per-corner orientations around a closed loop.
///
/// The sign gives the dominant winding; assumes a simple polygon whose last
/// vertex connects back to the first.
#[must_use]
pub fn clockwiseness(points: &[WorldPoint]) -> i32 {
    let n = points.len();
    if n < 3 {
        return 0;
    }
    (0..n)
        .map(|i| orientation(&points[i], &points[(i + 1) % n], &points[(i + 2) % n]))
        .sum()
}

/// Returns `true` if `q` lies on segment `p..r` (collinear and inside the
/// bounding box).
#[must_use]
pub fn on_segment(p: &WorldPoint, q: &WorldPoint, r: &WorldPoint) -> bool {
    orientation(p, q, r) == 0
        && q.x <= p.x.max(r.x)
        && q.x >= p.x.min(r.x)
        && q.y <= p.y.max(r.y)
        && q.y >= p.y.min(r.y)
}

/// Classifies how segment `p1a..p1b` meets segment `p2a..p2b`.
#[must_use]
pub fn segment_intersect(
    p1a: &WorldPoint,
    p1b: &WorldPoint,
    p2a: &WorldPoint,
    p2b: &WorldPoint,
) -> Intersection {
    let o1 = orientation(p1a, p1b, p2a);
    let o2 = orientation(p1a, p1b, p2b);
    let o3 = orientation(p2a, p2b, p1a);
    let o4 = orientation(p2a, p2b, p1b);

    if o1 != o2 && o3 != o4 && o1 * o2 * o3 * o4 != 0 {
        return Intersection::Middle;
    }

    // p2a lies on the first segment.
    if o1 == 0 && on_segment(p1a, p2a, p1b) {
        return if on_segment(p2a, p1a, p2b)
            || on_segment(p2a, p1b, p2b)
            || on_segment(p1a, p2b, p1b)
        {
            Intersection::Overlap
        } else {
            Intersection::Endpoint3
        };
    }

    // p2b lies on the first segment.
    if o2 == 0 && on_segment(p1a, p2b, p1b) {
        return if on_segment(p2a, p1a, p2b)
            || on_segment(p2a, p1b, p2b)
            || on_segment(p1a, p2a, p1b)
        {
            Intersection::Overlap
        } else {
            Intersection::Endpoint4
        };
    }

    // p1a lies on the second segment.
    if o3 == 0 && on_segment(p2a, p1a, p2b) {
        return if on_segment(p1a, p2a, p1b)
            || on_segment(p1a, p2b, p1b)
            || on_segment(p2a, p1b, p2b)
        {
            Intersection::Overlap
        } else {
            Intersection::Endpoint1
        };
    }

    // p1b lies on the second segment.
    if o4 == 0 && on_segment(p2a, p1b, p2b) {
        return if on_segment(p1a, p2a, p1b)
            || on_segment(p1a, p2b, p1b)
            || on_segment(p2a, p1a, p2b)
        {
            Intersection::Overlap
        } else {
            Intersection::Endpoint2
        };
    }

    Intersection::None
}

/// Classifies how segment `s1..s2` meets the infinite line through `l1, l2`.
///
/// Only `None`, `Middle`, `Endpoint1`, `Endpoint2` and `Overlap` are produced.
#[must_use]
pub fn segment_intersect_line(
    s1: &WorldPoint,
    s2: &WorldPoint,
    l1: &WorldPoint,
    l2: &WorldPoint,
) -> Intersection {
    let o1 = orientation(l1, l2, s1);
    let o2 = orientation(l1, l2, s2);

    if o1 == 0 && o2 == 0 {
        Intersection::Overlap
    } else if o1 == o2 {
        Intersection::None
    } else if o1 == 0 {
        Intersection::Endpoint1
    } else if o2 == 0 {
        Intersection::Endpoint2
    } else {
        Intersection::Middle
    }
}

/// Intersection point of segment `p..p2` with segment `q..q2`, or with the
/// infinite line through `q, q2` when `extend_second` is set.
///
/// Callers must have classified the pair as intersecting first. Collinear
/// overlaps yield a shared endpoint. Returns `None` when the inputs do not
/// actually meet.
#[must_use]
pub fn intersection_point(
    p: &WorldPoint,
    p2: &WorldPoint,
    q: &WorldPoint,
    q2: &WorldPoint,
    extend_second: bool,
) -> Option<WorldPoint> {
    let r = p2 - p;
    let s = q2 - q;
    let qp = q - p;
    let rxs = cross(&r, &s);
    let qpxr = cross(&qp, &r);

    if rxs.abs() < TOLERANCE && qpxr.abs() < TOLERANCE {
        let qp_dot_r = qp.dot(&r);
        if (0.0..=r.dot(&r)).contains(&qp_dot_r) {
            return Some(*q);
        }
        let pq_dot_s = (p - q).dot(&s);
        if (0.0..=s.dot(&s)).contains(&pq_dot_s) {
            return Some(*p);
        }
        return extend_second.then_some(*p);
    }

    if rxs.abs() < TOLERANCE {
        // Parallel with a non-zero gap.
        return None;
    }

    let t = cross(&qp, &s) / rxs;
    let u = qpxr / rxs;
    let within = |v: f64| (-PARAM_EPSILON..=1.0 + PARAM_EPSILON).contains(&v);
    if within(t) && (extend_second || within(u)) {
        Some(p + r * t.clamp(0.0, 1.0))
    } else {
        None
    }
}
