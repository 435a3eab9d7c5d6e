pub mod aabb_2d;
pub mod line_2d;
pub mod point;

pub use aabb_2d::Aabb2;
pub use point::{Arrow, GridPoint, ScreenPoint, Transform};

/// World-space point type.
pub type WorldPoint = nalgebra::Point2<f64>;

/// World-space vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Integer displacement between two grid points.
pub type GridVector = nalgebra::Vector2<i32>;

/// Cross products smaller than this are treated as collinear.
pub const ORIENTATION_EPSILON: f64 = 1e-6;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
