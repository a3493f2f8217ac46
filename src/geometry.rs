//! Planar geometry behind the joint-angle arcs.
//!
//! All inputs are integer pixel coordinates (image space, y grows downward).
//! Angles are in degrees.

use serde::{Deserialize, Serialize};

use crate::pose::PixelCoord;

/// A line through two pixel points. Intersections treat it as infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub from: PixelCoord,
    pub to: PixelCoord,
}

impl Line {
    pub const fn new(from: PixelCoord, to: PixelCoord) -> Self {
        Self { from, to }
    }
}

/// How to choose the endpoint of a segment that is not the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreeEndpointPolicy {
    /// The endpoint that is not equal to the vertex; the first endpoint when
    /// neither matches exactly.
    #[default]
    First,
    /// The endpoint farther from the vertex. Matches `First` whenever one
    /// endpoint coincides with the vertex.
    Farthest,
}

/// Vertex of two lines plus the free endpoint of each segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intersection {
    pub vertex: PixelCoord,
    pub point1: PixelCoord,
    pub point2: PixelCoord,
}

/// Start/end angles of the arc drawn at the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcSweep {
    pub start_deg: f64,
    pub end_deg: f64,
}

impl ArcSweep {
    pub fn span(&self) -> f64 {
        (self.end_deg - self.start_deg).abs()
    }
}

/// Largest vertex coordinate accepted from an intersection, in pixels.
///
/// Nearly parallel segments can meet far outside any frame. Vertices past
/// this bound are rejected.
pub const MAX_VERTEX_COORD: i32 = 1 << 20;

/// Why two lines produce no usable vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionError {
    /// Parallel or coincident lines, including zero-length segments.
    Parallel,
    /// The lines meet beyond `MAX_VERTEX_COORD`.
    OutOfRange,
}

fn det(a: (i128, i128), b: (i128, i128)) -> i128 {
    a.0 * b.1 - a.1 * b.0
}

/// Intersection of the infinite lines through `l1` and `l2`.
///
/// The point is truncated toward zero to integer pixels.
pub fn line_intersection(l1: Line, l2: Line) -> Result<PixelCoord, IntersectionError> {
    let xdiff = (
        l1.from.x as i128 - l1.to.x as i128,
        l2.from.x as i128 - l2.to.x as i128,
    );
    let ydiff = (
        l1.from.y as i128 - l1.to.y as i128,
        l2.from.y as i128 - l2.to.y as i128,
    );

    let div = det(xdiff, ydiff);
    if div == 0 {
        return Err(IntersectionError::Parallel);
    }

    let d = (
        det((l1.from.x as i128, l1.from.y as i128), (l1.to.x as i128, l1.to.y as i128)),
        det((l2.from.x as i128, l2.from.y as i128), (l2.to.x as i128, l2.to.y as i128)),
    );
    let x = (det(d, xdiff) as f64 / div as f64).trunc();
    let y = (det(d, ydiff) as f64 / div as f64).trunc();
    let limit = MAX_VERTEX_COORD as f64;
    if !(x.abs() <= limit && y.abs() <= limit) {
        return Err(IntersectionError::OutOfRange);
    }
    Ok(PixelCoord::new(x as i32, y as i32))
}

/// The endpoint of `line` that is not the vertex.
pub fn free_endpoint(line: Line, vertex: PixelCoord, policy: FreeEndpointPolicy) -> PixelCoord {
    if line.from == vertex {
        return line.to;
    }
    if line.to == vertex {
        return line.from;
    }
    match policy {
        FreeEndpointPolicy::First => line.from,
        FreeEndpointPolicy::Farthest => {
            if line.to.distance_sq(vertex) > line.from.distance_sq(vertex) {
                line.to
            } else {
                line.from
            }
        }
    }
}

/// Vertex and free endpoints for two segments.
pub fn intersect_segments(
    l1: Line,
    l2: Line,
    policy: FreeEndpointPolicy,
) -> Result<Intersection, IntersectionError> {
    let vertex = line_intersection(l1, l2)?;
    Ok(Intersection {
        vertex,
        point1: free_endpoint(l1, vertex, policy),
        point2: free_endpoint(l2, vertex, policy),
    })
}

/// Direction of the ray `from -> to`, in (-180, 180].
pub fn ray_angle(from: PixelCoord, to: PixelCoord) -> f64 {
    let dx = to.x as f64 - from.x as f64;
    let dy = to.y as f64 - from.y as f64;
    dy.atan2(dx).to_degrees()
}

/// Signed sweep from ray `vertex -> a` to ray `vertex -> c`, in [0, 360).
///
/// The rays are ordered left to right by x first so the result does not
/// depend on which segment was listed first.
pub fn swept_angle(a: PixelCoord, vertex: PixelCoord, c: PixelCoord) -> f64 {
    let (a, c) = if a.x > c.x { (c, a) } else { (a, c) };
    let ang = ray_angle(vertex, c) - ray_angle(vertex, a);
    let ang = if ang < 0.0 { ang + 360.0 } else { ang };
    // -0.0 and rounding can land exactly on 360
    if ang >= 360.0 { ang - 360.0 } else { ang }
}

/// Interior angle at `vertex`, in [0, 180].
pub fn interior_angle(a: PixelCoord, vertex: PixelCoord, c: PixelCoord) -> f64 {
    let swept = swept_angle(a, vertex, c);
    if swept > 180.0 { 360.0 - swept } else { swept }
}

/// Arc sweep between the two rays, always along the shorter path.
pub fn arc_sweep(vertex: PixelCoord, point1: PixelCoord, point2: PixelCoord) -> ArcSweep {
    let mut start_deg = ray_angle(vertex, point1);
    let mut end_deg = ray_angle(vertex, point2);
    if (end_deg - start_deg).abs() > 180.0 {
        if start_deg < end_deg {
            start_deg += 360.0;
        } else {
            end_deg += 360.0;
        }
    }
    ArcSweep { start_deg, end_deg }
}
