//! Normalized geometry: points and rects in media-relative [0, 1] space, and
//! the pure functions every drawer is built from.
//!
//! Nothing here knows about pixels. Conversion to screen space happens in the
//! renderer through [`crate::drawer::RenderOptions`].

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point relative to the displayed media, `(0, 0)` top-left, `(1, 1)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation from `self` toward `target` by `t`.
    #[must_use]
    pub fn lerp(self, target: Self, t: f64) -> Self {
        Self {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }

    /// Clamp both coordinates into [0, 1].
    #[must_use]
    pub fn clamped(self) -> Self {
        Self { x: self.x.clamp(0.0, 1.0), y: self.y.clamp(0.0, 1.0) }
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Scale away from (or toward) `origin` independently on each axis.
    #[must_use]
    pub fn scaled_about(self, origin: Self, sx: f64, sy: f64) -> Self {
        Self {
            x: origin.x + (self.x - origin.x) * sx,
            y: origin.y + (self.y - origin.y) * sy,
        }
    }

    /// Rotate around `origin` by `radians` (positive is clockwise in y-down space).
    #[must_use]
    pub fn rotated_about(self, origin: Self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        let dx = self.x - origin.x;
        let dy = self.y - origin.y;
        Self {
            x: origin.x + dx * cos - dy * sin,
            y: origin.y + dx * sin + dy * cos,
        }
    }
}

/// An axis-aligned rectangle in normalized space.
///
/// Width and height are non-negative for every rect produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in clockwise order starting top-left: TL, TR, BR, BL.
    #[must_use]
    pub fn corners(&self) -> [NormalizedPoint; 4] {
        [
            NormalizedPoint::new(self.x, self.y),
            NormalizedPoint::new(self.right(), self.y),
            NormalizedPoint::new(self.right(), self.bottom()),
            NormalizedPoint::new(self.x, self.bottom()),
        ]
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: NormalizedPoint) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Grow the rect by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Scale about `origin`; negative factors flip the rect and are re-normalized.
    #[must_use]
    pub fn scaled_about(&self, origin: NormalizedPoint, sx: f64, sy: f64) -> Self {
        let x = origin.x + (self.x - origin.x) * sx;
        let y = origin.y + (self.y - origin.y) * sy;
        normalize_rect(x, y, self.width * sx, self.height * sy)
    }

    /// Axis-aligned bounds of the rect's corners rotated about `origin`.
    #[must_use]
    pub fn rotated_bounds(&self, origin: NormalizedPoint, radians: f64) -> Self {
        let corners = self.corners().map(|c| c.rotated_about(origin, radians));
        bounds_of(&corners).unwrap_or(*self)
    }

    /// Smallest rect covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Reorder a possibly-negative extent so width and height are non-negative.
#[must_use]
pub fn normalize_rect(x: f64, y: f64, width: f64, height: f64) -> NormalizedRect {
    NormalizedRect {
        x: if width < 0.0 { x + width } else { x },
        y: if height < 0.0 { y + height } else { y },
        width: width.abs(),
        height: height.abs(),
    }
}

/// Axis-aligned rect spanned by two opposite corners.
#[must_use]
pub fn bounds_from_points(a: NormalizedPoint, b: NormalizedPoint) -> NormalizedRect {
    NormalizedRect {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width: (a.x - b.x).abs(),
        height: (a.y - b.y).abs(),
    }
}

/// Axis-aligned bounds of a point set. `None` when `points` is empty.
#[must_use]
pub fn bounds_of(points: &[NormalizedPoint]) -> Option<NormalizedRect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(NormalizedRect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// Even-odd ray cast. Polygons with fewer than three vertices contain nothing.
#[must_use]
pub fn point_in_polygon(point: NormalizedPoint, vertices: &[NormalizedPoint]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];
        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Distance from `p` to the segment `a`–`b`, projecting onto the segment and
/// clamping the projection parameter to [0, 1].
#[must_use]
pub fn point_to_segment_distance(p: NormalizedPoint, a: NormalizedPoint, b: NormalizedPoint) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f64::EPSILON {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    p.distance_to(NormalizedPoint::new(a.x + abx * t, a.y + aby * t))
}

/// Index of the vertex closest to `target`, if it lies within `threshold`.
/// Ties resolve to the lowest index.
#[must_use]
pub fn nearest_vertex(points: &[NormalizedPoint], target: NormalizedPoint, threshold: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = p.distance_to(target);
        if d > threshold {
            continue;
        }
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Project `point` toward `vanishing` by `depth` (0 = unchanged, 1 = at the vanishing point).
#[must_use]
pub fn project_toward(point: NormalizedPoint, vanishing: NormalizedPoint, depth: f64) -> NormalizedPoint {
    point.lerp(vanishing, depth)
}

// =============================================================
// Catmull-Rom
// =============================================================

/// One cubic Bézier span of a Catmull-Rom curve, from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub from: NormalizedPoint,
    pub ctrl1: NormalizedPoint,
    pub ctrl2: NormalizedPoint,
    pub to: NormalizedPoint,
}

/// Evaluate the cardinal spline segment between `p1` and `p2` at `t` in [0, 1].
///
/// Tangents are `tension * (p2 - p0)` and `tension * (p3 - p1)`; with a
/// tension of 0.5 this is the classic Catmull-Rom curve.
#[must_use]
pub fn catmull_rom_point(
    p0: NormalizedPoint,
    p1: NormalizedPoint,
    p2: NormalizedPoint,
    p3: NormalizedPoint,
    t: f64,
    tension: f64,
) -> NormalizedPoint {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    let m1x = tension * (p2.x - p0.x);
    let m1y = tension * (p2.y - p0.y);
    let m2x = tension * (p3.x - p1.x);
    let m2y = tension * (p3.y - p1.y);
    NormalizedPoint {
        x: h00 * p1.x + h10 * m1x + h01 * p2.x + h11 * m2x,
        y: h00 * p1.y + h10 * m1y + h01 * p2.y + h11 * m2y,
    }
}

/// The four control points feeding segment `i` (from `points[i]` to the next point).
///
/// Closed curves wrap around; open curves duplicate their endpoints.
fn segment_controls(points: &[NormalizedPoint], i: usize, closed: bool) -> [NormalizedPoint; 4] {
    let n = points.len();
    if closed {
        [
            points[(i + n - 1) % n],
            points[i],
            points[(i + 1) % n],
            points[(i + 2) % n],
        ]
    } else {
        [
            points[i.saturating_sub(1)],
            points[i],
            points[i + 1],
            points[(i + 2).min(n - 1)],
        ]
    }
}

fn segment_count(len: usize, closed: bool) -> usize {
    match len {
        0 | 1 => 0,
        2 => 1,
        n if closed => n,
        n => n - 1,
    }
}

/// Convert a point sequence to the Bézier spans of its Catmull-Rom curve.
///
/// A two-point sequence is always a single (straight) span, even when closed.
#[must_use]
pub fn catmull_rom_segments(points: &[NormalizedPoint], closed: bool, tension: f64) -> Vec<CubicSegment> {
    let wrap = closed && points.len() > 2;
    (0..segment_count(points.len(), wrap))
        .map(|i| {
            let [p0, p1, p2, p3] = segment_controls(points, i, wrap);
            let k = tension / 3.0;
            CubicSegment {
                from: p1,
                ctrl1: NormalizedPoint::new(p1.x + (p2.x - p0.x) * k, p1.y + (p2.y - p0.y) * k),
                ctrl2: NormalizedPoint::new(p2.x - (p3.x - p1.x) * k, p2.y - (p3.y - p1.y) * k),
                to: p2,
            }
        })
        .collect()
}

/// Flatten the Catmull-Rom curve through `points` into a polyline with
/// `samples` steps per segment. The original points are all on the result.
#[must_use]
pub fn sample_catmull_rom(points: &[NormalizedPoint], closed: bool, tension: f64, samples: usize) -> Vec<NormalizedPoint> {
    let wrap = closed && points.len() > 2;
    let segments = segment_count(points.len(), wrap);
    if segments == 0 {
        return points.to_vec();
    }
    let steps = samples.max(1);
    let mut out = Vec::with_capacity(segments * steps + 1);
    out.push(points[0]);
    for i in 0..segments {
        let [p0, p1, p2, p3] = segment_controls(points, i, wrap);
        for s in 1..=steps {
            #[allow(clippy::cast_precision_loss)]
            let t = s as f64 / steps as f64;
            out.push(catmull_rom_point(p0, p1, p2, p3, t, tension));
        }
    }
    out
}
