//! Polygon and smooth-path drawers.
//!
//! Both are multi-click: every press appends a point, double-click finishes.
//! They differ only in how the point list is drawn and hit-tested. A polygon
//! is a straight-edged outline whose interior counts as a hit once closed; a
//! path is a Catmull-Rom curve through its points and only its stroke counts.
//!
//! A shape closes itself when its last point lands within
//! `auto_close_distance` of its first.

#[cfg(test)]
#[path = "polygon_test.rs"]
mod polygon_test;

use crate::config::DrawerConfig;
use crate::consts::{DUPLICATE_POINT_EPSILON, SELECTED_STROKE};
use crate::drawer::{Drawer, DrawerCategory, DrawerMeta, DrawingResult, GestureKind, Preview, Transform};
use crate::element::{AnnotationElement, ElementData, PolylineData, ToolType};
use crate::error::RenderError;
use crate::geometry::{
    bounds_of, catmull_rom_segments, point_in_polygon, point_to_segment_distance, sample_catmull_rom, NormalizedPoint,
    NormalizedRect,
};
use crate::input::DrawingContext;
use crate::render::{
    draw_label, draw_vertex_handles, set_dashed, set_solid, trace_curve, trace_polyline, RenderOptions,
    RenderSurface, ResolvedStyle,
};

pub const POLYGON_ID: &str = "polygon";
pub const PATH_ID: &str = "path";

/// Which of the two point-list shapes a drawer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolylineKind {
    Polygon,
    Path,
}

pub struct PolylineDrawer {
    meta: DrawerMeta,
    kind: PolylineKind,
    auto_close_distance: f64,
    tension: f64,
    samples: usize,
}

impl PolylineDrawer {
    #[must_use]
    pub fn polygon(config: &DrawerConfig) -> Self {
        Self::new(
            PolylineKind::Polygon,
            DrawerMeta {
                id: POLYGON_ID.to_string(),
                name: "Polygon".to_string(),
                category: DrawerCategory::Freeform,
                shortcut: 'p',
                tool_type: ToolType::Polygon,
                cursor: "crosshair".to_string(),
            },
            config,
        )
    }

    #[must_use]
    pub fn path(config: &DrawerConfig) -> Self {
        Self::new(
            PolylineKind::Path,
            DrawerMeta {
                id: PATH_ID.to_string(),
                name: "Smooth path".to_string(),
                category: DrawerCategory::Freeform,
                shortcut: 's',
                tool_type: ToolType::Path,
                cursor: "crosshair".to_string(),
            },
            config,
        )
    }

    fn new(kind: PolylineKind, meta: DrawerMeta, config: &DrawerConfig) -> Self {
        Self {
            meta,
            kind,
            auto_close_distance: config.auto_close_distance,
            tension: config.spline_tension,
            samples: config.spline_samples,
        }
    }

    fn wrap(&self, data: PolylineData) -> ElementData {
        match self.kind {
            PolylineKind::Polygon => ElementData::Polygon(data),
            PolylineKind::Path => ElementData::Path(data),
        }
    }

    fn preview(&self, points: Vec<NormalizedPoint>, cursor: NormalizedPoint) -> Preview {
        Preview { data: self.wrap(PolylineData { points, closed: false }), cursor: Some(cursor) }
    }

    /// Trace the outline (straight or smooth) without stroking it.
    fn trace(&self, surface: &mut dyn RenderSurface, points: &[NormalizedPoint], closed: bool, options: &RenderOptions) {
        match self.kind {
            PolylineKind::Polygon => trace_polyline(surface, points, closed, options),
            PolylineKind::Path => {
                let segments = catmull_rom_segments(points, closed, self.tension);
                trace_curve(surface, &segments, closed, options);
            }
        }
    }
}

/// `points` with `p` appended, unless `p` repeats the last point.
#[must_use]
pub fn append_point(points: &[NormalizedPoint], p: NormalizedPoint) -> Vec<NormalizedPoint> {
    let mut out = points.to_vec();
    if out.last().is_none_or(|last| last.distance_to(p) > DUPLICATE_POINT_EPSILON) {
        out.push(p);
    }
    out
}

/// First and last points are closer than `distance`.
#[must_use]
pub fn is_auto_closed(points: &[NormalizedPoint], distance: f64) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 2 => first.distance_to(*last) < distance,
        _ => false,
    }
}

/// The test point lies within `tolerance` of any edge, including the
/// closing edge when `closed`.
#[must_use]
pub fn near_outline(points: &[NormalizedPoint], closed: bool, point: NormalizedPoint, tolerance: f64) -> bool {
    match points {
        [] => false,
        [only] => only.distance_to(point) <= tolerance,
        _ => {
            let near_edge = points
                .windows(2)
                .any(|w| point_to_segment_distance(point, w[0], w[1]) <= tolerance);
            let near_closing = closed
                && points.len() > 2
                && points
                    .first()
                    .zip(points.last())
                    .is_some_and(|(first, last)| point_to_segment_distance(point, *last, *first) <= tolerance);
            near_edge || near_closing
        }
    }
}

#[must_use]
pub fn bounds(points: &[NormalizedPoint]) -> NormalizedRect {
    bounds_of(points).unwrap_or_default()
}

#[must_use]
pub fn transformed(data: &PolylineData, transform: &Transform) -> PolylineData {
    PolylineData {
        points: data.points.iter().map(|p| transform.apply_point(*p)).collect(),
        closed: data.closed,
    }
}

impl Drawer for PolylineDrawer {
    fn meta(&self) -> &DrawerMeta {
        &self.meta
    }

    fn gesture(&self) -> GestureKind {
        GestureKind::MultiClick
    }

    fn on_draw_start(&self, ctx: &DrawingContext<'_>) -> DrawingResult {
        let cursor = ctx.current();
        let points = append_point(ctx.points, cursor);
        DrawingResult::pending(self.preview(points.clone(), cursor))
            .with_points(points)
            .with_cursor(&self.meta.cursor)
    }

    fn on_draw_move(&self, ctx: &DrawingContext<'_>) -> DrawingResult {
        if ctx.points.is_empty() {
            return DrawingResult::discarded();
        }
        DrawingResult::pending(self.preview(ctx.points.to_vec(), ctx.current()))
    }

    fn on_draw_end(&self, ctx: &DrawingContext<'_>) -> DrawingResult {
        self.on_draw_move(ctx)
    }

    fn on_draw_complete(&self, ctx: &DrawingContext<'_>) -> DrawingResult {
        if ctx.points.len() < 2 {
            return DrawingResult::discarded();
        }
        let closed = is_auto_closed(ctx.points, self.auto_close_distance);
        DrawingResult::completed(self.wrap(PolylineData { points: ctx.points.to_vec(), closed }))
    }

    fn render_element(
        &self,
        element: &AnnotationElement,
        surface: &mut dyn RenderSurface,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        let (ElementData::Polygon(data) | ElementData::Path(data)) = &element.data else {
            return Ok(());
        };
        let style = ResolvedStyle::for_element(element.style.as_ref(), options);

        surface.save();
        style.apply(surface);
        self.trace(surface, &data.points, data.closed, options);
        if data.closed {
            surface.fill();
        }
        surface.stroke();
        surface.restore();

        if options.is_selected {
            draw_vertex_handles(surface, &data.points, &style.stroke, options)?;
        }
        let anchor = bounds(&data.points);
        draw_label(surface, &element.label, NormalizedPoint::new(anchor.x, anchor.y), &style.stroke, options)
    }

    fn render_preview(
        &self,
        preview: &Preview,
        surface: &mut dyn RenderSurface,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        let (ElementData::Polygon(data) | ElementData::Path(data)) = &preview.data else {
            return Ok(());
        };
        let mut points = data.points.clone();
        if let Some(cursor) = preview.cursor {
            points = append_point(&points, cursor);
        }
        let style = ResolvedStyle::preview();

        surface.save();
        style.apply(surface);
        set_dashed(surface, options)?;
        self.trace(surface, &points, false, options);
        surface.stroke();
        set_solid(surface)?;
        surface.restore();

        draw_vertex_handles(surface, &data.points, &style.stroke, options)?;
        // Highlight the first point while the cursor would close the shape.
        let closes = preview.cursor.zip(data.points.first()).is_some_and(|(cursor, first)| {
            data.points.len() >= 2 && first.distance_to(cursor) < self.auto_close_distance
        });
        if closes {
            if let Some(first) = data.points.first() {
                draw_vertex_handles(surface, std::slice::from_ref(first), SELECTED_STROKE, options)?;
            }
        }
        Ok(())
    }

    fn hit_test(&self, element: &AnnotationElement, point: NormalizedPoint, tolerance: f64) -> bool {
        match &element.data {
            ElementData::Polygon(data) => {
                near_outline(&data.points, data.closed, point, tolerance)
                    || (data.closed && point_in_polygon(point, &data.points))
            }
            ElementData::Path(data) => near_outline(&data.points, data.closed, point, tolerance),
            ElementData::Rect(_) | ElementData::Box3D(_) => false,
        }
    }

    /// A smooth path can bulge past its points, so its bounds follow the
    /// sampled curve.
    fn bounds(&self, element: &AnnotationElement) -> NormalizedRect {
        match &element.data {
            ElementData::Path(data) => {
                let curve = sample_catmull_rom(&data.points, data.closed, self.tension, self.samples);
                bounds(&curve)
            }
            other => other.bounds(),
        }
    }
}
