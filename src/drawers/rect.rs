//! Rectangle drawer: one press-drag-release, shift constrains to a square.

#[cfg(test)]
#[path = "rect_test.rs"]
mod rect_test;

use crate::config::DrawerConfig;
use crate::drawer::{Drawer, DrawerCategory, DrawerMeta, DrawingResult, GestureKind, Preview, Transform};
use crate::element::{AnnotationElement, ElementData, RectData, ToolType};
use crate::error::RenderError;
use crate::geometry::{bounds_from_points, NormalizedPoint, NormalizedRect};
use crate::input::DrawingContext;
use crate::render::{
    draw_label, draw_vertex_handles, set_dashed, set_solid, trace_polyline, RenderOptions, RenderSurface,
    ResolvedStyle,
};

pub const DRAWER_ID: &str = "rect";

pub struct RectangleDrawer {
    meta: DrawerMeta,
    min_size: f64,
}

impl RectangleDrawer {
    #[must_use]
    pub fn new(config: &DrawerConfig) -> Self {
        Self {
            meta: DrawerMeta {
                id: DRAWER_ID.to_string(),
                name: "Rectangle".to_string(),
                category: DrawerCategory::Shape,
                shortcut: 'r',
                tool_type: ToolType::Rect,
                cursor: "crosshair".to_string(),
            },
            min_size: config.min_size,
        }
    }

    fn preview(bounds: NormalizedRect) -> DrawingResult {
        DrawingResult::pending(Preview { data: ElementData::Rect(RectData { bounds }), cursor: None })
    }
}

/// Bounds spanned by a drag from `start` to `current`.
///
/// With `square`, both sides take the larger drag delta, signed to follow
/// the drag direction and shortened if needed to stay inside the media.
#[must_use]
pub fn drag_bounds(start: NormalizedPoint, current: NormalizedPoint, square: bool) -> NormalizedRect {
    if !square {
        return bounds_from_points(start, current);
    }
    let dx = current.x - start.x;
    let dy = current.y - start.y;
    let room_x = if dx >= 0.0 { 1.0 - start.x } else { start.x };
    let room_y = if dy >= 0.0 { 1.0 - start.y } else { start.y };
    let side = dx.abs().max(dy.abs()).min(room_x).min(room_y);
    let end = NormalizedPoint::new(start.x + side.copysign(dx), start.y + side.copysign(dy));
    bounds_from_points(start, end)
}

/// Both dimensions strictly exceed `min_size`.
#[must_use]
pub fn meets_min_size(bounds: &NormalizedRect, min_size: f64) -> bool {
    bounds.width > min_size && bounds.height > min_size
}

#[must_use]
pub fn transformed(data: &RectData, transform: &Transform) -> RectData {
    RectData { bounds: transform.apply_rect(&data.bounds) }
}

impl Drawer for RectangleDrawer {
    fn meta(&self) -> &DrawerMeta {
        &self.meta
    }

    fn gesture(&self) -> GestureKind {
        GestureKind::Drag
    }

    fn on_draw_start(&self, ctx: &DrawingContext<'_>) -> DrawingResult {
        let p = ctx.current();
        Self::preview(NormalizedRect::new(p.x, p.y, 0.0, 0.0)).with_cursor(&self.meta.cursor)
    }

    fn on_draw_move(&self, ctx: &DrawingContext<'_>) -> DrawingResult {
        let Some(start) = ctx.start_point else {
            return DrawingResult::discarded();
        };
        Self::preview(drag_bounds(start, ctx.current(), ctx.modifiers().shift))
    }

    fn on_draw_end(&self, ctx: &DrawingContext<'_>) -> DrawingResult {
        let Some(start) = ctx.start_point else {
            return DrawingResult::discarded();
        };
        let bounds = drag_bounds(start, ctx.current(), ctx.modifiers().shift);
        if !meets_min_size(&bounds, self.min_size) {
            return DrawingResult::discarded();
        }
        DrawingResult::completed(ElementData::Rect(RectData { bounds }))
    }

    fn render_element(
        &self,
        element: &AnnotationElement,
        surface: &mut dyn RenderSurface,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        let ElementData::Rect(data) = &element.data else {
            return Ok(());
        };
        let style = ResolvedStyle::for_element(element.style.as_ref(), options);
        let corners = data.bounds.corners();

        surface.save();
        style.apply(surface);
        trace_polyline(surface, &corners, true, options);
        surface.fill();
        surface.stroke();
        surface.restore();

        if options.is_selected {
            draw_vertex_handles(surface, &corners, &style.stroke, options)?;
        }
        draw_label(surface, &element.label, corners[0], &style.stroke, options)
    }

    fn render_preview(
        &self,
        preview: &Preview,
        surface: &mut dyn RenderSurface,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        let ElementData::Rect(data) = &preview.data else {
            return Ok(());
        };
        surface.save();
        ResolvedStyle::preview().apply(surface);
        set_dashed(surface, options)?;
        trace_polyline(surface, &data.bounds.corners(), true, options);
        surface.stroke();
        set_solid(surface)?;
        surface.restore();
        Ok(())
    }

    fn hit_test(&self, element: &AnnotationElement, point: NormalizedPoint, _tolerance: f64) -> bool {
        match &element.data {
            ElementData::Rect(data) => data.bounds.contains(point),
            _ => false,
        }
    }
}
