//! Perspective box drawer.
//!
//! The user drags the front face like a rectangle. On release the box gets
//! the configured depth and vanishing point; the back face is the front face
//! projected `depth` of the way toward the vanishing point. The back face is
//! drawn dashed, then the four side faces, then the front face on top.

#[cfg(test)]
#[path = "box3d_test.rs"]
mod box3d_test;

use crate::config::DrawerConfig;
use crate::drawer::{Drawer, DrawerCategory, DrawerMeta, DrawingResult, GestureKind, Preview, Transform};
use crate::drawers::rect::{drag_bounds, meets_min_size};
use crate::element::{AnnotationElement, Box3DData, ElementData, ToolType};
use crate::error::RenderError;
use crate::geometry::{bounds_of, project_toward, NormalizedPoint, NormalizedRect};
use crate::input::DrawingContext;
use crate::render::{
    draw_label, draw_vertex_handles, set_dashed, set_solid, trace_polyline, RenderOptions, RenderSurface,
    ResolvedStyle,
};

pub const DRAWER_ID: &str = "box3d";

pub struct Box3DDrawer {
    meta: DrawerMeta,
    min_size: f64,
    depth: f64,
    vanishing_point: NormalizedPoint,
    hit_margin: f64,
}

/// Front and back corners, each ordered TL, TR, BR, BL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCorners {
    pub front: [NormalizedPoint; 4],
    pub back: [NormalizedPoint; 4],
}

impl BoxCorners {
    /// The four side quads, each `[front i, front i+1, back i+1, back i]`.
    #[must_use]
    pub fn sides(&self) -> [[NormalizedPoint; 4]; 4] {
        let f = self.front;
        let b = self.back;
        std::array::from_fn(|i| {
            let j = (i + 1) % 4;
            [f[i], f[j], b[j], b[i]]
        })
    }

    fn all(&self) -> [NormalizedPoint; 8] {
        let mut out = [NormalizedPoint::default(); 8];
        out[..4].copy_from_slice(&self.front);
        out[4..].copy_from_slice(&self.back);
        out
    }
}

#[must_use]
pub fn corners(data: &Box3DData) -> BoxCorners {
    let front = data.front.corners();
    let back = front.map(|p| project_toward(p, data.vanishing_point, data.depth));
    BoxCorners { front, back }
}

/// Bounds covering all eight corners.
#[must_use]
pub fn bounds(data: &Box3DData) -> NormalizedRect {
    bounds_of(&corners(data).all()).unwrap_or(data.front)
}

#[must_use]
pub fn transformed(data: &Box3DData, transform: &Transform) -> Box3DData {
    Box3DData {
        front: transform.apply_rect(&data.front),
        vanishing_point: transform.apply_point(data.vanishing_point),
        depth: data.depth,
    }
}

impl Box3DDrawer {
    #[must_use]
    pub fn new(config: &DrawerConfig) -> Self {
        Self {
            meta: DrawerMeta {
                id: DRAWER_ID.to_string(),
                name: "3D box".to_string(),
                category: DrawerCategory::Perspective,
                shortcut: 'b',
                tool_type: ToolType::Box3D,
                cursor: "crosshair".to_string(),
            },
            min_size: config.min_size,
            depth: config.box_default_depth,
            vanishing_point: config.box_vanishing_point,
            hit_margin: config.box_hit_margin,
        }
    }

    fn data(&self, front: NormalizedRect) -> Box3DData {
        Box3DData { front, vanishing_point: self.vanishing_point, depth: self.depth }
    }

    fn preview(&self, front: NormalizedRect) -> DrawingResult {
        DrawingResult::pending(Preview { data: ElementData::Box3D(self.data(front)), cursor: None })
    }
}

fn stroke_quad(surface: &mut dyn RenderSurface, quad: &[NormalizedPoint], options: &RenderOptions) {
    trace_polyline(surface, quad, true, options);
    surface.stroke();
}

impl Drawer for Box3DDrawer {
    fn meta(&self) -> &DrawerMeta {
        &self.meta
    }

    fn gesture(&self) -> GestureKind {
        GestureKind::Drag
    }

    fn on_draw_start(&self, ctx: &DrawingContext<'_>) -> DrawingResult {
        let p = ctx.current();
        self.preview(NormalizedRect::new(p.x, p.y, 0.0, 0.0)).with_cursor(&self.meta.cursor)
    }

    fn on_draw_move(&self, ctx: &DrawingContext<'_>) -> DrawingResult {
        let Some(start) = ctx.start_point else {
            return DrawingResult::discarded();
        };
        self.preview(drag_bounds(start, ctx.current(), ctx.modifiers().shift))
    }

    fn on_draw_end(&self, ctx: &DrawingContext<'_>) -> DrawingResult {
        let Some(start) = ctx.start_point else {
            return DrawingResult::discarded();
        };
        let front = drag_bounds(start, ctx.current(), ctx.modifiers().shift);
        if !meets_min_size(&front, self.min_size) {
            return DrawingResult::discarded();
        }
        DrawingResult::completed(ElementData::Box3D(self.data(front)))
    }

    fn render_element(
        &self,
        element: &AnnotationElement,
        surface: &mut dyn RenderSurface,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        let ElementData::Box3D(data) = &element.data else {
            return Ok(());
        };
        let style = ResolvedStyle::for_element(element.style.as_ref(), options);
        let c = corners(data);

        surface.save();
        style.apply(surface);

        set_dashed(surface, options)?;
        stroke_quad(surface, &c.back, options);
        set_solid(surface)?;

        for side in c.sides() {
            stroke_quad(surface, &side, options);
        }

        trace_polyline(surface, &c.front, true, options);
        surface.fill();
        surface.stroke();
        surface.restore();

        if options.is_selected {
            draw_vertex_handles(surface, &c.front, &style.stroke, options)?;
        }
        draw_label(surface, &element.label, c.front[0], &style.stroke, options)
    }

    fn render_preview(
        &self,
        preview: &Preview,
        surface: &mut dyn RenderSurface,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        let ElementData::Box3D(data) = &preview.data else {
            return Ok(());
        };
        let c = corners(data);
        surface.save();
        ResolvedStyle::preview().apply(surface);
        set_dashed(surface, options)?;
        stroke_quad(surface, &c.back, options);
        for side in c.sides() {
            stroke_quad(surface, &side, options);
        }
        stroke_quad(surface, &c.front, options);
        set_solid(surface)?;
        surface.restore();
        Ok(())
    }

    /// Front face plus a fixed margin; the tolerance argument is not used.
    fn hit_test(&self, element: &AnnotationElement, point: NormalizedPoint, _tolerance: f64) -> bool {
        match &element.data {
            ElementData::Box3D(data) => data.front.expanded(self.hit_margin).contains(point),
            _ => false,
        }
    }
}
