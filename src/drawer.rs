//! The drawer contract: what every annotation shape type implements.
//!
//! A drawer is stateless. The session owns gesture state and hands the
//! drawer a fresh [`DrawingContext`] per callback; the drawer answers with a
//! [`DrawingResult`] describing the preview to show or the element to commit.
//!
//! Which callbacks fire depends on the drawer's [`GestureKind`]:
//!
//! | Gesture | pointer-down | move | pointer-up | double-click |
//! |---------|--------------|------|------------|--------------|
//! | `Drag` | `on_draw_start` | `on_draw_move` | `on_draw_end` (commits) | ignored |
//! | `MultiClick` | `on_draw_start` (appends) | `on_draw_move` | `on_draw_end` | `on_draw_complete` (commits) |
//!
//! Escape calls `on_draw_cancel` in either case.

#[cfg(test)]
#[path = "drawer_test.rs"]
mod drawer_test;

use serde::{Deserialize, Serialize};

use crate::drawers::{box3d, polygon, rect};
use crate::element::{AnnotationElement, ElementData, ToolType};
use crate::error::RenderError;
use crate::geometry::{NormalizedPoint, NormalizedRect};
use crate::input::DrawingContext;
use crate::render::{RenderOptions, RenderSurface};

/// Grouping used by toolbars to lay out drawers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawerCategory {
    /// Axis-aligned shapes.
    Shape,
    /// Point-sequence shapes (polygons, curves).
    Freeform,
    /// Projected 3-D shapes.
    Perspective,
}

/// How pointer input maps onto a drawer's lifecycle callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// One press-drag-release produces the shape.
    Drag,
    /// Each press adds a point; double-click finishes.
    MultiClick,
}

/// Static description of a drawer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawerMeta {
    /// Registry key; unique among registered drawers.
    pub id: String,
    pub name: String,
    pub category: DrawerCategory,
    /// Single-character keyboard shortcut.
    pub shortcut: char,
    pub tool_type: ToolType,
    /// CSS cursor shown while the drawer is active.
    pub cursor: String,
}

/// The in-progress shape shown while a gesture is active.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub data: ElementData,
    /// Live pointer position, for drawers that rubber-band to the cursor.
    pub cursor: Option<NormalizedPoint>,
}

impl Preview {
    #[must_use]
    pub fn tool_type(&self) -> ToolType {
        self.data.tool_type()
    }
}

/// What a lifecycle callback asks the session to do next.
///
/// When `complete` is true `element_data` is present; the constructors keep
/// that invariant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawingResult {
    pub complete: bool,
    pub element_data: Option<ElementData>,
    pub preview: Option<Preview>,
    pub cursor: Option<String>,
    /// Replacement point list for multi-click gestures.
    pub points: Option<Vec<NormalizedPoint>>,
}

impl DrawingResult {
    /// Gesture continues, showing `preview`.
    #[must_use]
    pub fn pending(preview: Preview) -> Self {
        Self { preview: Some(preview), ..Self::default() }
    }

    /// Gesture finished with a shape to commit.
    #[must_use]
    pub fn completed(data: ElementData) -> Self {
        Self { complete: true, element_data: Some(data), ..Self::default() }
    }

    /// Gesture produced nothing (degenerate geometry or nothing to do).
    #[must_use]
    pub fn discarded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_points(self, points: Vec<NormalizedPoint>) -> Self {
        Self { points: Some(points), ..self }
    }

    #[must_use]
    pub fn with_cursor(self, cursor: &str) -> Self {
        Self { cursor: Some(cursor.to_string()), ..self }
    }
}

/// Scale about a fixed origin, independently per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub sx: f64,
    pub sy: f64,
    pub origin: NormalizedPoint,
}

/// Rotation about a fixed origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotate {
    pub radians: f64,
    pub origin: NormalizedPoint,
}

/// An affine edit. Components apply in the order scale, rotate, translate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub translate: Option<(f64, f64)>,
    pub scale: Option<Scale>,
    pub rotate: Option<Rotate>,
}

impl Transform {
    #[must_use]
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self { translate: Some((dx, dy)), ..Self::default() }
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64, origin: NormalizedPoint) -> Self {
        Self { scale: Some(Scale { sx, sy, origin }), ..Self::default() }
    }

    #[must_use]
    pub fn rotate(radians: f64, origin: NormalizedPoint) -> Self {
        Self { rotate: Some(Rotate { radians, origin }), ..Self::default() }
    }

    /// Map a single point.
    #[must_use]
    pub fn apply_point(&self, p: NormalizedPoint) -> NormalizedPoint {
        let mut out = p;
        if let Some(s) = self.scale {
            out = out.scaled_about(s.origin, s.sx, s.sy);
        }
        if let Some(r) = self.rotate {
            out = out.rotated_about(r.origin, r.radians);
        }
        if let Some((dx, dy)) = self.translate {
            out = out.translated(dx, dy);
        }
        out
    }

    /// Map an axis-aligned rect, keeping it axis-aligned.
    #[must_use]
    pub fn apply_rect(&self, r: &NormalizedRect) -> NormalizedRect {
        let mut out = *r;
        if let Some(s) = self.scale {
            out = out.scaled_about(s.origin, s.sx, s.sy);
        }
        if let Some(rot) = self.rotate {
            out = out.rotated_bounds(rot.origin, rot.radians);
        }
        if let Some((dx, dy)) = self.translate {
            out = out.translated(dx, dy);
        }
        out
    }
}

/// One annotation shape type.
pub trait Drawer: Send + Sync {
    fn meta(&self) -> &DrawerMeta;

    fn gesture(&self) -> GestureKind;

    /// Pointer-down.
    fn on_draw_start(&self, ctx: &DrawingContext<'_>) -> DrawingResult;

    /// Pointer-move while a gesture is active. Must depend only on the context.
    fn on_draw_move(&self, ctx: &DrawingContext<'_>) -> DrawingResult;

    /// Pointer-up.
    fn on_draw_end(&self, ctx: &DrawingContext<'_>) -> DrawingResult;

    /// Double-click; only multi-click drawers finish here.
    fn on_draw_complete(&self, _ctx: &DrawingContext<'_>) -> DrawingResult {
        DrawingResult::discarded()
    }

    /// Escape. Built-in drawers hold no state, so the default does nothing.
    fn on_draw_cancel(&self) {}

    /// Draw a committed element.
    ///
    /// # Errors
    ///
    /// Propagates any failure from the surface.
    fn render_element(
        &self,
        element: &AnnotationElement,
        surface: &mut dyn RenderSurface,
        options: &RenderOptions,
    ) -> Result<(), RenderError>;

    /// Draw the in-progress shape with preview styling.
    ///
    /// # Errors
    ///
    /// Propagates any failure from the surface.
    fn render_preview(
        &self,
        preview: &Preview,
        surface: &mut dyn RenderSurface,
        options: &RenderOptions,
    ) -> Result<(), RenderError>;

    fn hit_test(&self, element: &AnnotationElement, point: NormalizedPoint, tolerance: f64) -> bool;

    fn bounds(&self, element: &AnnotationElement) -> NormalizedRect {
        element.data.bounds()
    }

    fn transform(&self, element: &AnnotationElement, transform: &Transform) -> ElementData {
        element.data.transformed(transform)
    }
}

// =============================================================
// Shape dispatch
// =============================================================

impl ElementData {
    /// Axis-aligned box around the stored control points.
    ///
    /// For a smooth path this can be smaller than the drawn curve; use
    /// [`Drawer::bounds`] for the rendered extent.
    #[must_use]
    pub fn bounds(&self) -> NormalizedRect {
        match self {
            Self::Rect(d) => d.bounds,
            Self::Polygon(d) | Self::Path(d) => polygon::bounds(&d.points),
            Self::Box3D(d) => box3d::bounds(d),
        }
    }

    /// Geometry after `transform`; the variant is preserved.
    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        match self {
            Self::Rect(d) => Self::Rect(rect::transformed(d, transform)),
            Self::Polygon(d) => Self::Polygon(polygon::transformed(d, transform)),
            Self::Path(d) => Self::Path(polygon::transformed(d, transform)),
            Self::Box3D(d) => Self::Box3D(box3d::transformed(d, transform)),
        }
    }
}
