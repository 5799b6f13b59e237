//! Rendering: the 2-D surface abstraction drawers paint onto, shared styling
//! helpers, and the two surfaces shipped with the crate.
//!
//! Drawers never touch a browser API directly. They receive a
//! [`RenderSurface`] plus [`RenderOptions`] and map normalized geometry to
//! screen pixels through [`RenderOptions::to_screen`]. [`CanvasSurface`]
//! forwards to a [`web_sys::CanvasRenderingContext2d`]; [`RecordingSurface`]
//! captures commands for headless use and tests.
//!
//! Every fallible primitive returns `Result<(), RenderError>` and render
//! functions propagate failures to the caller; there is no fallback renderer.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{
    DEFAULT_FILL, DEFAULT_STROKE, DEFAULT_STROKE_WIDTH, HANDLE_RADIUS_PX, HOVER_WIDTH_BOOST_PX, LABEL_FONT,
    LABEL_OFFSET_PX, PREVIEW_DASH_PX, PREVIEW_STROKE, SELECTED_STROKE,
};
use crate::element::ElementStyle;
use crate::error::RenderError;
use crate::geometry::{CubicSegment, NormalizedPoint};

/// The path/fill/stroke/text primitives a drawer may use.
pub trait RenderSurface {
    fn save(&mut self);
    fn restore(&mut self);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64);
    fn close_path(&mut self);
    /// Full circle path element centered at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host rejects the arc.
    fn circle(&mut self, x: f64, y: f64, radius: f64) -> Result<(), RenderError>;
    fn fill(&mut self);
    fn stroke(&mut self);
    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    /// Set the dash pattern in screen pixels; an empty slice means solid.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host rejects the pattern.
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), RenderError>;
    fn set_font(&mut self, font: &str);
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host fails to draw the text.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError>;
}

// =============================================================
// Options and screen mapping
// =============================================================

/// The displayed media's rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ImageRect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Per-call render state passed to drawers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub is_selected: bool,
    pub is_hovered: bool,
    /// Current zoom factor of the host view (1.0 = no zoom).
    pub zoom: f64,
    pub image_rect: ImageRect,
}

impl RenderOptions {
    #[must_use]
    pub fn new(image_rect: ImageRect) -> Self {
        Self { is_selected: false, is_hovered: false, zoom: 1.0, image_rect }
    }

    #[must_use]
    pub fn selected(self, is_selected: bool) -> Self {
        Self { is_selected, ..self }
    }

    #[must_use]
    pub fn hovered(self, is_hovered: bool) -> Self {
        Self { is_hovered, ..self }
    }

    /// Screen size of `px` once the host view is zoomed, so handles and
    /// dashes keep a constant on-screen size. Non-positive zoom counts as 1.
    #[must_use]
    pub fn px(&self, px: f64) -> f64 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            px / self.zoom
        } else {
            px
        }
    }

    #[must_use]
    pub fn to_screen_x(&self, x: f64) -> f64 {
        self.image_rect.x + x * self.image_rect.width
    }

    #[must_use]
    pub fn to_screen_y(&self, y: f64) -> f64 {
        self.image_rect.y + y * self.image_rect.height
    }

    #[must_use]
    pub fn to_screen(&self, p: NormalizedPoint) -> (f64, f64) {
        (self.to_screen_x(p.x), self.to_screen_y(p.y))
    }
}

// =============================================================
// Styling
// =============================================================

/// Element style with drawer defaults and selection/hover state applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub stroke: String,
    pub fill: String,
    pub line_width: f64,
}

impl ResolvedStyle {
    #[must_use]
    pub fn for_element(style: Option<&ElementStyle>, options: &RenderOptions) -> Self {
        let stroke = if options.is_selected {
            SELECTED_STROKE.to_string()
        } else {
            style
                .and_then(|s| s.stroke_color.clone())
                .unwrap_or_else(|| DEFAULT_STROKE.to_string())
        };
        let fill = style
            .and_then(|s| s.fill_color.clone())
            .unwrap_or_else(|| DEFAULT_FILL.to_string());
        let base = style.and_then(|s| s.stroke_width).unwrap_or(DEFAULT_STROKE_WIDTH);
        let line_width = if options.is_hovered { base + HOVER_WIDTH_BOOST_PX } else { base };
        Self { stroke, fill, line_width }
    }

    /// Style for in-progress previews.
    #[must_use]
    pub fn preview() -> Self {
        Self {
            stroke: PREVIEW_STROKE.to_string(),
            fill: DEFAULT_FILL.to_string(),
            line_width: DEFAULT_STROKE_WIDTH,
        }
    }

    pub fn apply(&self, surface: &mut dyn RenderSurface) {
        surface.set_stroke_style(&self.stroke);
        surface.set_fill_style(&self.fill);
        surface.set_line_width(self.line_width);
    }
}

/// Switch the surface to the preview dash pattern.
///
/// # Errors
///
/// Propagates a rejected dash pattern from the surface.
pub fn set_dashed(surface: &mut dyn RenderSurface, options: &RenderOptions) -> Result<(), RenderError> {
    surface.set_line_dash(&PREVIEW_DASH_PX.map(|d| options.px(d)))
}

/// Restore solid strokes.
///
/// # Errors
///
/// Propagates a rejected dash pattern from the surface.
pub fn set_solid(surface: &mut dyn RenderSurface) -> Result<(), RenderError> {
    surface.set_line_dash(&[])
}

// =============================================================
// Path tracing
// =============================================================

/// Begin a path through `points` with straight edges.
pub fn trace_polyline(surface: &mut dyn RenderSurface, points: &[NormalizedPoint], closed: bool, options: &RenderOptions) {
    surface.begin_path();
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let (x, y) = options.to_screen(*first);
    surface.move_to(x, y);
    for p in rest {
        let (x, y) = options.to_screen(*p);
        surface.line_to(x, y);
    }
    if closed {
        surface.close_path();
    }
}

/// Begin a path along Bézier spans produced by the Catmull-Rom converter.
pub fn trace_curve(surface: &mut dyn RenderSurface, segments: &[CubicSegment], closed: bool, options: &RenderOptions) {
    surface.begin_path();
    let Some(first) = segments.first() else {
        return;
    };
    let (x, y) = options.to_screen(first.from);
    surface.move_to(x, y);
    for seg in segments {
        let (c1x, c1y) = options.to_screen(seg.ctrl1);
        let (c2x, c2y) = options.to_screen(seg.ctrl2);
        let (x, y) = options.to_screen(seg.to);
        surface.bezier_curve_to(c1x, c1y, c2x, c2y, x, y);
    }
    if closed {
        surface.close_path();
    }
}

/// Small filled circles at each vertex, used for selected shapes and previews.
///
/// # Errors
///
/// Propagates a failed arc from the surface.
pub fn draw_vertex_handles(
    surface: &mut dyn RenderSurface,
    points: &[NormalizedPoint],
    color: &str,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    surface.save();
    surface.set_fill_style(color);
    surface.set_stroke_style("#000000");
    surface.set_line_width(1.0);
    for p in points {
        let (x, y) = options.to_screen(*p);
        surface.begin_path();
        surface.circle(x, y, options.px(HANDLE_RADIUS_PX))?;
        surface.fill();
        surface.stroke();
    }
    surface.restore();
    Ok(())
}

/// Element label drawn just above `anchor` (usually the bounds' top-left).
///
/// # Errors
///
/// Propagates a failed text draw from the surface.
pub fn draw_label(
    surface: &mut dyn RenderSurface,
    label: &str,
    anchor: NormalizedPoint,
    color: &str,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    if label.is_empty() {
        return Ok(());
    }
    let (x, y) = options.to_screen(anchor);
    surface.save();
    surface.set_font(LABEL_FONT);
    surface.set_fill_style(color);
    surface.fill_text(label, x, y - LABEL_OFFSET_PX)?;
    surface.restore();
    Ok(())
}

// =============================================================
// Browser canvas
// =============================================================

/// [`RenderSurface`] over a browser 2-D canvas context.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

fn canvas_err(e: JsValue) -> RenderError {
    RenderError::Canvas(format!("{e:?}"))
}

impl RenderSurface for CanvasSurface<'_> {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.ctx.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) -> Result<(), RenderError> {
        self.ctx.move_to(x + radius, y);
        self.ctx.arc(x, y, radius, 0.0, 2.0 * PI).map_err(canvas_err)
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), RenderError> {
        let dash_array = js_sys::Array::new();
        for s in segments {
            dash_array.push(&(*s).into());
        }
        self.ctx.set_line_dash(&dash_array).map_err(canvas_err)
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError> {
        self.ctx.fill_text(text, x, y).map_err(canvas_err)
    }
}

// =============================================================
// Recording surface
// =============================================================

/// One captured drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    BezierTo { cp1: (f64, f64), cp2: (f64, f64), to: (f64, f64) },
    ClosePath,
    Circle { x: f64, y: f64, radius: f64 },
    Fill,
    Stroke,
    StrokeStyle(String),
    FillStyle(String),
    LineWidth(f64),
    LineDash(Vec<f64>),
    Font(String),
    Text { text: String, x: f64, y: f64 },
}

/// A surface that records every call, for headless rendering and tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `Stroke` commands issued.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Stroke)).count()
    }

    /// Whether any dashed pattern was set.
    #[must_use]
    pub fn used_dash(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, DrawCommand::LineDash(d) if !d.is_empty()))
    }

    /// Texts drawn, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.commands.push(DrawCommand::BezierTo { cp1: (cp1x, cp1y), cp2: (cp2x, cp2y), to: (x, y) });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Circle { x, y, radius });
        Ok(())
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeStyle(color.to_string()));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::FillStyle(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::LineDash(segments.to_vec()));
        Ok(())
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::Font(font.to_string()));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Text { text: text.to_string(), x, y });
        Ok(())
    }
}
