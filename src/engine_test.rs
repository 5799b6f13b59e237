#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::HANDLE_RADIUS_PX;
use crate::drawer::Preview;
use crate::element::{ElementData, PolylineData, ToolType};
use crate::geometry::NormalizedPoint;
use crate::render::{DrawCommand, RecordingSurface};

// =============================================================
// Helpers
// =============================================================

const ASSET: &str = "clip-7/frame-120";

fn at(x: f64, y: f64) -> PointerEvent {
    PointerEvent::at(x, y)
}

fn engine() -> EngineCore {
    let mut core = EngineCore::new(DrawerConfig::default());
    core.set_asset(ASSET);
    core.set_image_rect(ImageRect::new(0.0, 0.0, 400.0, 200.0));
    core
}

fn draw_rect(core: &mut EngineCore, from: (f64, f64), to: (f64, f64)) -> ElementId {
    assert!(core.set_mode(Mode::Draw("rect".into())));
    core.on_pointer_down(at(from.0, from.1));
    core.on_pointer_move(at(to.0, to.1));
    core.on_pointer_up(at(to.0, to.1));
    core.elements().last().unwrap().id
}

/// A surface whose fallible calls all fail.
#[derive(Default)]
struct BrokenSurface {
    inner: RecordingSurface,
}

impl RenderSurface for BrokenSurface {
    fn save(&mut self) {
        self.inner.save();
    }
    fn restore(&mut self) {
        self.inner.restore();
    }
    fn begin_path(&mut self) {
        self.inner.begin_path();
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.inner.move_to(x, y);
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.inner.line_to(x, y);
    }
    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.inner.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }
    fn close_path(&mut self) {
        self.inner.close_path();
    }
    fn circle(&mut self, _x: f64, _y: f64, _radius: f64) -> Result<(), RenderError> {
        Err(RenderError::Canvas("arc rejected".into()))
    }
    fn fill(&mut self) {
        self.inner.fill();
    }
    fn stroke(&mut self) {
        self.inner.stroke();
    }
    fn set_stroke_style(&mut self, color: &str) {
        self.inner.set_stroke_style(color);
    }
    fn set_fill_style(&mut self, color: &str) {
        self.inner.set_fill_style(color);
    }
    fn set_line_width(&mut self, width: f64) {
        self.inner.set_line_width(width);
    }
    fn set_line_dash(&mut self, _segments: &[f64]) -> Result<(), RenderError> {
        Err(RenderError::Canvas("dash rejected".into()))
    }
    fn set_font(&mut self, font: &str) {
        self.inner.set_font(font);
    }
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64) -> Result<(), RenderError> {
        Err(RenderError::Canvas("text rejected".into()))
    }
}

// =============================================================
// Input to store
// =============================================================

#[test]
fn rect_gesture_lands_in_store() {
    let mut core = engine();
    let id = draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    assert_eq!(core.elements().len(), 1);
    let el = core.element(id).unwrap();
    assert_eq!(el.tool_type(), ToolType::Rect);
    assert_eq!(el.label, "Rectangle 1");
}

#[test]
fn degenerate_gesture_stores_nothing() {
    let mut core = engine();
    core.set_mode(Mode::Draw("rect".into()));
    core.on_pointer_down(at(0.1, 0.1));
    core.on_pointer_up(at(0.1005, 0.1005));
    assert!(core.elements().is_empty());
}

#[test]
fn polygon_gesture_lands_in_store() {
    let mut core = engine();
    core.set_mode(Mode::Draw("polygon".into()));
    for (x, y) in [(0.1, 0.1), (0.6, 0.1), (0.6, 0.6)] {
        core.on_pointer_down(at(x, y));
        core.on_pointer_up(at(x, y));
    }
    core.on_double_click(at(0.6, 0.6));
    let el = &core.elements()[0];
    assert_eq!(el.data.points().map(<[_]>::len), Some(3));
    assert_eq!(el.label, "Polygon 1");
}

#[test]
fn elements_are_scoped_to_asset() {
    let mut core = engine();
    draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    core.set_asset("other");
    assert!(core.elements().is_empty());
    core.set_asset(ASSET);
    assert_eq!(core.elements().len(), 1);
}

#[test]
fn vertex_drag_writes_through() {
    let mut core = engine();
    core.set_mode(Mode::Draw("polygon".into()));
    for (x, y) in [(0.2, 0.2), (0.8, 0.2), (0.8, 0.8), (0.2, 0.8)] {
        core.on_pointer_down(at(x, y));
        core.on_pointer_up(at(x, y));
    }
    core.on_double_click(at(0.2, 0.8));
    let id = core.elements()[0].id;

    core.set_mode(Mode::Select);
    core.on_double_click(at(0.8, 0.5));
    core.on_pointer_down(at(0.8, 0.8));
    core.on_pointer_move(at(0.9, 0.9));
    core.on_pointer_up(at(0.9, 0.9));

    let ElementData::Polygon(PolylineData { points, .. }) = &core.element(id).unwrap().data else {
        panic!("expected polygon");
    };
    assert_eq!(points[2], NormalizedPoint::new(0.9, 0.9));
    assert_eq!(points[0], NormalizedPoint::new(0.2, 0.2));
    assert_eq!(points.len(), 4);
}

#[test]
fn delete_key_removes_selected_element() {
    let mut core = engine();
    draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    core.set_mode(Mode::Select);
    core.on_pointer_down(at(0.2, 0.2));
    assert!(core.selection().is_some());
    core.on_key_down(&Key("Delete".into()));
    assert!(core.elements().is_empty());
    assert!(core.selection().is_none());
}

#[test]
fn shortcut_key_switches_tool_in_select_mode() {
    let mut core = engine();
    let actions = core.on_key_down(&Key("b".into()));
    assert_eq!(actions, vec![Action::SetCursor("crosshair".into())]);
    assert_eq!(core.session.mode(), &Mode::Draw("box3d".into()));
}

// =============================================================
// Edits
// =============================================================

#[test]
fn transform_element_moves_geometry() {
    let mut core = engine();
    let id = draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    let action = core.transform_element(id, &Transform::translate(0.2, 0.1)).unwrap();
    assert!(matches!(action, Action::ElementUpdated { .. }));
    let b = core.bounds(id).unwrap();
    assert!((b.x - 0.3).abs() < 1e-9);
    assert!((b.y - 0.2).abs() < 1e-9);
}

#[test]
fn patch_and_remove() {
    let mut core = engine();
    let id = draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    assert!(core.patch_element(id, &ElementPatch { label: Some("Door".into()), ..Default::default() }));
    assert_eq!(core.element(id).unwrap().label, "Door");
    assert!(core.remove_element(id));
    assert!(!core.remove_element(id));
}

#[test]
fn export_import_round_trip() {
    let mut core = engine();
    draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    let raw = core.export_json().unwrap();
    assert_eq!(core.clear(), 1);
    assert_eq!(core.import_json(&raw).unwrap(), 1);
    assert_eq!(core.elements().len(), 1);
}

// =============================================================
// Render
// =============================================================

#[test]
fn render_draws_elements_then_preview() {
    let mut core = engine();
    draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    core.on_pointer_down(at(0.5, 0.5));
    core.on_pointer_move(at(0.7, 0.7));

    let mut surface = RecordingSurface::new();
    core.render(&mut surface).unwrap();
    assert_eq!(surface.stroke_count(), 2);
    assert!(surface.used_dash());
    assert_eq!(surface.texts(), vec!["Rectangle 1"]);
    // screen mapping uses the image rect: x * 400, y * 200
    assert!(surface.commands.contains(&DrawCommand::MoveTo(40.0, 20.0)));
}

#[test]
fn render_skips_element_without_drawer() {
    let mut core = engine();
    draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    core.registry().unregister("rect");
    let mut surface = RecordingSurface::new();
    core.render(&mut surface).unwrap();
    assert_eq!(surface.stroke_count(), 0);
}

#[test]
fn render_failure_propagates() {
    let mut core = engine();
    draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    let mut surface = BrokenSurface::default();
    let err = core.render(&mut surface).unwrap_err();
    assert!(matches!(err, RenderError::Canvas(_)));
}

#[test]
fn repeated_renders_do_not_move_bounds() {
    let mut core = engine();
    let id = draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    core.set_mode(Mode::Draw("box3d".into()));
    core.on_pointer_down(at(0.5, 0.5));
    core.on_pointer_up(at(0.8, 0.9));
    let box_id = core.elements()[1].id;

    let before = (core.bounds(id).unwrap(), core.bounds(box_id).unwrap());
    for _ in 0..3 {
        core.render(&mut RecordingSurface::new()).unwrap();
    }
    let after = (core.bounds(id).unwrap(), core.bounds(box_id).unwrap());
    assert_eq!(before, after);
}

#[test]
fn selected_element_uses_selection_stroke() {
    let mut core = engine();
    draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    core.set_mode(Mode::Select);
    core.on_pointer_down(at(0.2, 0.2));
    let mut surface = RecordingSurface::new();
    core.render(&mut surface).unwrap();
    assert!(surface.commands.contains(&DrawCommand::StrokeStyle(SELECTED_STROKE.to_string())));
}

#[test]
fn preview_only_render_is_dashed() {
    let mut core = engine();
    core.set_mode(Mode::Draw("path".into()));
    core.on_pointer_down(at(0.1, 0.1));
    core.on_pointer_up(at(0.1, 0.1));
    core.on_pointer_move(at(0.5, 0.5));
    let preview: &Preview = core.session.preview().unwrap();
    assert_eq!(preview.tool_type(), ToolType::Path);
    let mut surface = RecordingSurface::new();
    core.render(&mut surface).unwrap();
    assert!(surface.used_dash());
}

#[test]
fn zoom_reaches_drawers() {
    let mut core = engine();
    draw_rect(&mut core, (0.1, 0.1), (0.4, 0.3));
    core.set_mode(Mode::Select);
    core.on_pointer_down(at(0.2, 0.2));
    core.set_zoom(4.0);
    let mut surface = RecordingSurface::new();
    core.render(&mut surface).unwrap();
    let radii: Vec<f64> = surface
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Circle { radius, .. } => Some(*radius),
            _ => None,
        })
        .collect();
    assert!(!radii.is_empty());
    assert!(radii.iter().all(|r| *r == HANDLE_RADIUS_PX / 4.0));
}
