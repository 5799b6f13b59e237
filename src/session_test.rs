#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::element::{PolylineData, RectData, ToolType};
use crate::geometry::NormalizedRect;
use crate::input::Modifiers;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> NormalizedPoint {
    NormalizedPoint::new(x, y)
}

fn at(x: f64, y: f64) -> PointerEvent {
    PointerEvent::at(x, y)
}

fn session() -> DrawingSession {
    let config = DrawerConfig::default();
    DrawingSession::new(DrawerRegistry::with_builtins(&config), config)
}

fn drawing(id: &str) -> DrawingSession {
    let mut s = session();
    assert!(s.set_mode(Mode::Draw(id.to_string())));
    s
}

fn make_element(data: ElementData) -> AnnotationElement {
    AnnotationElement {
        id: Uuid::new_v4(),
        label: "Zone".into(),
        note: None,
        style: None,
        created_at: 0,
        updated_at: 0,
        data,
    }
}

fn rect_el(x: f64, y: f64, w: f64, h: f64) -> AnnotationElement {
    make_element(ElementData::Rect(RectData { bounds: NormalizedRect::new(x, y, w, h) }))
}

fn square_polygon() -> AnnotationElement {
    make_element(ElementData::Polygon(PolylineData {
        points: vec![pt(0.2, 0.2), pt(0.8, 0.2), pt(0.8, 0.8), pt(0.2, 0.8)],
        closed: true,
    }))
}

fn committed(actions: &[Action]) -> Option<&ElementDraft> {
    actions.iter().find_map(|a| match a {
        Action::ElementCommitted(d) => Some(d),
        _ => None,
    })
}

fn click(s: &mut DrawingSession, x: f64, y: f64) -> Vec<Action> {
    let mut out = s.on_pointer_down(at(x, y), &[]);
    out.extend(s.on_pointer_up(at(x, y), &[]));
    out
}

// =============================================================
// Mode
// =============================================================

#[test]
fn starts_idle_in_select_mode() {
    let s = session();
    assert_eq!(s.mode(), &Mode::Select);
    assert_eq!(s.state(), &SessionState::Idle);
    assert_eq!(s.cursor(), "default");
}

#[test]
fn unknown_drawer_leaves_mode_unchanged() {
    let mut s = session();
    assert!(!s.set_mode(Mode::Draw("nope".into())));
    assert_eq!(s.mode(), &Mode::Select);
}

#[test]
fn disabled_drawer_cannot_be_chosen() {
    let mut s = session();
    s.registry().set_enabled("rect", false);
    assert!(!s.set_mode(Mode::Draw("rect".into())));
}

#[test]
fn shortcut_switches_drawer() {
    let mut s = session();
    assert!(s.select_by_shortcut('p'));
    assert_eq!(s.mode(), &Mode::Draw("polygon".into()));
    assert_eq!(s.cursor(), "crosshair");
    assert!(!s.select_by_shortcut('q'));
}

#[test]
fn switching_drawers_cancels_gesture() {
    let mut s = drawing("polygon");
    click(&mut s, 0.1, 0.1);
    assert!(s.state().is_drawing());
    assert!(s.set_mode(Mode::Draw("rect".into())));
    assert_eq!(s.state(), &SessionState::Idle);
    assert!(s.preview().is_none());
}

// =============================================================
// Drag gesture
// =============================================================

#[test]
fn rect_drag_commits_on_release() {
    let mut s = drawing("rect");
    let down = s.on_pointer_down(at(0.1, 0.1), &[]);
    assert!(down.contains(&Action::SetCursor("crosshair".into())));
    assert!(matches!(s.state(), SessionState::Dragging { .. }));

    let moved = s.on_pointer_move(at(0.3, 0.2), &[]);
    assert!(moved.iter().any(|a| matches!(a, Action::PreviewChanged(Some(_)))));

    let up = s.on_pointer_up(at(0.4, 0.3), &[]);
    let draft = committed(&up).unwrap();
    assert_eq!(draft.tool_type(), ToolType::Rect);
    let ElementData::Rect(d) = &draft.data else {
        panic!("expected rect data");
    };
    assert!((d.bounds.width - 0.3).abs() < 1e-9);
    assert!((d.bounds.height - 0.2).abs() < 1e-9);
    assert_eq!(s.state(), &SessionState::Committed);
    assert!(s.preview().is_none());
}

#[test]
fn tiny_drag_is_discarded() {
    let mut s = drawing("rect");
    s.on_pointer_down(at(0.1, 0.1), &[]);
    let up = s.on_pointer_up(at(0.1005, 0.1005), &[]);
    assert!(committed(&up).is_none());
    assert_eq!(s.state(), &SessionState::Idle);
}

#[test]
fn pointer_down_outside_media_is_ignored() {
    let mut s = drawing("rect");
    assert!(s.on_pointer_down(at(1.2, 0.5), &[]).is_empty());
    assert_eq!(s.state(), &SessionState::Idle);
}

#[test]
fn move_outside_media_is_clamped() {
    let mut s = drawing("rect");
    s.on_pointer_down(at(0.5, 0.5), &[]);
    let up = s.on_pointer_up(at(1.5, 1.5), &[]);
    let b = committed(&up).unwrap().data.bounds();
    assert!((b.right() - 1.0).abs() < 1e-12);
    assert!((b.bottom() - 1.0).abs() < 1e-12);
}

#[test]
fn box_drag_commits_box_data() {
    let mut s = drawing("box3d");
    s.on_pointer_down(at(0.2, 0.2), &[]);
    let ev = at(0.5, 0.4).with_modifiers(Modifiers { shift: true, ..Default::default() });
    let up = s.on_pointer_up(ev, &[]);
    let ElementData::Box3D(d) = &committed(&up).unwrap().data else {
        panic!("expected box data");
    };
    assert!((d.front.width - d.front.height).abs() < 1e-12);
}

#[test]
fn escape_cancels_drag() {
    let mut s = drawing("rect");
    s.on_pointer_down(at(0.1, 0.1), &[]);
    s.on_pointer_move(at(0.3, 0.3), &[]);
    let actions = s.on_key_down(&Key("Escape".into()));
    assert_eq!(actions, vec![Action::PreviewChanged(None), Action::RenderNeeded]);
    assert_eq!(s.state(), &SessionState::Cancelled);
    assert!(s.on_pointer_up(at(0.4, 0.4), &[]).is_empty());
}

// =============================================================
// Multi-click gesture
// =============================================================

#[test]
fn polygon_accumulates_then_completes_on_double_click() {
    let mut s = drawing("polygon");
    click(&mut s, 0.0, 0.0);
    click(&mut s, 1.0, 0.0);
    click(&mut s, 1.0, 1.0);
    click(&mut s, 0.005, 0.005);
    let SessionState::AccumulatingPoints { points } = s.state() else {
        panic!("expected accumulating");
    };
    assert_eq!(points.len(), 4);

    let actions = s.on_double_click(at(0.005, 0.005), &[]);
    let ElementData::Polygon(d) = &committed(&actions).unwrap().data else {
        panic!("expected polygon data");
    };
    assert!(d.closed);
    assert_eq!(d.points.len(), 4);
}

#[test]
fn double_click_repeat_press_is_not_appended() {
    let mut s = drawing("path");
    click(&mut s, 0.1, 0.1);
    click(&mut s, 0.5, 0.5);
    click(&mut s, 0.5, 0.5);
    let actions = s.on_double_click(at(0.5, 0.5), &[]);
    let ElementData::Path(d) = &committed(&actions).unwrap().data else {
        panic!("expected path data");
    };
    assert_eq!(d.points.len(), 2);
    assert!(!d.closed);
}

#[test]
fn single_point_double_click_keeps_collecting() {
    let mut s = drawing("polygon");
    click(&mut s, 0.3, 0.3);
    let actions = s.on_double_click(at(0.3, 0.3), &[]);
    assert!(committed(&actions).is_none());
    assert!(s.state().is_drawing());
}

#[test]
fn move_rubber_bands_to_cursor() {
    let mut s = drawing("polygon");
    click(&mut s, 0.1, 0.1);
    s.on_pointer_move(at(0.6, 0.4), &[]);
    assert_eq!(s.preview().unwrap().cursor, Some(pt(0.6, 0.4)));
}

#[test]
fn escape_clears_points() {
    let mut s = drawing("polygon");
    click(&mut s, 0.1, 0.1);
    click(&mut s, 0.4, 0.1);
    s.on_key_down(&Key("Escape".into()));
    assert_eq!(s.state(), &SessionState::Cancelled);
    click(&mut s, 0.7, 0.7);
    let SessionState::AccumulatingPoints { points } = s.state() else {
        panic!("expected accumulating");
    };
    assert_eq!(points, &vec![pt(0.7, 0.7)]);
}

// =============================================================
// Select mode
// =============================================================

#[test]
fn click_selects_topmost_element() {
    let mut s = session();
    let below = rect_el(0.1, 0.1, 0.5, 0.5);
    let above = rect_el(0.3, 0.3, 0.5, 0.5);
    let elements = vec![below.clone(), above.clone()];
    let actions = s.on_pointer_down(at(0.4, 0.4), &elements);
    assert_eq!(actions[0], Action::SelectionChanged(Some(above.id)));
    s.on_pointer_down(at(0.15, 0.15), &elements);
    assert_eq!(s.selection(), Some(below.id));
}

#[test]
fn click_on_empty_space_clears_selection() {
    let mut s = session();
    let el = rect_el(0.1, 0.1, 0.2, 0.2);
    let elements = vec![el.clone()];
    s.on_pointer_down(at(0.2, 0.2), &elements);
    let actions = s.on_pointer_down(at(0.9, 0.9), &elements);
    assert_eq!(actions[0], Action::SelectionChanged(None));
    assert_eq!(s.selection(), None);
}

#[test]
fn hover_tracks_element_under_pointer() {
    let mut s = session();
    let el = rect_el(0.1, 0.1, 0.2, 0.2);
    let elements = vec![el.clone()];
    let enter = s.on_pointer_move(at(0.2, 0.2), &elements);
    assert_eq!(enter[0], Action::HoverChanged(Some(el.id)));
    assert!(s.on_pointer_move(at(0.21, 0.2), &elements).is_empty());
    let leave = s.on_pointer_move(at(0.8, 0.8), &elements);
    assert_eq!(leave[0], Action::HoverChanged(None));
}

#[test]
fn delete_removes_selection() {
    let mut s = session();
    let el = rect_el(0.1, 0.1, 0.2, 0.2);
    s.on_pointer_down(at(0.2, 0.2), std::slice::from_ref(&el));
    let actions = s.on_key_down(&Key("Backspace".into()));
    assert_eq!(actions[0], Action::ElementRemoved { id: el.id });
    assert_eq!(s.selection(), None);
    assert!(s.on_key_down(&Key("Delete".into())).is_empty());
}

#[test]
fn forget_drops_selection_and_hover() {
    let mut s = session();
    let el = rect_el(0.1, 0.1, 0.2, 0.2);
    let elements = vec![el.clone()];
    s.on_pointer_move(at(0.2, 0.2), &elements);
    s.on_pointer_down(at(0.2, 0.2), &elements);
    s.forget(el.id);
    assert_eq!(s.selection(), None);
    assert_eq!(s.hovered(), None);
}

// =============================================================
// Vertex editing
// =============================================================

#[test]
fn double_click_polygon_enters_vertex_edit() {
    let mut s = session();
    let poly = square_polygon();
    let actions = s.on_double_click(at(0.5, 0.5), std::slice::from_ref(&poly));
    assert!(actions.contains(&Action::VertexEditStarted { id: poly.id }));
    assert!(matches!(s.state(), SessionState::EditingVertex(_)));
    assert_eq!(s.selection(), Some(poly.id));
}

#[test]
fn double_click_rect_does_not_edit() {
    let mut s = session();
    let el = rect_el(0.1, 0.1, 0.2, 0.2);
    assert!(s.on_double_click(at(0.2, 0.2), std::slice::from_ref(&el)).is_empty());
    assert_eq!(s.state(), &SessionState::Idle);
}

#[test]
fn vertex_drag_updates_only_that_vertex() {
    let mut s = session();
    let poly = square_polygon();
    let elements = vec![poly.clone()];
    s.on_double_click(at(0.5, 0.5), &elements);
    assert_eq!(s.on_pointer_down(at(0.81, 0.81), &elements), vec![Action::RenderNeeded]);
    let actions = s.on_pointer_move(at(0.9, 0.95), &elements);
    let Action::ElementUpdated { id, data: ElementData::Polygon(d) } = &actions[0] else {
        panic!("expected polygon update");
    };
    assert_eq!(*id, poly.id);
    assert_eq!(d.points[2], pt(0.9, 0.95));
    assert_eq!(d.points[0], pt(0.2, 0.2));
    assert_eq!(d.points[1], pt(0.8, 0.2));
    assert_eq!(d.points[3], pt(0.2, 0.8));

    assert!(s.on_pointer_up(at(0.9, 0.95), &elements).is_empty());
    assert!(s.on_pointer_move(at(0.5, 0.5), &elements).is_empty());
}

#[test]
fn click_off_vertices_exits_edit() {
    let mut s = session();
    let poly = square_polygon();
    let elements = vec![poly.clone()];
    s.on_double_click(at(0.5, 0.5), &elements);
    let actions = s.on_pointer_down(at(0.5, 0.5), &elements);
    assert_eq!(actions[0], Action::VertexEditEnded { id: poly.id });
    assert_eq!(s.state(), &SessionState::Idle);
}

#[test]
fn escape_exits_edit() {
    let mut s = session();
    let poly = square_polygon();
    s.on_double_click(at(0.5, 0.5), std::slice::from_ref(&poly));
    let actions = s.on_key_down(&Key("Escape".into()));
    assert_eq!(actions[0], Action::VertexEditEnded { id: poly.id });
    assert!(s.editing().is_none());
}
