//! Drawing session: the per-surface gesture state machine.
//!
//! The session owns everything that lives between pointer events: the mode
//! (select or draw with a given drawer), the active gesture, the live
//! preview, selection and hover. Each input handler consumes one event and
//! returns the [`Action`]s the host should apply. The session never mutates
//! elements itself; committed and edited geometry leaves as actions.
//!
//! States and transitions:
//!
//! | From | Event | To |
//! |------|-------|----|
//! | `Idle` | down, drag drawer | `Dragging` |
//! | `Idle` | down, multi-click drawer | `AccumulatingPoints` |
//! | `Idle` | double-click on polygon/path (select mode) | `EditingVertex` |
//! | `Dragging` | up, complete | `Committed` |
//! | `Dragging` | up, degenerate | `Idle` |
//! | `AccumulatingPoints` | down | `AccumulatingPoints` |
//! | `AccumulatingPoints` | double-click, complete | `Committed` |
//! | `Dragging` / `AccumulatingPoints` | Escape | `Cancelled` |
//! | `EditingVertex` | down off every vertex, or Escape | `Idle` |
//!
//! `Committed` and `Cancelled` behave like `Idle` for the next event.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use crate::config::DrawerConfig;
use crate::drawer::{Drawer, DrawingResult, GestureKind, Preview};
use crate::element::{AnnotationElement, ElementData, ElementDraft, ElementId};
use crate::geometry::NormalizedPoint;
use crate::input::{DrawingContext, Key, PointerEvent};
use crate::registry::DrawerRegistry;
use crate::vertex::{VertexEditor, VertexPress};

/// Side effects the host applies after an input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The live preview changed (or was cleared).
    PreviewChanged(Option<Preview>),
    /// A gesture finished; the store should insert this draft.
    ElementCommitted(ElementDraft),
    /// New geometry for an existing element.
    ElementUpdated { id: ElementId, data: ElementData },
    /// The user asked to delete an element.
    ElementRemoved { id: ElementId },
    SelectionChanged(Option<ElementId>),
    HoverChanged(Option<ElementId>),
    VertexEditStarted { id: ElementId },
    VertexEditEnded { id: ElementId },
    SetCursor(String),
    RenderNeeded,
}

/// What pointer input does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Hit-test, select and hover existing elements.
    #[default]
    Select,
    /// Draw with the drawer registered under this id.
    Draw(String),
}

/// The active gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// A single press-drag-release gesture is in progress.
    Dragging { start: NormalizedPoint },
    /// A multi-click gesture has collected these points.
    AccumulatingPoints { points: Vec<NormalizedPoint> },
    /// Editing vertices of a committed element.
    EditingVertex(VertexEditor),
    /// The last gesture was cancelled.
    Cancelled,
    /// The last gesture produced an element.
    Committed,
}

impl SessionState {
    /// A drawing gesture is open.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Dragging { .. } | Self::AccumulatingPoints { .. })
    }
}

pub struct DrawingSession {
    registry: DrawerRegistry,
    config: DrawerConfig,
    mode: Mode,
    state: SessionState,
    preview: Option<Preview>,
    selected: Option<ElementId>,
    hovered: Option<ElementId>,
}

impl DrawingSession {
    #[must_use]
    pub fn new(registry: DrawerRegistry, config: DrawerConfig) -> Self {
        Self {
            registry,
            config,
            mode: Mode::Select,
            state: SessionState::Idle,
            preview: None,
            selected: None,
            hovered: None,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.selected
    }

    #[must_use]
    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    #[must_use]
    pub fn registry(&self) -> &DrawerRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    /// Geometry under vertex edit, which supersedes the stored element while
    /// a drag is in flight.
    #[must_use]
    pub fn editing(&self) -> Option<&VertexEditor> {
        match &self.state {
            SessionState::EditingVertex(ed) => Some(ed),
            _ => None,
        }
    }

    /// Cursor the host should show for the current mode.
    #[must_use]
    pub fn cursor(&self) -> String {
        self.active_drawer()
            .map_or_else(|| "default".to_string(), |d| d.meta().cursor.clone())
    }

    /// The drawer bound to the current draw mode.
    #[must_use]
    pub fn active_drawer(&self) -> Option<Arc<dyn Drawer>> {
        match &self.mode {
            Mode::Draw(id) => self.registry.get(id),
            Mode::Select => None,
        }
    }

    // --- Mode ---

    /// Switch mode, cancelling any open gesture or vertex edit.
    ///
    /// Returns `false` and leaves the mode unchanged if `mode` names a
    /// drawer that is not registered or is disabled.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if let Mode::Draw(id) = &mode {
            let usable = self.registry.registration(id).is_some_and(|r| r.enabled);
            if !usable {
                return false;
            }
        }
        self.cancel_gesture();
        if matches!(mode, Mode::Draw(_)) {
            self.hovered = None;
        }
        self.state = SessionState::Idle;
        self.mode = mode;
        true
    }

    /// Select mode or the drawer bound to `key`. Returns whether the mode changed.
    pub fn select_by_shortcut(&mut self, key: char) -> bool {
        match self.registry.by_shortcut(key) {
            Some(drawer) => self.set_mode(Mode::Draw(drawer.meta().id.clone())),
            None => false,
        }
    }

    /// Abandon any gesture or vertex edit and clear selection and hover,
    /// keeping the current mode.
    pub fn reset(&mut self) {
        self.cancel_gesture();
        self.state = SessionState::Idle;
        self.selected = None;
        self.hovered = None;
    }

    /// Drop references to an element removed elsewhere.
    pub fn forget(&mut self, id: ElementId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.editing().is_some_and(|ed| ed.element_id() == id) {
            self.state = SessionState::Idle;
        }
    }

    // --- Input ---

    pub fn on_pointer_down(&mut self, event: PointerEvent, elements: &[AnnotationElement]) -> Vec<Action> {
        if !event.within_bounds {
            return Vec::new();
        }
        if let SessionState::EditingVertex(ed) = &mut self.state {
            return match ed.press(event.point()) {
                VertexPress::Grabbed(_) => vec![Action::RenderNeeded],
                VertexPress::Exit => self.end_vertex_edit(),
            };
        }
        match self.mode.clone() {
            Mode::Select => self.select_at(event.point(), elements),
            Mode::Draw(id) => self.draw_start(&id, event, elements),
        }
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent, elements: &[AnnotationElement]) -> Vec<Action> {
        let ctx = DrawingContext::new(event).with_elements(elements);
        match &mut self.state {
            SessionState::EditingVertex(ed) => {
                let id = ed.element_id();
                match ed.drag(event.point()) {
                    Some(data) => vec![Action::ElementUpdated { id, data: data.clone() }, Action::RenderNeeded],
                    None => Vec::new(),
                }
            }
            SessionState::Dragging { start } => {
                let start = *start;
                let Some(drawer) = self.active_drawer() else {
                    return Vec::new();
                };
                let result = drawer.on_draw_move(&ctx.with_start(start));
                self.show(result)
            }
            SessionState::AccumulatingPoints { points } => {
                let points = points.clone();
                let Some(drawer) = self.active_drawer() else {
                    return Vec::new();
                };
                let result = drawer.on_draw_move(&ctx.with_points(&points));
                self.show(result)
            }
            SessionState::Idle | SessionState::Cancelled | SessionState::Committed => {
                if self.mode == Mode::Select {
                    self.hover_at(event.point(), elements)
                } else {
                    Vec::new()
                }
            }
        }
    }

    pub fn on_pointer_up(&mut self, event: PointerEvent, elements: &[AnnotationElement]) -> Vec<Action> {
        let ctx = DrawingContext::new(event).with_elements(elements);
        match &mut self.state {
            SessionState::EditingVertex(ed) => {
                ed.release();
                Vec::new()
            }
            SessionState::Dragging { start } => {
                let start = *start;
                let Some(drawer) = self.active_drawer() else {
                    return self.discard();
                };
                let result = drawer.on_draw_end(&ctx.with_start(start));
                if result.complete {
                    self.commit(result)
                } else {
                    self.discard()
                }
            }
            SessionState::AccumulatingPoints { points } => {
                let points = points.clone();
                let Some(drawer) = self.active_drawer() else {
                    return self.discard();
                };
                let result = drawer.on_draw_end(&ctx.with_points(&points));
                if result.complete { self.commit(result) } else { self.show(result) }
            }
            SessionState::Idle | SessionState::Cancelled | SessionState::Committed => Vec::new(),
        }
    }

    pub fn on_double_click(&mut self, event: PointerEvent, elements: &[AnnotationElement]) -> Vec<Action> {
        match &self.state {
            SessionState::AccumulatingPoints { points } => {
                let points = points.clone();
                let Some(drawer) = self.active_drawer() else {
                    return self.discard();
                };
                let ctx = DrawingContext::new(event).with_points(&points).with_elements(elements);
                let result = drawer.on_draw_complete(&ctx);
                // An incomplete double-click keeps collecting points.
                if result.complete { self.commit(result) } else { Vec::new() }
            }
            SessionState::Idle | SessionState::Cancelled | SessionState::Committed
                if self.mode == Mode::Select && event.within_bounds =>
            {
                self.begin_vertex_edit(event.point(), elements)
            }
            _ => Vec::new(),
        }
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() {
            if self.editing().is_some() {
                return self.end_vertex_edit();
            }
            if self.state.is_drawing() {
                self.cancel_gesture();
                self.state = SessionState::Cancelled;
                return vec![Action::PreviewChanged(None), Action::RenderNeeded];
            }
            if self.selected.take().is_some() {
                return vec![Action::SelectionChanged(None), Action::RenderNeeded];
            }
            return Vec::new();
        }
        if key.is_delete() && self.mode == Mode::Select && self.editing().is_none() {
            if let Some(id) = self.selected.take() {
                if self.hovered == Some(id) {
                    self.hovered = None;
                }
                return vec![Action::ElementRemoved { id }, Action::SelectionChanged(None), Action::RenderNeeded];
            }
        }
        Vec::new()
    }

    // --- Select mode ---

    /// Topmost element under `point`; later elements are drawn on top.
    #[must_use]
    pub fn hit(&self, point: NormalizedPoint, elements: &[AnnotationElement]) -> Option<ElementId> {
        elements.iter().rev().find_map(|el| {
            let drawer = self.registry.drawer_for(el.tool_type())?;
            drawer.hit_test(el, point, self.config.hit_tolerance).then_some(el.id)
        })
    }

    fn select_at(&mut self, point: NormalizedPoint, elements: &[AnnotationElement]) -> Vec<Action> {
        let hit = self.hit(point, elements);
        if hit == self.selected {
            return Vec::new();
        }
        self.selected = hit;
        vec![Action::SelectionChanged(hit), Action::RenderNeeded]
    }

    fn hover_at(&mut self, point: NormalizedPoint, elements: &[AnnotationElement]) -> Vec<Action> {
        let hit = self.hit(point, elements);
        if hit == self.hovered {
            return Vec::new();
        }
        self.hovered = hit;
        vec![Action::HoverChanged(hit), Action::RenderNeeded]
    }

    fn begin_vertex_edit(&mut self, point: NormalizedPoint, elements: &[AnnotationElement]) -> Vec<Action> {
        let Some(id) = self.hit(point, elements) else {
            return Vec::new();
        };
        let Some(editor) = elements
            .iter()
            .find(|el| el.id == id)
            .and_then(|el| VertexEditor::begin(el, self.config.vertex_grab_threshold))
        else {
            return Vec::new();
        };
        tracing::debug!(element_id = %id, "vertex edit started");
        self.state = SessionState::EditingVertex(editor);
        let mut actions = Vec::new();
        if self.selected != Some(id) {
            self.selected = Some(id);
            actions.push(Action::SelectionChanged(Some(id)));
        }
        actions.push(Action::VertexEditStarted { id });
        actions.push(Action::RenderNeeded);
        actions
    }

    fn end_vertex_edit(&mut self) -> Vec<Action> {
        let SessionState::EditingVertex(ed) = std::mem::take(&mut self.state) else {
            return Vec::new();
        };
        let id = ed.element_id();
        tracing::debug!(element_id = %id, "vertex edit ended");
        vec![Action::VertexEditEnded { id }, Action::RenderNeeded]
    }

    // --- Draw mode ---

    fn draw_start(&mut self, drawer_id: &str, event: PointerEvent, elements: &[AnnotationElement]) -> Vec<Action> {
        let Some(drawer) = self.registry.get(drawer_id) else {
            return Vec::new();
        };
        let ctx = DrawingContext::new(event).with_elements(elements);
        match drawer.gesture() {
            GestureKind::Drag => {
                let start = event.point();
                self.state = SessionState::Dragging { start };
                let result = drawer.on_draw_start(&ctx.with_start(start));
                self.show(result)
            }
            GestureKind::MultiClick => {
                let existing = match &self.state {
                    SessionState::AccumulatingPoints { points } => points.clone(),
                    _ => Vec::new(),
                };
                let mut result = drawer.on_draw_start(&ctx.with_points(&existing));
                let points = result.points.take().unwrap_or(existing);
                self.state = SessionState::AccumulatingPoints { points };
                self.show(result)
            }
        }
    }

    /// Publish a pending result's preview and cursor.
    fn show(&mut self, result: DrawingResult) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(cursor) = result.cursor {
            actions.push(Action::SetCursor(cursor));
        }
        if result.preview != self.preview {
            self.preview = result.preview;
            actions.push(Action::PreviewChanged(self.preview.clone()));
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn commit(&mut self, result: DrawingResult) -> Vec<Action> {
        let Some(data) = result.element_data.filter(ElementData::is_valid) else {
            tracing::debug!("completed gesture produced invalid geometry; discarding");
            return self.discard();
        };
        tracing::debug!(tool_type = data.tool_type().as_str(), "gesture committed");
        self.state = SessionState::Committed;
        self.preview = None;
        vec![
            Action::ElementCommitted(ElementDraft::new(data)),
            Action::PreviewChanged(None),
            Action::RenderNeeded,
        ]
    }

    fn discard(&mut self) -> Vec<Action> {
        self.state = SessionState::Idle;
        if self.preview.take().is_some() {
            vec![Action::PreviewChanged(None), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Tell the drawer an open gesture is abandoned and drop the preview.
    fn cancel_gesture(&mut self) {
        if self.state.is_drawing() {
            if let Some(drawer) = self.active_drawer() {
                drawer.on_draw_cancel();
            }
        }
        self.preview = None;
    }
}
