//! Engine: wires the drawing session to the region store and renders the scene.
//!
//! `EngineCore` holds no browser handles, so the whole input-to-store loop
//! and the render pass can be driven headlessly (see the tests). [`Engine`]
//! binds a core to an `HtmlCanvasElement` and paints it.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::DrawerConfig;
use crate::consts::SELECTED_STROKE;
use crate::drawer::Transform;
use crate::element::{AnnotationElement, ElementId, ElementPatch};
use crate::error::{ElementError, RenderError};
use crate::geometry::NormalizedRect;
use crate::input::{Key, PointerEvent};
use crate::registry::DrawerRegistry;
use crate::render::{draw_vertex_handles, CanvasSurface, ImageRect, RenderOptions, RenderSurface};
use crate::session::{Action, DrawingSession, Mode};
use crate::store::RegionStore;

/// Core engine state: everything except the canvas element.
pub struct EngineCore {
    pub session: DrawingSession,
    pub store: RegionStore,
    registry: DrawerRegistry,
    asset_id: String,
    image_rect: ImageRect,
    zoom: f64,
}

impl EngineCore {
    /// Engine with the built-in drawers.
    #[must_use]
    pub fn new(config: DrawerConfig) -> Self {
        Self::with_registry(DrawerRegistry::with_builtins(&config), config)
    }

    #[must_use]
    pub fn with_registry(registry: DrawerRegistry, config: DrawerConfig) -> Self {
        Self {
            session: DrawingSession::new(registry.clone(), config),
            store: RegionStore::new(),
            registry,
            asset_id: String::new(),
            image_rect: ImageRect::new(0.0, 0.0, 0.0, 0.0),
            zoom: 1.0,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &DrawerRegistry {
        &self.registry
    }

    // --- View ---

    #[must_use]
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Switch the media being annotated. Any open gesture is cancelled.
    pub fn set_asset(&mut self, asset_id: &str) {
        if self.asset_id == asset_id {
            return;
        }
        self.session.reset();
        self.asset_id = asset_id.to_string();
    }

    /// Where the media is displayed, in screen pixels.
    pub fn set_image_rect(&mut self, rect: ImageRect) {
        self.image_rect = rect;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Render options for this frame, before per-element selection/hover.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions { zoom: self.zoom, ..RenderOptions::new(self.image_rect) }
    }

    // --- Tool ---

    pub fn set_mode(&mut self, mode: Mode) -> bool {
        self.session.set_mode(mode)
    }

    // --- Input ---

    pub fn on_pointer_down(&mut self, event: PointerEvent) -> Vec<Action> {
        let actions = self.session.on_pointer_down(event, self.store.elements(&self.asset_id));
        self.apply(actions)
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Vec<Action> {
        let actions = self.session.on_pointer_move(event, self.store.elements(&self.asset_id));
        self.apply(actions)
    }

    pub fn on_pointer_up(&mut self, event: PointerEvent) -> Vec<Action> {
        let actions = self.session.on_pointer_up(event, self.store.elements(&self.asset_id));
        self.apply(actions)
    }

    pub fn on_double_click(&mut self, event: PointerEvent) -> Vec<Action> {
        let actions = self.session.on_double_click(event, self.store.elements(&self.asset_id));
        self.apply(actions)
    }

    /// Escape and Delete go to the session; in select mode a drawer
    /// shortcut switches tools.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        let actions = self.session.on_key_down(key);
        if !actions.is_empty() {
            return self.apply(actions);
        }
        if self.session.mode() == &Mode::Select && !self.session.state().is_drawing() {
            if let Some(c) = key.as_char() {
                if self.session.select_by_shortcut(c) {
                    return vec![Action::SetCursor(self.session.cursor())];
                }
            }
        }
        Vec::new()
    }

    /// Write committed, edited and removed elements through to the store.
    fn apply(&mut self, actions: Vec<Action>) -> Vec<Action> {
        for action in &actions {
            match action {
                Action::ElementCommitted(draft) => {
                    self.store.insert(&self.asset_id, draft.clone());
                }
                Action::ElementUpdated { id, data } => {
                    self.store.update_data(&self.asset_id, *id, data.clone());
                }
                Action::ElementRemoved { id } => {
                    self.store.remove(&self.asset_id, *id);
                    self.session.forget(*id);
                }
                _ => {}
            }
        }
        actions
    }

    // --- Element edits ---

    /// Apply an affine edit through the element's drawer.
    pub fn transform_element(&mut self, id: ElementId, transform: &Transform) -> Option<Action> {
        let element = self.store.get(&self.asset_id, id)?;
        let drawer = self.registry.drawer_for(element.tool_type())?;
        let data = drawer.transform(element, transform);
        if !data.is_valid() {
            return None;
        }
        self.store.update_data(&self.asset_id, id, data.clone());
        Some(Action::ElementUpdated { id, data })
    }

    pub fn patch_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.store.patch(&self.asset_id, id, patch)
    }

    pub fn remove_element(&mut self, id: ElementId) -> bool {
        self.session.forget(id);
        self.store.remove(&self.asset_id, id).is_some()
    }

    // --- Queries ---

    #[must_use]
    pub fn elements(&self) -> &[AnnotationElement] {
        self.store.elements(&self.asset_id)
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&AnnotationElement> {
        self.store.get(&self.asset_id, id)
    }

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.session.selection()
    }

    /// Bounds of an element as computed by its drawer.
    #[must_use]
    pub fn bounds(&self, id: ElementId) -> Option<NormalizedRect> {
        let element = self.element(id)?;
        let drawer = self.registry.drawer_for(element.tool_type())?;
        Some(drawer.bounds(element))
    }

    /// # Errors
    ///
    /// See [`RegionStore::export_json`].
    pub fn export_json(&self) -> Result<String, ElementError> {
        self.store.export_json(&self.asset_id)
    }

    /// # Errors
    ///
    /// See [`RegionStore::import_json`].
    pub fn import_json(&mut self, raw: &str) -> Result<usize, ElementError> {
        let count = self.store.import_json(&self.asset_id, raw)?;
        self.session.reset();
        Ok(count)
    }

    pub fn clear(&mut self) -> usize {
        self.session.reset();
        self.store.clear(&self.asset_id)
    }

    // --- Render ---

    /// Draw every element of the current asset, then vertex handles for an
    /// element under edit, then the live preview.
    ///
    /// Elements whose tool type has no registered drawer are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns the first [`RenderError`] raised by the surface.
    pub fn render(&self, surface: &mut dyn RenderSurface) -> Result<(), RenderError> {
        let base = self.render_options();
        let selected = self.session.selection();
        let hovered = self.session.hovered();

        for element in self.elements() {
            let Some(drawer) = self.registry.drawer_for(element.tool_type()) else {
                tracing::warn!(
                    element_id = %element.id,
                    tool_type = element.tool_type().as_str(),
                    "no drawer registered for element; skipping"
                );
                continue;
            };
            let options = base
                .selected(selected == Some(element.id))
                .hovered(hovered == Some(element.id));
            drawer.render_element(element, surface, &options)?;
        }

        if let Some(editor) = self.session.editing() {
            draw_vertex_handles(surface, editor.points(), SELECTED_STROKE, &base)?;
        }

        if let Some(preview) = self.session.preview() {
            if let Some(drawer) = self.session.active_drawer() {
                drawer.render_preview(preview, surface, &base)?;
            }
        }
        Ok(())
    }
}

// =============================================================
// Engine
// =============================================================

/// An [`EngineCore`] bound to a browser canvas.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: DrawerConfig) -> Self {
        Self { canvas, core: EngineCore::new(config) }
    }

    // --- Delegated inputs ---

    pub fn set_asset(&mut self, asset_id: &str) {
        self.core.set_asset(asset_id);
    }

    pub fn set_image_rect(&mut self, rect: ImageRect) {
        self.core.set_image_rect(rect);
    }

    pub fn set_mode(&mut self, mode: Mode) -> bool {
        self.core.set_mode(mode)
    }

    pub fn on_pointer_down(&mut self, event: PointerEvent) -> Vec<Action> {
        self.core.on_pointer_down(event)
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Vec<Action> {
        self.core.on_pointer_move(event)
    }

    pub fn on_pointer_up(&mut self, event: PointerEvent) -> Vec<Action> {
        self.core.on_pointer_up(event)
    }

    pub fn on_double_click(&mut self, event: PointerEvent) -> Vec<Action> {
        self.core.on_double_click(event)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        self.core.on_key_down(key)
    }

    // --- Render ---

    /// Clear the canvas and draw the current scene.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ContextUnavailable`] if the canvas has no 2-D
    /// context, or the first failing canvas call.
    pub fn render(&self) -> Result<(), RenderError> {
        let ctx = self
            .canvas
            .get_context("2d")
            .map_err(|e| RenderError::Canvas(format!("{e:?}")))?
            .ok_or(RenderError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::ContextUnavailable)?;
        ctx.clear_rect(0.0, 0.0, f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        self.core.render(&mut CanvasSurface::new(&ctx))
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.core.selection()
    }

    #[must_use]
    pub fn elements(&self) -> &[AnnotationElement] {
        self.core.elements()
    }
}
