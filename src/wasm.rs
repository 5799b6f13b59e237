//! JavaScript bridge: exposes [`Engine`] to a browser host.
//!
//! The host converts DOM pointer positions to normalized media coordinates
//! and forwards them here. Input handlers return `true` when the canvas
//! should be redrawn; the host then calls [`RegionCanvas::render`].
//! Modifier keys travel as a bit set (see [`modifiers_from_bits`]).

#[cfg(test)]
#[path = "wasm_test.rs"]
mod wasm_test;

use uuid::Uuid;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::config::DrawerConfig;
use crate::element::ElementPatch;
use crate::engine::Engine;
use crate::input::{Key, Modifiers, PointerEvent};
use crate::render::ImageRect;
use crate::session::{Action, Mode};

pub const MOD_SHIFT: u8 = 1;
pub const MOD_CTRL: u8 = 1 << 1;
pub const MOD_ALT: u8 = 1 << 2;
pub const MOD_META: u8 = 1 << 3;

/// Tool name that switches back to selection.
pub const SELECT_TOOL: &str = "select";

#[must_use]
pub fn modifiers_from_bits(bits: u8) -> Modifiers {
    Modifiers {
        shift: bits & MOD_SHIFT != 0,
        ctrl: bits & MOD_CTRL != 0,
        alt: bits & MOD_ALT != 0,
        meta: bits & MOD_META != 0,
    }
}

fn needs_render(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded | Action::SetCursor(_)))
}

fn event(x: f64, y: f64, modifiers: u8) -> PointerEvent {
    PointerEvent::at(x, y).with_modifiers(modifiers_from_bits(modifiers))
}

/// Canvas controller handed to JavaScript.
#[wasm_bindgen]
pub struct RegionCanvas {
    engine: Engine,
}

#[wasm_bindgen]
impl RegionCanvas {
    /// Bind to `canvas`. `config_json`, when given, overrides drawer defaults.
    ///
    /// # Errors
    ///
    /// Fails if `config_json` does not parse or holds out-of-range values.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<RegionCanvas, JsError> {
        let config = match config_json {
            Some(raw) => DrawerConfig::from_json(&raw)?,
            None => DrawerConfig::default(),
        };
        Ok(Self { engine: Engine::new(canvas, config) })
    }

    pub fn set_asset(&mut self, asset_id: &str) {
        self.engine.set_asset(asset_id);
    }

    /// Where the media is displayed inside the canvas, in canvas pixels.
    pub fn set_image_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.engine.set_image_rect(ImageRect::new(x, y, width, height));
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.engine.core.set_zoom(zoom);
    }

    /// Switch to a drawer by id, or to `"select"`. Returns whether the tool changed.
    pub fn set_tool(&mut self, tool: &str) -> bool {
        let mode = if tool == SELECT_TOOL { Mode::Select } else { Mode::Draw(tool.to_string()) };
        self.engine.set_mode(mode)
    }

    #[must_use]
    pub fn tool(&self) -> String {
        match self.engine.core.session.mode() {
            Mode::Select => SELECT_TOOL.to_string(),
            Mode::Draw(id) => id.clone(),
        }
    }

    #[must_use]
    pub fn cursor(&self) -> String {
        self.engine.core.session.cursor()
    }

    // --- Input ---

    pub fn pointer_down(&mut self, x: f64, y: f64, modifiers: u8) -> bool {
        needs_render(&self.engine.on_pointer_down(event(x, y, modifiers)))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, modifiers: u8) -> bool {
        needs_render(&self.engine.on_pointer_move(event(x, y, modifiers)))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, modifiers: u8) -> bool {
        needs_render(&self.engine.on_pointer_up(event(x, y, modifiers)))
    }

    pub fn double_click(&mut self, x: f64, y: f64, modifiers: u8) -> bool {
        needs_render(&self.engine.on_double_click(event(x, y, modifiers)))
    }

    /// `key` is a DOM `KeyboardEvent.key` value.
    pub fn key_down(&mut self, key: &str) -> bool {
        needs_render(&self.engine.on_key_down(&Key(key.to_string())))
    }

    // --- Elements ---

    /// Id of the selected element, if any.
    #[must_use]
    pub fn selection(&self) -> Option<String> {
        self.engine.selection().map(|id| id.to_string())
    }

    /// Rename an element of the current asset.
    ///
    /// # Errors
    ///
    /// Fails if `id` is not a UUID.
    pub fn set_label(&mut self, id: &str, label: &str) -> Result<bool, JsError> {
        let id = Uuid::parse_str(id)?;
        let patch = ElementPatch { label: Some(label.to_string()), ..ElementPatch::default() };
        Ok(self.engine.core.patch_element(id, &patch))
    }

    /// The current asset's elements as a JSON array.
    ///
    /// # Errors
    ///
    /// Fails if the elements cannot be serialized.
    pub fn export_json(&self) -> Result<String, JsError> {
        Ok(self.engine.core.export_json()?)
    }

    /// Replace the current asset's elements with an exported array.
    ///
    /// # Errors
    ///
    /// Fails if `raw` is not a valid export; the asset is left unchanged.
    pub fn import_json(&mut self, raw: &str) -> Result<usize, JsError> {
        Ok(self.engine.core.import_json(raw)?)
    }

    /// # Errors
    ///
    /// Fails if the canvas has no 2-D context or a canvas call fails.
    pub fn render(&self) -> Result<(), JsError> {
        Ok(self.engine.render()?)
    }
}
