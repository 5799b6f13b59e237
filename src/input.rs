//! Input model: pointer events, modifier keys, keyboard keys, and the
//! per-gesture [`DrawingContext`] handed to drawers.
//!
//! The host surface converts device pixels to normalized coordinates before
//! events reach this crate; nothing here ever sees a pixel.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::element::AnnotationElement;
use crate::geometry::NormalizedPoint;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// A pointer event in normalized media coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position relative to the displayed media; may fall outside [0, 1].
    pub normalized: NormalizedPoint,
    /// Whether the pointer is over the displayed media.
    pub within_bounds: bool,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            normalized: NormalizedPoint::new(x, y),
            within_bounds: (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y),
            modifiers: Modifiers::default(),
        }
    }

    #[must_use]
    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    /// The event position clamped into the media.
    #[must_use]
    pub fn point(&self) -> NormalizedPoint {
        self.normalized.clamped()
    }
}

/// A keyboard key as reported by the host (e.g. `"Escape"`, `"r"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape" || self.0 == "Esc"
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Delete" || self.0 == "Backspace"
    }

    /// The single character of a printable key, if it is one.
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        let mut chars = self.0.chars();
        let c = chars.next()?;
        chars.next().is_none().then_some(c)
    }
}

/// Everything a drawer sees for one lifecycle callback.
///
/// Built fresh by the session for every event; drawers never keep it.
#[derive(Debug, Clone, Copy)]
pub struct DrawingContext<'a> {
    /// The event being handled.
    pub event: PointerEvent,
    /// Where the current drag started, for single-gesture drawers.
    pub start_point: Option<NormalizedPoint>,
    /// Points accumulated so far, for multi-click drawers.
    pub points: &'a [NormalizedPoint],
    /// Elements already on the media.
    pub elements: &'a [AnnotationElement],
}

impl<'a> DrawingContext<'a> {
    #[must_use]
    pub fn new(event: PointerEvent) -> Self {
        Self { event, start_point: None, points: &[], elements: &[] }
    }

    #[must_use]
    pub fn with_start(self, start: NormalizedPoint) -> Self {
        Self { start_point: Some(start), ..self }
    }

    #[must_use]
    pub fn with_points(self, points: &'a [NormalizedPoint]) -> Self {
        Self { points, ..self }
    }

    #[must_use]
    pub fn with_elements(self, elements: &'a [AnnotationElement]) -> Self {
        Self { elements, ..self }
    }

    /// Current pointer position, clamped into the media.
    #[must_use]
    pub fn current(&self) -> NormalizedPoint {
        self.event.point()
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.event.modifiers
    }
}
