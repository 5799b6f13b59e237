//! Vertex editing for completed polygons and paths.
//!
//! Entered from select mode by double-clicking a point-list element. A press
//! grabs the nearest vertex within the grab threshold; moves replace only
//! that vertex with the clamped pointer position; release ends the drag. A
//! press that lands on no vertex ends editing.

#[cfg(test)]
#[path = "vertex_test.rs"]
mod vertex_test;

use crate::element::{AnnotationElement, ElementData, ElementId, PolylineData};
use crate::geometry::{nearest_vertex, NormalizedPoint};

/// Result of a press while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexPress {
    /// Vertex at this index is now being dragged.
    Grabbed(usize),
    /// No vertex within reach; editing should end.
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexEditor {
    element_id: ElementId,
    data: ElementData,
    threshold: f64,
    dragging: Option<usize>,
}

/// `points` with index `index` replaced by `to` clamped to the unit square.
/// Out-of-range indices leave the list unchanged.
#[must_use]
pub fn move_vertex(points: &[NormalizedPoint], index: usize, to: NormalizedPoint) -> Vec<NormalizedPoint> {
    let mut out = points.to_vec();
    if let Some(p) = out.get_mut(index) {
        *p = to.clamped();
    }
    out
}

impl VertexEditor {
    /// Start editing `element`. Only polygons and paths have editable vertices.
    #[must_use]
    pub fn begin(element: &AnnotationElement, threshold: f64) -> Option<Self> {
        match &element.data {
            ElementData::Polygon(_) | ElementData::Path(_) => Some(Self {
                element_id: element.id,
                data: element.data.clone(),
                threshold,
                dragging: None,
            }),
            ElementData::Rect(_) | ElementData::Box3D(_) => None,
        }
    }

    #[must_use]
    pub fn element_id(&self) -> ElementId {
        self.element_id
    }

    /// Current geometry including any drags so far.
    #[must_use]
    pub fn data(&self) -> &ElementData {
        &self.data
    }

    #[must_use]
    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    #[must_use]
    pub fn points(&self) -> &[NormalizedPoint] {
        self.data.points().unwrap_or_default()
    }

    pub fn press(&mut self, point: NormalizedPoint) -> VertexPress {
        match nearest_vertex(self.points(), point, self.threshold) {
            Some(index) => {
                self.dragging = Some(index);
                VertexPress::Grabbed(index)
            }
            None => {
                self.dragging = None;
                VertexPress::Exit
            }
        }
    }

    /// Move the grabbed vertex. Returns the updated geometry, or `None` when
    /// no vertex is held.
    pub fn drag(&mut self, point: NormalizedPoint) -> Option<&ElementData> {
        let index = self.dragging?;
        let replace = |d: &PolylineData| PolylineData { points: move_vertex(&d.points, index, point), closed: d.closed };
        self.data = match &self.data {
            ElementData::Polygon(d) => ElementData::Polygon(replace(d)),
            ElementData::Path(d) => ElementData::Path(replace(d)),
            other => other.clone(),
        };
        Some(&self.data)
    }

    /// Release the grabbed vertex, if any.
    pub fn release(&mut self) {
        self.dragging = None;
    }
}
