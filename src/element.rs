//! Element model: the annotation shapes users draw, their data payloads, and
//! the draft/patch types exchanged with the region store.
//!
//! `ElementData` is the tagged union every render, hit-test and transform
//! site matches on. On the wire an element keeps the flat
//! `{id, toolType, label, ..., data}` layout, with `data` decoded according
//! to `toolType` (see [`ElementRecord`]).

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ElementError;
use crate::geometry::{NormalizedPoint, NormalizedRect};

/// Unique identifier for a committed annotation element.
pub type ElementId = Uuid;

/// The shape family an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Rect,
    Polygon,
    Path,
    #[serde(rename = "box3d")]
    Box3D,
}

impl ToolType {
    /// Wire name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Polygon => "polygon",
            Self::Path => "path",
            Self::Box3D => "box3d",
        }
    }

    /// Human-readable name used for default labels.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Rect => "Rectangle",
            Self::Polygon => "Polygon",
            Self::Path => "Path",
            Self::Box3D => "Box",
        }
    }
}

/// Optional per-element style overrides. Absent fields use drawer defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectData {
    pub bounds: NormalizedRect,
}

/// Point list shared by polygons and smooth paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineData {
    pub points: Vec<NormalizedPoint>,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Box3DData {
    pub front: NormalizedRect,
    pub vanishing_point: NormalizedPoint,
    /// Fraction in [0, 1] of the way from each front corner to the vanishing point.
    pub depth: f64,
}

/// Shape payload, discriminated by tool type.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementData {
    Rect(RectData),
    Polygon(PolylineData),
    Path(PolylineData),
    Box3D(Box3DData),
}

impl ElementData {
    #[must_use]
    pub fn tool_type(&self) -> ToolType {
        match self {
            Self::Rect(_) => ToolType::Rect,
            Self::Polygon(_) => ToolType::Polygon,
            Self::Path(_) => ToolType::Path,
            Self::Box3D(_) => ToolType::Box3D,
        }
    }

    /// Vertices of a polygon or path, `None` for other shapes.
    #[must_use]
    pub fn points(&self) -> Option<&[NormalizedPoint]> {
        match self {
            Self::Polygon(d) | Self::Path(d) => Some(&d.points),
            Self::Rect(_) | Self::Box3D(_) => None,
        }
    }

    /// Structural validity as required for a committed element.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let finite_rect = |r: &NormalizedRect| {
            [r.x, r.y, r.width, r.height].iter().all(|v| v.is_finite()) && r.width >= 0.0 && r.height >= 0.0
        };
        match self {
            Self::Rect(d) => finite_rect(&d.bounds),
            Self::Polygon(d) | Self::Path(d) => {
                d.points.len() >= 2 && d.points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
            }
            Self::Box3D(d) => {
                finite_rect(&d.front)
                    && (0.0..=1.0).contains(&d.depth)
                    && d.vanishing_point.x.is_finite()
                    && d.vanishing_point.y.is_finite()
            }
        }
    }

    /// Encode the payload alone, without its tag.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        let encoded = match self {
            Self::Rect(d) => serde_json::to_value(d),
            Self::Polygon(d) | Self::Path(d) => serde_json::to_value(d),
            Self::Box3D(d) => serde_json::to_value(d),
        };
        encoded.unwrap_or(serde_json::Value::Null)
    }

    /// Decode an untagged payload for the given tool type.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::InvalidData`] if the payload does not have the
    /// shape required by `tool_type`.
    pub fn from_value(tool_type: ToolType, value: serde_json::Value) -> Result<Self, ElementError> {
        let invalid = |e: serde_json::Error| ElementError::InvalidData {
            tool_type: tool_type.as_str(),
            message: e.to_string(),
        };
        Ok(match tool_type {
            ToolType::Rect => Self::Rect(serde_json::from_value(value).map_err(invalid)?),
            ToolType::Polygon => Self::Polygon(serde_json::from_value(value).map_err(invalid)?),
            ToolType::Path => Self::Path(serde_json::from_value(value).map_err(invalid)?),
            ToolType::Box3D => Self::Box3D(serde_json::from_value(value).map_err(invalid)?),
        })
    }
}

/// A committed annotation element as held by the region store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ElementRecord", try_from = "ElementRecord")]
pub struct AnnotationElement {
    pub id: ElementId,
    pub label: String,
    pub note: Option<String>,
    pub style: Option<ElementStyle>,
    /// Unix milliseconds.
    pub created_at: i64,
    /// Unix milliseconds.
    pub updated_at: i64,
    pub data: ElementData,
}

impl AnnotationElement {
    #[must_use]
    pub fn tool_type(&self) -> ToolType {
        self.data.tool_type()
    }

    /// Apply a sparse field patch. The geometry is left alone.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(label) = &patch.label {
            self.label.clone_from(label);
        }
        if let Some(note) = &patch.note {
            self.note.clone_from(note);
        }
        if let Some(style) = &patch.style {
            self.style.clone_from(style);
        }
    }
}

/// Flat wire layout of [`AnnotationElement`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: ElementId,
    pub tool_type: ToolType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ElementStyle>,
    pub created_at: i64,
    pub updated_at: i64,
    pub data: serde_json::Value,
}

impl From<AnnotationElement> for ElementRecord {
    fn from(el: AnnotationElement) -> Self {
        Self {
            id: el.id,
            tool_type: el.data.tool_type(),
            label: el.label,
            note: el.note,
            style: el.style,
            created_at: el.created_at,
            updated_at: el.updated_at,
            data: el.data.to_value(),
        }
    }
}

impl TryFrom<ElementRecord> for AnnotationElement {
    type Error = ElementError;

    fn try_from(rec: ElementRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: rec.id,
            label: rec.label,
            note: rec.note,
            style: rec.style,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
            data: ElementData::from_value(rec.tool_type, rec.data)?,
        })
    }
}

/// What the framework hands to the region store when a gesture completes.
/// The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DraftRecord", try_from = "DraftRecord")]
pub struct ElementDraft {
    pub data: ElementData,
    pub label: Option<String>,
    pub style: Option<ElementStyle>,
}

impl ElementDraft {
    #[must_use]
    pub fn new(data: ElementData) -> Self {
        Self { data, label: None, style: None }
    }

    #[must_use]
    pub fn tool_type(&self) -> ToolType {
        self.data.tool_type()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftRecord {
    tool_type: ToolType,
    data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<ElementStyle>,
}

impl From<ElementDraft> for DraftRecord {
    fn from(d: ElementDraft) -> Self {
        Self {
            tool_type: d.data.tool_type(),
            data: d.data.to_value(),
            label: d.label,
            style: d.style,
        }
    }
}

impl TryFrom<DraftRecord> for ElementDraft {
    type Error = ElementError;

    fn try_from(rec: DraftRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            data: ElementData::from_value(rec.tool_type, rec.data)?,
            label: rec.label,
            style: rec.style,
        })
    }
}

/// Sparse update for the user-editable fields of an element.
///
/// `note: Some(None)` clears the note; `style: Some(None)` drops overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub label: Option<String>,
    pub note: Option<Option<String>>,
    pub style: Option<Option<ElementStyle>>,
}
