//! In-memory region store: committed elements grouped by asset id.
//!
//! The drawing framework never persists anything. This store is the
//! reference collaborator that receives [`ElementDraft`]s, assigns ids,
//! timestamps and default labels, and supports JSON export and import per
//! asset. Elements keep insertion order, which is also draw order.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::element::{AnnotationElement, ElementData, ElementDraft, ElementId, ElementPatch};
use crate::error::ElementError;

/// Current wall-clock time in Unix milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(millis).unwrap_or(i64::MAX)
}

#[derive(Debug, Default)]
pub struct RegionStore {
    assets: HashMap<String, Vec<AnnotationElement>>,
}

impl RegionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements of an asset in draw order; empty for unknown assets.
    #[must_use]
    pub fn elements(&self, asset_id: &str) -> &[AnnotationElement] {
        self.assets.get(asset_id).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, asset_id: &str, id: ElementId) -> Option<&AnnotationElement> {
        self.elements(asset_id).iter().find(|el| el.id == id)
    }

    fn get_mut(&mut self, asset_id: &str, id: ElementId) -> Option<&mut AnnotationElement> {
        self.assets.get_mut(asset_id)?.iter_mut().find(|el| el.id == id)
    }

    /// Asset ids that currently hold at least one element, sorted.
    #[must_use]
    pub fn assets(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .assets
            .iter()
            .filter(|(_, els)| !els.is_empty())
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Store a completed draft and return the element it became.
    ///
    /// Unlabelled drafts are named `"<Tool name> <n>"`, where `n` counts the
    /// asset's elements of that tool type including this one.
    pub fn insert(&mut self, asset_id: &str, draft: ElementDraft) -> AnnotationElement {
        let now = now_millis();
        let elements = self.assets.entry(asset_id.to_string()).or_default();
        let tool_type = draft.tool_type();
        let label = draft.label.unwrap_or_else(|| {
            let n = elements.iter().filter(|el| el.tool_type() == tool_type).count() + 1;
            format!("{} {n}", tool_type.display_name())
        });
        let element = AnnotationElement {
            id: Uuid::new_v4(),
            label,
            note: None,
            style: draft.style,
            created_at: now,
            updated_at: now,
            data: draft.data,
        };
        tracing::debug!(asset_id, element_id = %element.id, tool_type = tool_type.as_str(), "element inserted");
        elements.push(element.clone());
        element
    }

    /// Replace an element's geometry. The tool type may not change.
    pub fn update_data(&mut self, asset_id: &str, id: ElementId, data: ElementData) -> bool {
        let Some(el) = self.get_mut(asset_id, id) else {
            return false;
        };
        if el.tool_type() != data.tool_type() {
            tracing::warn!(element_id = %id, "rejected geometry update that changes tool type");
            return false;
        }
        el.data = data;
        el.updated_at = now_millis();
        true
    }

    /// Apply direct field edits (label, note, style).
    pub fn patch(&mut self, asset_id: &str, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(el) = self.get_mut(asset_id, id) else {
            return false;
        };
        el.apply_patch(patch);
        el.updated_at = now_millis();
        true
    }

    pub fn remove(&mut self, asset_id: &str, id: ElementId) -> Option<AnnotationElement> {
        let elements = self.assets.get_mut(asset_id)?;
        let index = elements.iter().position(|el| el.id == id)?;
        tracing::debug!(asset_id, element_id = %id, "element removed");
        Some(elements.remove(index))
    }

    /// Drop every element of an asset. Returns how many were removed.
    pub fn clear(&mut self, asset_id: &str) -> usize {
        self.assets.remove(asset_id).map_or(0, |els| els.len())
    }

    /// Serialize an asset's elements as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::Encode`] if serialization fails.
    pub fn export_json(&self, asset_id: &str) -> Result<String, ElementError> {
        serde_json::to_string(self.elements(asset_id)).map_err(|e| ElementError::Encode(e.to_string()))
    }

    /// Replace an asset's elements with a previously exported JSON array.
    /// Returns the number of elements loaded. On error the asset is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::Decode`] if the document is not an array of
    /// elements or any element's `data` does not match its `toolType`,
    /// [`ElementError::InvalidData`] if decoded geometry could not have been
    /// committed, and [`ElementError::DuplicateId`] if an id repeats.
    pub fn import_json(&mut self, asset_id: &str, raw: &str) -> Result<usize, ElementError> {
        let elements: Vec<AnnotationElement> =
            serde_json::from_str(raw).map_err(|e| ElementError::Decode(e.to_string()))?;
        let mut seen = HashSet::with_capacity(elements.len());
        for el in &elements {
            if !el.data.is_valid() {
                return Err(ElementError::InvalidData {
                    tool_type: el.tool_type().as_str(),
                    message: format!("element {} has invalid geometry", el.id),
                });
            }
            if !seen.insert(el.id) {
                return Err(ElementError::DuplicateId(el.id));
            }
        }
        let count = elements.len();
        self.assets.insert(asset_id.to_string(), elements);
        Ok(count)
    }
}
