#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;

fn pt(x: f64, y: f64) -> NormalizedPoint {
    NormalizedPoint::new(x, y)
}

fn make_element(data: ElementData) -> AnnotationElement {
    AnnotationElement {
        id: Uuid::new_v4(),
        label: "Region 1".into(),
        note: None,
        style: None,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
        data,
    }
}

// =============================================================
// ToolType
// =============================================================

#[test]
fn tool_type_serde_names() {
    assert_eq!(serde_json::to_string(&ToolType::Rect).unwrap(), "\"rect\"");
    assert_eq!(serde_json::to_string(&ToolType::Polygon).unwrap(), "\"polygon\"");
    assert_eq!(serde_json::to_string(&ToolType::Path).unwrap(), "\"path\"");
    assert_eq!(serde_json::to_string(&ToolType::Box3D).unwrap(), "\"box3d\"");
}

#[test]
fn tool_type_as_str_matches_serde() {
    for t in [ToolType::Rect, ToolType::Polygon, ToolType::Path, ToolType::Box3D] {
        let wire = serde_json::to_value(t).unwrap();
        assert_eq!(wire.as_str(), Some(t.as_str()));
    }
}

// =============================================================
// ElementData
// =============================================================

#[test]
fn data_reports_its_tool_type() {
    let poly = PolylineData { points: vec![pt(0.0, 0.0), pt(1.0, 1.0)], closed: false };
    assert_eq!(ElementData::Polygon(poly.clone()).tool_type(), ToolType::Polygon);
    assert_eq!(ElementData::Path(poly).tool_type(), ToolType::Path);
}

#[test]
fn polyline_with_one_point_is_invalid() {
    let data = ElementData::Path(PolylineData { points: vec![pt(0.5, 0.5)], closed: false });
    assert!(!data.is_valid());
}

#[test]
fn box_depth_outside_unit_range_is_invalid() {
    let data = ElementData::Box3D(Box3DData {
        front: NormalizedRect::new(0.1, 0.1, 0.2, 0.2),
        vanishing_point: pt(0.5, 0.5),
        depth: 1.5,
    });
    assert!(!data.is_valid());
}

#[test]
fn negative_rect_is_invalid() {
    let data = ElementData::Rect(RectData { bounds: NormalizedRect::new(0.1, 0.1, -0.2, 0.2) });
    assert!(!data.is_valid());
}

#[test]
fn points_only_for_polylines() {
    let rect = ElementData::Rect(RectData { bounds: NormalizedRect::new(0.0, 0.0, 0.1, 0.1) });
    assert!(rect.points().is_none());
    let poly = ElementData::Polygon(PolylineData { points: vec![pt(0.0, 0.0), pt(0.2, 0.2)], closed: true });
    assert_eq!(poly.points().map(<[_]>::len), Some(2));
}

// =============================================================
// AnnotationElement wire layout
// =============================================================

#[test]
fn element_serializes_flat_with_tool_type() {
    let el = make_element(ElementData::Rect(RectData { bounds: NormalizedRect::new(0.1, 0.1, 0.3, 0.2) }));
    let v = serde_json::to_value(&el).unwrap();
    assert_eq!(v["toolType"], "rect");
    assert_eq!(v["label"], "Region 1");
    assert_eq!(v["createdAt"], 1_700_000_000_000_i64);
    assert_eq!(v["data"]["bounds"]["width"], 0.3);
    assert!(v.get("note").is_none());
}

#[test]
fn box_element_uses_camel_case_payload() {
    let el = make_element(ElementData::Box3D(Box3DData {
        front: NormalizedRect::new(0.0, 0.0, 0.5, 0.5),
        vanishing_point: pt(1.0, 0.0),
        depth: 0.5,
    }));
    let v = serde_json::to_value(&el).unwrap();
    assert_eq!(v["toolType"], "box3d");
    assert_eq!(v["data"]["vanishingPoint"]["x"], 1.0);
}

#[test]
fn element_roundtrips_through_json() {
    let el = make_element(ElementData::Path(PolylineData {
        points: vec![pt(0.1, 0.2), pt(0.3, 0.4), pt(0.5, 0.1)],
        closed: false,
    }));
    let s = serde_json::to_string(&el).unwrap();
    let back: AnnotationElement = serde_json::from_str(&s).unwrap();
    assert_eq!(back, el);
}

#[test]
fn element_with_mismatched_payload_fails_to_decode() {
    let raw = json!({
        "id": Uuid::new_v4(),
        "toolType": "rect",
        "label": "bad",
        "createdAt": 0,
        "updatedAt": 0,
        "data": { "points": [], "closed": false },
    });
    let err = serde_json::from_value::<AnnotationElement>(raw).unwrap_err();
    assert!(err.to_string().contains("invalid rect data"));
}

#[test]
fn element_with_unknown_tool_type_fails_to_decode() {
    let raw = json!({
        "id": Uuid::new_v4(),
        "toolType": "ellipse",
        "label": "bad",
        "createdAt": 0,
        "updatedAt": 0,
        "data": {},
    });
    assert!(serde_json::from_value::<AnnotationElement>(raw).is_err());
}

// =============================================================
// ElementDraft / ElementPatch
// =============================================================

#[test]
fn draft_wire_layout() {
    let draft = ElementDraft::new(ElementData::Polygon(PolylineData {
        points: vec![pt(0.0, 0.0), pt(0.5, 0.5)],
        closed: true,
    }));
    let v = serde_json::to_value(&draft).unwrap();
    assert_eq!(v["toolType"], "polygon");
    assert_eq!(v["data"]["closed"], true);
    assert!(v.get("label").is_none());
}

#[test]
fn patch_updates_only_present_fields() {
    let mut el = make_element(ElementData::Rect(RectData { bounds: NormalizedRect::new(0.0, 0.0, 0.1, 0.1) }));
    let before = el.data.clone();
    el.apply_patch(&ElementPatch { note: Some(Some("check this".into())), ..Default::default() });
    assert_eq!(el.label, "Region 1");
    assert_eq!(el.note.as_deref(), Some("check this"));
    assert_eq!(el.data, before);

    el.apply_patch(&ElementPatch { label: Some("Door".into()), note: Some(None), ..Default::default() });
    assert_eq!(el.label, "Door");
    assert!(el.note.is_none());
}
