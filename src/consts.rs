//! Shared numeric constants for the region-drawing crate.

// ── Gesture thresholds (normalized units) ───────────────────────

/// Both dimensions of a dragged shape must exceed this to commit.
pub const MIN_SHAPE_SIZE: f64 = 0.01;

/// First/last point distance below which a polygon or path closes itself.
pub const AUTO_CLOSE_DISTANCE: f64 = 0.02;

/// Maximum distance from a vertex for it to be grabbed in vertex-edit mode.
pub const VERTEX_GRAB_THRESHOLD: f64 = 0.03;

/// Default hit-test tolerance for selection clicks.
pub const HIT_TOLERANCE: f64 = 0.01;

/// Clicks closer than this to the previous point are not appended again.
pub const DUPLICATE_POINT_EPSILON: f64 = 1e-6;

// ── Curves ──────────────────────────────────────────────────────

/// Catmull-Rom tension; 0.5 is the centripetal-looking classic form.
pub const SPLINE_TENSION: f64 = 0.5;

/// Samples per spline segment when a curve is flattened to a polyline.
pub const SPLINE_SAMPLES: usize = 16;

// ── 3-D box ─────────────────────────────────────────────────────

/// Fraction of the front face projected toward the vanishing point.
pub const BOX_DEFAULT_DEPTH: f64 = 0.3;

/// Default vanishing point (center of the media).
pub const BOX_VANISHING_X: f64 = 0.5;
pub const BOX_VANISHING_Y: f64 = 0.5;

/// Margin added around the front face when hit-testing a box.
pub const BOX_HIT_MARGIN: f64 = 0.02;

// ── Styling (screen pixels / CSS colors) ────────────────────────

pub const DEFAULT_STROKE: &str = "#00C2FF";
pub const DEFAULT_FILL: &str = "rgba(0, 194, 255, 0.12)";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Stroke color used for the selection highlight.
pub const SELECTED_STROKE: &str = "#FFB020";

/// Stroke used for in-progress previews.
pub const PREVIEW_STROKE: &str = "#FFFFFF";

/// Dash pattern for previews and the hidden back face of a box.
pub const PREVIEW_DASH_PX: [f64; 2] = [6.0, 4.0];

/// Radius of vertex handles on selected shapes.
pub const HANDLE_RADIUS_PX: f64 = 4.0;

/// Extra line width applied to hovered shapes.
pub const HOVER_WIDTH_BOOST_PX: f64 = 1.0;

pub const LABEL_FONT: &str = "12px sans-serif";
pub const LABEL_OFFSET_PX: f64 = 4.0;
