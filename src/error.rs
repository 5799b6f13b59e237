//! Error types.
//!
//! Degenerate gestures and unknown drawer ids are deliberately absent here:
//! the former surface as an incomplete [`crate::drawer::DrawingResult`], the
//! latter as `None` from registry lookups.

/// Errors produced while loading or validating a [`crate::config::DrawerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),

    /// A numeric field is outside its allowed range.
    #[error("config field {field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Errors produced by a render call.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The host could not provide a 2-D drawing context.
    #[error("2d rendering context unavailable")]
    ContextUnavailable,

    /// A drawing primitive failed on the host surface.
    #[error("canvas call failed: {0}")]
    Canvas(String),
}

/// Errors produced while decoding a stored annotation element.
#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    /// The `data` payload does not match the shape required by `toolType`.
    #[error("invalid {tool_type} data: {message}")]
    InvalidData { tool_type: &'static str, message: String },

    /// A persisted export could not be parsed.
    #[error("element decode failed: {0}")]
    Decode(String),

    /// Two elements in one import share an id.
    #[error("duplicate element id: {0}")]
    DuplicateId(uuid::Uuid),

    /// Elements could not be serialized for export.
    #[error("element encode failed: {0}")]
    Encode(String),
}
