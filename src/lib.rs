//! Pluggable region-annotation drawing for images and video frames.
//!
//! Annotation shapes (rectangles, polygons, smooth paths, perspective boxes)
//! are implemented as stateless [`drawer::Drawer`]s registered in a shared
//! [`registry::DrawerRegistry`]. A [`session::DrawingSession`] turns pointer
//! and keyboard input into lifecycle calls on the active drawer and reports
//! the outcome as [`session::Action`]s. All geometry is stored in normalized
//! `[0, 1]` media coordinates, so elements survive any display size.
//!
//! The crate compiles to WebAssembly for the browser. [`engine::EngineCore`]
//! holds no browser handles and is what the tests drive; [`engine::Engine`]
//! binds it to a canvas element, and [`wasm::RegionCanvas`] exposes that to
//! JavaScript.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`wasm`] | `#[wasm_bindgen]` bridge for browser hosts |
//! | [`session`] | Gesture state machine, selection, hover |
//! | [`registry`] | Shared, observable drawer registry |
//! | [`drawer`] | The drawer contract, results and affine transforms |
//! | [`drawers`] | Built-in rectangle, polygon, path and 3-D box drawers |
//! | [`vertex`] | Vertex editing of committed polygons and paths |
//! | [`element`] | Annotation element types and their JSON form |
//! | [`store`] | In-memory per-asset element store |
//! | [`geometry`] | Normalized points, rects, hit math, Catmull-Rom splines |
//! | [`input`] | Pointer/key events and the per-callback drawing context |
//! | [`render`] | Render surface abstraction, canvas and recording surfaces |
//! | [`config`] | Drawer tuning knobs |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric and color constants |

pub mod config;
pub mod consts;
pub mod drawer;
pub mod drawers;
pub mod element;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod registry;
pub mod render;
pub mod session;
pub mod store;
pub mod vertex;
pub mod wasm;
