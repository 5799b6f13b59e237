//! Built-in drawers.
//!
//! | Id | Drawer | Gesture | Shortcut |
//! |----|--------|---------|----------|
//! | `rect` | [`rect::RectangleDrawer`] | drag | `r` |
//! | `polygon` | [`polygon::PolylineDrawer::polygon`] | multi-click | `p` |
//! | `path` | [`polygon::PolylineDrawer::path`] | multi-click | `s` |
//! | `box3d` | [`box3d::Box3DDrawer`] | drag | `b` |

pub mod box3d;
pub mod polygon;
pub mod rect;

use std::sync::Arc;

use crate::config::DrawerConfig;
use crate::registry::DrawerRegistry;

/// Register every built-in drawer, ordered rect, polygon, path, box.
pub fn register_builtins(registry: &DrawerRegistry, config: &DrawerConfig) {
    registry.register_with_priority(Arc::new(rect::RectangleDrawer::new(config)), 10);
    registry.register_with_priority(Arc::new(polygon::PolylineDrawer::polygon(config)), 20);
    registry.register_with_priority(Arc::new(polygon::PolylineDrawer::path(config)), 30);
    registry.register_with_priority(Arc::new(box3d::Box3DDrawer::new(config)), 40);
}
