//! Convenience helpers for geometry tracking setup.
//!
//! This module provides [`GeometryTracker`], a wrapper around [`GeometryCache`]
//! that turns the geometry reports of a Slint node component into cache updates.
//!
//! # Example
//!
//! ```ignore
//! use slint_node_painter::GeometryTracker;
//!
//! let tracker = GeometryTracker::new();
//!
//! // Wire up callbacks (one-time setup)
//! window.on_node_rect_changed(tracker.node_rect_callback());
//! window.on_port_position_changed(tracker.port_position_callback());
//!
//! // Share the cache with the painter
//! let cache = tracker.cache();
//! ```

use crate::model::{NodeId, PortType};
use crate::state::GeometryCache;
use std::cell::RefCell;
use std::rc::Rc;

/// Raw port type used by Slint components: `1` input, `2` output.
pub fn port_type_from_raw(raw: i32) -> Option<PortType> {
    match raw {
        1 => Some(PortType::In),
        2 => Some(PortType::Out),
        _ => None,
    }
}

fn id_from_raw(raw: i32) -> Option<NodeId> {
    NodeId::try_from(raw).ok()
}

/// Shared [`GeometryCache`] with ready-to-use Slint callbacks.
///
/// Slint callbacks carry `i32` ids; reports with negative ids or an unknown
/// port type are dropped with a warning.
#[derive(Clone, Default)]
pub struct GeometryTracker {
    cache: Rc<RefCell<GeometryCache>>,
}

impl GeometryTracker {
    /// Create a new geometry tracker with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker wrapping an existing cache.
    ///
    /// Useful when you need to initialize the cache with data before
    /// connecting callbacks.
    pub fn with_cache(cache: Rc<RefCell<GeometryCache>>) -> Self {
        Self { cache }
    }

    /// Get a clone of the internal cache reference.
    pub fn cache(&self) -> Rc<RefCell<GeometryCache>> {
        self.cache.clone()
    }

    /// Get a callback for node rectangle updates.
    ///
    /// The callback signature matches the Slint callback
    /// `(id: int, x: length, y: length, width: length, height: length)`.
    pub fn node_rect_callback(&self) -> impl Fn(i32, f32, f32, f32, f32) + Clone {
        let cache = self.cache.clone();
        move |id, x, y, width, height| {
            let Some(id) = id_from_raw(id) else {
                log::warn!("ignoring rect report for invalid node id {id}");
                return;
            };
            cache.borrow_mut().update_node_rect(id, x, y, width, height);
        }
    }

    /// Get a callback for port position updates.
    ///
    /// The callback signature matches the Slint callback
    /// `(node_id: int, port_type: int, index: int, rel_x: length, rel_y: length)`.
    pub fn port_position_callback(&self) -> impl Fn(i32, i32, i32, f32, f32) + Clone {
        let cache = self.cache.clone();
        move |node_id, port_type, index, rel_x, rel_y| {
            let (Some(node), Some(kind), Some(index)) = (
                id_from_raw(node_id),
                port_type_from_raw(port_type),
                u32::try_from(index).ok(),
            ) else {
                log::warn!("ignoring port report ({node_id}, {port_type}, {index})");
                return;
            };
            cache
                .borrow_mut()
                .handle_port_report(node, kind, index, rel_x, rel_y);
        }
    }
}
