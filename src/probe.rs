//! Connection-drag probe and proximity feedback.
//!
//! While the user drags a new connection, the gesture handler publishes a
//! [`PendingConnectionProbe`] into the scene's [`ProbeSlot`]. A repaint pass
//! takes the probe out of the slot exactly once and hands the same immutable
//! snapshot to every node it paints, so a node painted late in the pass sees
//! the same probe as one painted early.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::Point;
use crate::model::{NodeId, PortRef, PortType};

/// Distance below which a legal drop target grows.
pub const VALID_TARGET_THRESHOLD: f32 = 40.0;
/// Distance below which an illegal drop target shrinks.
pub const INVALID_TARGET_THRESHOLD: f32 = 80.0;

/// An in-progress drag-to-connect gesture over one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingConnectionProbe {
    /// The port the drag started from.
    pub anchor: PortRef,
    /// Node under the cursor, the only node that reacts to the probe.
    pub target_node: NodeId,
    /// Free end of the dragged connection, in scene coordinates.
    pub end_point: Point,
}

impl PendingConnectionProbe {
    pub fn new(anchor: PortRef, target_node: NodeId, end_point: Point) -> Self {
        Self { anchor, target_node, end_point }
    }

    /// Port type the free end needs to land on.
    pub fn required_port(&self) -> PortType {
        self.anchor.port_type.opposite()
    }
}

/// Scale factor of a connection point marker while a probe is active.
///
/// Legal targets grow up to 2x as the cursor approaches; illegal targets
/// shrink toward zero, and do so from farther away.
pub fn proximity_scale(possible: bool, dist: f32) -> f32 {
    if possible {
        if dist < VALID_TARGET_THRESHOLD {
            2.0 - dist / VALID_TARGET_THRESHOLD
        } else {
            1.0
        }
    } else if dist < INVALID_TARGET_THRESHOLD {
        dist / INVALID_TARGET_THRESHOLD
    } else {
        1.0
    }
}

/// Scene-scoped holder of the current probe.
///
/// Written by the gesture handler, drained by [`PaintController::begin_pass`].
/// Clones share the same slot.
///
/// [`PaintController::begin_pass`]: crate::PaintController::begin_pass
#[derive(Debug, Clone, Default)]
pub struct ProbeSlot {
    inner: Rc<RefCell<Option<PendingConnectionProbe>>>,
}

impl ProbeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a probe for the next repaint pass, replacing any unread one.
    pub fn set(&self, probe: PendingConnectionProbe) {
        *self.inner.borrow_mut() = Some(probe);
    }

    /// Drop an unread probe, e.g. when the drag is cancelled.
    pub fn clear(&self) {
        self.inner.borrow_mut().take();
    }

    pub fn is_set(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// Remove and return the probe. Called once per repaint pass.
    pub fn take(&self) -> Option<PendingConnectionProbe> {
        self.inner.borrow_mut().take()
    }
}
