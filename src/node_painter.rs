//! Pluggable node painting.
//!
//! [`NodePainter`] holds one draw step per [`Layer`] and runs them in the
//! fixed layer order. Applications customize the look by swapping or
//! disabling individual layers instead of reimplementing the whole node.
//!
//! ```ignore
//! let mut node_painter = NodePainter::new();
//! node_painter.set_enabled(Layer::EntryLabels, true);
//! node_painter.set_step(Layer::ResizeHandle, |ctx, painter| {
//!     // draw a square handle instead
//! });
//! ```

use std::fmt;
use std::rc::Rc;

use crate::layers::{Layer, PaintContext};
use crate::painter::Painter;

/// A draw step. Receives the node context and the backend painter.
pub type DrawStep = Rc<dyn Fn(&PaintContext<'_>, &mut dyn Painter)>;

#[derive(Clone)]
struct LayerEntry {
    layer: Layer,
    step: DrawStep,
    enabled: bool,
}

/// Table of draw steps keyed by layer, run in [`Layer::ALL`] order.
#[derive(Clone)]
pub struct NodePainter {
    entries: Vec<LayerEntry>,
}

impl Default for NodePainter {
    fn default() -> Self {
        Self::new()
    }
}

impl NodePainter {
    /// The stock look: every default step, entry labels off.
    pub fn new() -> Self {
        let entries = Layer::ALL
            .iter()
            .map(|&layer| LayerEntry {
                layer,
                step: Rc::new(layer.default_step()),
                enabled: layer.enabled_by_default(),
            })
            .collect();
        Self { entries }
    }

    /// Replace the draw step of one layer.
    pub fn set_step<F>(&mut self, layer: Layer, step: F)
    where
        F: Fn(&PaintContext<'_>, &mut dyn Painter) + 'static,
    {
        self.entries[layer.index()].step = Rc::new(step);
    }

    /// Restore the default draw step of one layer.
    pub fn reset_step(&mut self, layer: Layer) {
        self.entries[layer.index()].step = Rc::new(layer.default_step());
    }

    pub fn set_enabled(&mut self, layer: Layer, enabled: bool) {
        self.entries[layer.index()].enabled = enabled;
    }

    pub fn is_enabled(&self, layer: Layer) -> bool {
        self.entries[layer.index()].enabled
    }

    /// Enabled layers in paint order.
    pub fn enabled_layers(&self) -> impl Iterator<Item = Layer> + '_ {
        self.entries.iter().filter(|e| e.enabled).map(|e| e.layer)
    }

    /// Paint one node.
    pub fn paint(&self, ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
        for entry in self.entries.iter().filter(|e| e.enabled) {
            log::trace!("node {}: {}", ctx.node_id, entry.layer.name());
            (entry.step)(ctx, painter);
        }
    }
}

impl fmt::Debug for NodePainter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (e.layer.name(), e.enabled)))
            .finish()
    }
}
