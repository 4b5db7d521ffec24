//! High-level controller tying geometry, interaction and painting together.
//!
//! The [`PaintController`] owns the scene-side state the painter consults
//! (geometry cache, hover/selection, the connection-drag probe, parsed
//! styles and cached icons) and runs repaint passes over a [`GraphModel`].
//!
//! # Example
//!
//! ```ignore
//! use slint_node_painter::{FsAssetSource, PaintController};
//!
//! let ctrl = PaintController::new(FsAssetSource::new("assets"));
//! let tracker = ctrl.tracker();
//!
//! // Geometry tracking
//! window.on_node_rect_changed(tracker.node_rect_callback());
//! window.on_port_position_changed(tracker.port_position_callback());
//!
//! // Pointer handling drives hover and the connection-drag probe
//! window.on_pointer_moved({
//!     let ctrl = ctrl.clone();
//!     move |x, y| ctrl.handle_pointer_move(x, y)
//! });
//!
//! // Repaint: one pass per frame, one painter per node
//! let mut pass = ctrl.begin_pass(&graph);
//! for node in graph.node_ids() {
//!     pass.paint_node(node, &mut canvas.node_painter(node));
//! }
//! pass.finish();
//! ```

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::geometry::{LayoutMetrics, NodeLayout, Point, Rect};
use crate::icons::{AssetSource, IconCache};
use crate::interaction::InteractionState;
use crate::layers::PaintContext;
use crate::model::{make_complete_connection_id, ConnectionId, GraphModel, NodeId, PortRef};
use crate::node_painter::NodePainter;
use crate::painter::Painter;
use crate::probe::{PendingConnectionProbe, ProbeSlot, INVALID_TARGET_THRESHOLD};
use crate::state::GeometryCache;
use crate::style::{ConnectionStyle, NodeStyle, StyleCache};
use crate::tracking::GeometryTracker;
use crate::visual_state::{classify, HoverWidthPolicy};

/// Construction-time settings of a [`PaintController`].
#[derive(Debug, Clone, Default)]
pub struct PainterConfig {
    pub metrics: LayoutMetrics,
    pub hover_width: HoverWidthPolicy,
    /// Style for nodes whose model provides none.
    pub default_style: NodeStyle,
    pub connection_style: ConnectionStyle,
}

/// Zoom and pan of the canvas. Geometry is cached in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0, pan_x: 0.0, pan_y: 0.0 }
    }
}

impl Viewport {
    pub fn screen_to_world(&self, x: f32, y: f32) -> Point {
        let z = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        Point::new((x - self.pan_x) / z, (y - self.pan_y) / z)
    }
}

/// Controller that manages painter state and runs repaint passes.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct PaintController {
    tracker: GeometryTracker,
    cache: Rc<RefCell<GeometryCache>>,
    interaction: Rc<RefCell<InteractionState>>,
    viewport: Rc<RefCell<Viewport>>,
    drag_anchor: Rc<RefCell<Option<PortRef>>>,
    probe: ProbeSlot,
    styles: Rc<RefCell<StyleCache>>,
    connection_style: Rc<RefCell<ConnectionStyle>>,
    hover_width: Rc<RefCell<HoverWidthPolicy>>,
    icons: Rc<IconCache>,
    node_painter: Rc<RefCell<NodePainter>>,
}

impl PaintController {
    /// Create a controller with the stock look.
    pub fn new(assets: impl AssetSource + 'static) -> Self {
        Self::with_config(assets, PainterConfig::default())
    }

    pub fn with_config(assets: impl AssetSource + 'static, config: PainterConfig) -> Self {
        let cache = Rc::new(RefCell::new(GeometryCache::with_metrics(config.metrics)));
        Self {
            tracker: GeometryTracker::with_cache(cache.clone()),
            cache,
            interaction: Rc::new(RefCell::new(InteractionState::new())),
            viewport: Rc::new(RefCell::new(Viewport::default())),
            drag_anchor: Rc::new(RefCell::new(None)),
            probe: ProbeSlot::new(),
            styles: Rc::new(RefCell::new(StyleCache::with_default(config.default_style))),
            connection_style: Rc::new(RefCell::new(config.connection_style)),
            hover_width: Rc::new(RefCell::new(config.hover_width)),
            icons: Rc::new(IconCache::new(assets)),
            node_painter: Rc::new(RefCell::new(NodePainter::new())),
        }
    }

    // === Shared state accessors ===

    /// Geometry tracker whose callbacks feed the shared cache.
    pub fn tracker(&self) -> GeometryTracker {
        self.tracker.clone()
    }

    /// Get access to the geometry cache.
    pub fn cache(&self) -> Rc<RefCell<GeometryCache>> {
        self.cache.clone()
    }

    pub fn interaction(&self) -> Rc<RefCell<InteractionState>> {
        self.interaction.clone()
    }

    /// Slot the gesture handler publishes connection-drag probes into.
    pub fn probe_slot(&self) -> ProbeSlot {
        self.probe.clone()
    }

    pub fn icons(&self) -> Rc<IconCache> {
        self.icons.clone()
    }

    /// Customize the node painter (swap or toggle layers).
    pub fn configure_node_painter(&self, configure: impl FnOnce(&mut NodePainter)) {
        configure(&mut self.node_painter.borrow_mut());
    }

    pub fn set_connection_style(&self, style: ConnectionStyle) {
        *self.connection_style.borrow_mut() = style;
    }

    pub fn set_hover_width_policy(&self, policy: HoverWidthPolicy) {
        *self.hover_width.borrow_mut() = policy;
    }

    /// Drop parsed styles and cached icons, e.g. after a theme switch.
    pub fn invalidate_resources(&self) {
        self.styles.borrow_mut().clear();
        self.icons.clear();
    }

    // === Viewport ===

    pub fn set_viewport(&self, zoom: f32, pan_x: f32, pan_y: f32) {
        *self.viewport.borrow_mut() = Viewport { zoom, pan_x, pan_y };
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport.borrow()
    }

    // === Interaction ===

    /// Handle a click on a node (shift toggles).
    pub fn handle_node_click(&self, node_id: NodeId, shift_held: bool) {
        self.interaction.borrow_mut().handle_click(node_id, shift_held);
    }

    /// Replace the selection with the nodes touching a screen-space box.
    pub fn select_in_box(&self, sx: f32, sy: f32, sw: f32, sh: f32) -> Vec<NodeId> {
        let viewport = self.viewport();
        let origin = viewport.screen_to_world(sx, sy);
        let z = if viewport.zoom > 0.0 { viewport.zoom } else { 1.0 };
        let ids = self
            .cache
            .borrow()
            .nodes_in_selection_box(Rect::new(origin.x, origin.y, sw / z, sh / z));
        self.interaction.borrow_mut().replace_selection(ids.iter().copied());
        ids
    }

    /// Forget a node removed from the model.
    pub fn remove_node(&self, node_id: NodeId) {
        self.cache.borrow_mut().remove_node(node_id);
        self.interaction.borrow_mut().remove_node(node_id);
    }

    /// Pointer moved to a screen position: update hover and, during a
    /// connection drag, publish a probe for the drop target.
    ///
    /// The drop target is the node under the cursor or, outside every node,
    /// the node owning the nearest port of the required type within
    /// [`INVALID_TARGET_THRESHOLD`].
    pub fn handle_pointer_move(&self, x: f32, y: f32) {
        let world = self.viewport().screen_to_world(x, y);
        let hovered = self.cache.borrow().node_at(world);
        self.interaction.borrow_mut().set_hovered(hovered);

        let Some(anchor) = *self.drag_anchor.borrow() else {
            return;
        };
        let target = hovered.or_else(|| {
            self.cache
                .borrow()
                .find_port_at(world, INVALID_TARGET_THRESHOLD, Some(anchor.port_type.opposite()))
                .map(|port| port.node_id)
        });
        match target {
            Some(target) => self.probe.set(PendingConnectionProbe::new(anchor, target, world)),
            None => self.probe.clear(),
        }
    }

    /// Start dragging a new connection from `anchor`.
    pub fn start_connection_drag(&self, anchor: PortRef) {
        *self.drag_anchor.borrow_mut() = Some(anchor);
    }

    /// Start a connection drag from the port under a screen position.
    pub fn start_connection_drag_at(&self, x: f32, y: f32, hit_radius: f32) -> Option<PortRef> {
        let world = self.viewport().screen_to_world(x, y);
        let port = self.cache.borrow().find_port_at(world, hit_radius, None)?;
        self.start_connection_drag(port);
        Some(port)
    }

    /// Finish the drag at a screen position.
    ///
    /// Returns the connection to create when the drop lands on a port of the
    /// required type and the model accepts the pairing.
    pub fn finish_connection_drag(
        &self,
        model: &dyn GraphModel,
        x: f32,
        y: f32,
        hit_radius: f32,
    ) -> Option<ConnectionId> {
        let anchor = self.drag_anchor.borrow_mut().take()?;
        self.probe.clear();

        let world = self.viewport().screen_to_world(x, y);
        let required = anchor.port_type.opposite();
        let target = self.cache.borrow().find_port_at(world, hit_radius, Some(required))?;
        let candidate = make_complete_connection_id(anchor, target.node_id, target.index);
        model.connection_possible(candidate).then_some(candidate)
    }

    pub fn cancel_connection_drag(&self) {
        self.drag_anchor.borrow_mut().take();
        self.probe.clear();
    }

    pub fn is_dragging_connection(&self) -> bool {
        self.drag_anchor.borrow().is_some()
    }

    // === Painting ===

    /// Begin a repaint pass.
    ///
    /// The pending probe, if any, is taken out of the slot here: every node
    /// painted in this pass sees the same snapshot, and the next pass sees
    /// nothing unless the gesture handler publishes a new probe.
    pub fn begin_pass<'a>(&'a self, model: &'a dyn GraphModel) -> RepaintPass<'a> {
        let probe = self.probe.take();
        if let Some(probe) = &probe {
            log::debug!("repaint pass consumed probe targeting node {}", probe.target_node);
        }
        RepaintPass {
            controller: self,
            model,
            probe,
            layout: self.cache.borrow(),
            interaction: self.interaction.borrow(),
            node_painter: self.node_painter.borrow(),
            connection_style: self.connection_style.borrow(),
            hover_width: *self.hover_width.borrow(),
            painted: 0,
        }
    }

    /// Paint every known node in one pass, one painter per node.
    pub fn paint_scene<P, F>(&self, model: &dyn GraphModel, mut make_painter: F) -> Vec<(NodeId, P)>
    where
        P: Painter,
        F: FnMut(NodeId) -> P,
    {
        let ids: Vec<NodeId> = self.cache.borrow().node_ids().collect();
        let mut pass = self.begin_pass(model);
        let painted = ids
            .into_iter()
            .map(|id| {
                let mut painter = make_painter(id);
                pass.paint_node(id, &mut painter);
                (id, painter)
            })
            .collect();
        pass.finish();
        painted
    }
}

/// One repaint cycle over any number of nodes.
///
/// Holds shared borrows of the controller state for its lifetime, so the
/// scene cannot change halfway through a pass.
pub struct RepaintPass<'a> {
    controller: &'a PaintController,
    model: &'a dyn GraphModel,
    probe: Option<PendingConnectionProbe>,
    layout: Ref<'a, GeometryCache>,
    interaction: Ref<'a, InteractionState>,
    node_painter: Ref<'a, NodePainter>,
    connection_style: Ref<'a, ConnectionStyle>,
    hover_width: HoverWidthPolicy,
    painted: usize,
}

impl RepaintPass<'_> {
    /// The probe snapshot of this pass.
    pub fn probe(&self) -> Option<&PendingConnectionProbe> {
        self.probe.as_ref()
    }

    /// Paint one node. Returns `false` when the node has no geometry yet.
    pub fn paint_node(&mut self, node_id: NodeId, painter: &mut dyn Painter) -> bool {
        let Some(size) = self.layout.node_size(node_id) else {
            log::debug!("node {node_id} has no geometry, not painted");
            return false;
        };

        let style_json = self.model.node_style(node_id);
        let style = self.controller.styles.borrow_mut().resolve(style_json.as_deref());
        let interaction = self.interaction.node(node_id);

        let ctx = PaintContext {
            node_id,
            model: self.model,
            layout: &*self.layout,
            style: &style,
            connection_style: &self.connection_style,
            metrics: &self.layout.metrics,
            icons: &self.controller.icons,
            size,
            interaction,
            state: classify(self.model.running(node_id), interaction),
            hover_width: self.hover_width,
            probe: self.probe.as_ref().filter(|p| p.target_node == node_id),
        };
        self.node_painter.paint(&ctx, painter);
        self.painted += 1;
        true
    }

    /// End the pass. Returns the number of nodes painted.
    pub fn finish(self) -> usize {
        log::trace!("repaint pass painted {} nodes", self.painted);
        self.painted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::MemoryAssetSource;
    use crate::model::PortType;

    fn controller_with_two_nodes() -> PaintController {
        let ctrl = PaintController::new(MemoryAssetSource::new());
        {
            let cache = ctrl.cache();
            let mut cache = cache.borrow_mut();
            cache.update_node_rect(1, 0.0, 0.0, 160.0, 120.0);
            cache.update_node_rect(2, 300.0, 0.0, 160.0, 120.0);
            cache.arrange_ports(1, 1, 1);
            cache.arrange_ports(2, 1, 1);
        }
        ctrl
    }

    #[test]
    fn test_viewport_screen_to_world() {
        let viewport = Viewport { zoom: 2.0, pan_x: 10.0, pan_y: 20.0 };
        assert_eq!(viewport.screen_to_world(30.0, 60.0), Point::new(10.0, 20.0));

        let broken = Viewport { zoom: 0.0, pan_x: 0.0, pan_y: 0.0 };
        assert_eq!(broken.screen_to_world(5.0, 5.0), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_pointer_move_updates_hover() {
        let ctrl = controller_with_two_nodes();
        ctrl.handle_pointer_move(350.0, 50.0);
        assert_eq!(ctrl.interaction().borrow().hovered(), Some(2));

        ctrl.handle_pointer_move(250.0, 50.0);
        assert_eq!(ctrl.interaction().borrow().hovered(), None);
    }

    #[test]
    fn test_pointer_move_respects_viewport() {
        let ctrl = controller_with_two_nodes();
        ctrl.set_viewport(0.5, 0.0, 0.0);
        // Screen (175, 25) is world (350, 50), inside node 2
        ctrl.handle_pointer_move(175.0, 25.0);
        assert_eq!(ctrl.interaction().borrow().hovered(), Some(2));
    }

    #[test]
    fn test_connection_drag_publishes_probe_for_hovered_node() {
        let ctrl = controller_with_two_nodes();
        let anchor = PortRef::new(1, PortType::Out, 0);
        ctrl.start_connection_drag(anchor);

        ctrl.handle_pointer_move(310.0, 50.0);
        let probe = ctrl.probe_slot().take().expect("probe published");
        assert_eq!(probe.target_node, 2);
        assert_eq!(probe.anchor, anchor);
        assert_eq!(probe.end_point, Point::new(310.0, 50.0));

        // Leaving all nodes withdraws the probe
        ctrl.handle_pointer_move(310.0, 50.0);
        ctrl.handle_pointer_move(250.0, 300.0);
        assert!(!ctrl.probe_slot().is_set());
    }

    #[test]
    fn test_connection_drag_targets_nearby_port_outside_node() {
        let ctrl = controller_with_two_nodes();
        ctrl.start_connection_drag(PortRef::new(1, PortType::Out, 0));

        // Left of node 2, 30 px from its input at (300, 51)
        ctrl.handle_pointer_move(270.0, 51.0);
        let probe = ctrl.probe_slot().take().expect("probe published");
        assert_eq!(probe.target_node, 2);
        assert_eq!(ctrl.interaction().borrow().hovered(), None);

        // Outputs are not drop targets for this drag
        ctrl.handle_pointer_move(190.0, 51.0);
        assert!(!ctrl.probe_slot().is_set());
    }

    #[test]
    fn test_no_probe_without_drag() {
        let ctrl = controller_with_two_nodes();
        ctrl.handle_pointer_move(310.0, 50.0);
        assert!(!ctrl.probe_slot().is_set());
    }

    #[test]
    fn test_start_drag_at_port_and_cancel() {
        let ctrl = controller_with_two_nodes();
        // Output port of node 1 sits at (160, 51)
        let port = ctrl.start_connection_drag_at(161.0, 50.0, 6.0);
        assert_eq!(port, Some(PortRef::new(1, PortType::Out, 0)));
        assert!(ctrl.is_dragging_connection());

        ctrl.handle_pointer_move(310.0, 50.0);
        ctrl.cancel_connection_drag();
        assert!(!ctrl.is_dragging_connection());
        assert!(!ctrl.probe_slot().is_set());
    }

    #[test]
    fn test_select_in_box() {
        let ctrl = controller_with_two_nodes();
        let ids = ctrl.select_in_box(-10.0, -10.0, 50.0, 50.0);
        assert_eq!(ids, vec![1]);
        assert!(ctrl.interaction().borrow().is_selected(1));
    }

    #[test]
    fn test_remove_node_forgets_geometry_and_interaction() {
        let ctrl = controller_with_two_nodes();
        ctrl.handle_node_click(2, false);
        ctrl.remove_node(2);

        assert!(ctrl.cache().borrow().node_size(2).is_none());
        assert!(!ctrl.interaction().borrow().is_selected(2));
    }
}
