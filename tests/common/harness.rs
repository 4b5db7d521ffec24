//! Scene harness: a controller wired to a [`FakeGraph`] with in-memory icons.
//!
//! Node `n` is placed at `((n - 1) * 300, 0)` with size 180x120 and the
//! default port arrangement, unless a test overrides the geometry.

use super::{init_logging, FakeGraph};
use slint_node_painter::icons::{
    RESULT_FAILED_ICON, RESULT_SUCCEEDED_ICON, RESULT_UNREACHABLE_ICON, STEP_INTO_ICON,
    STEP_OVER_ICON,
};
use slint_node_painter::{
    DrawCommand, GraphModel, MemoryAssetSource, NodeId, PaintController, Point, PortType,
    RecordingPainter,
};

pub const NODE_WIDTH: f32 = 180.0;
pub const NODE_HEIGHT: f32 = 120.0;
pub const NODE_SPACING: f32 = 300.0;

/// Icon assets every scene can load.
pub const SCENE_ASSETS: &[&str] = &[
    STEP_INTO_ICON,
    STEP_OVER_ICON,
    RESULT_FAILED_ICON,
    RESULT_SUCCEEDED_ICON,
    RESULT_UNREACHABLE_ICON,
    ":/imgs/add.svg",
    ":/imgs/add_hover.svg",
    ":/imgs/add_selected.svg",
];

pub struct Scene {
    pub ctrl: PaintController,
    pub graph: FakeGraph,
}

impl Scene {
    pub fn new(graph: FakeGraph) -> Self {
        init_logging();
        let ctrl = PaintController::new(MemoryAssetSource::with_paths(SCENE_ASSETS.iter().copied()));
        let scene = Self { ctrl, graph };
        let ids: Vec<NodeId> = scene.graph.nodes.keys().copied().collect();
        for id in ids {
            scene.place(id, (id - 1) as f32 * NODE_SPACING, 0.0);
        }
        scene
    }

    /// Move a node and re-run the default port arrangement.
    pub fn place(&self, id: NodeId, x: f32, y: f32) {
        let cache = self.ctrl.cache();
        let mut cache = cache.borrow_mut();
        cache.update_node_rect(id, x, y, NODE_WIDTH, NODE_HEIGHT);
        cache.arrange_ports(
            id,
            self.graph.port_count(id, PortType::In),
            self.graph.port_count(id, PortType::Out),
        );
    }

    /// Paint a single node in its own pass.
    pub fn paint(&self, id: NodeId) -> RecordingPainter {
        let mut painter = RecordingPainter::new();
        let mut pass = self.ctrl.begin_pass(&self.graph);
        assert!(pass.paint_node(id, &mut painter), "node {id} has geometry");
        pass.finish();
        painter
    }

    /// Paint the given nodes, in order, within one pass.
    pub fn paint_in_one_pass(&self, ids: &[NodeId]) -> Vec<RecordingPainter> {
        let mut pass = self.ctrl.begin_pass(&self.graph);
        let painters = ids
            .iter()
            .map(|&id| {
                let mut painter = RecordingPainter::new();
                pass.paint_node(id, &mut painter);
                painter
            })
            .collect();
        pass.finish();
        painters
    }

    /// Scene position of a node-local point.
    pub fn scene_point(&self, id: NodeId, local: Point) -> Point {
        let rect = self.ctrl.cache().borrow().node_rects[&id];
        Point::new(rect.x + local.x, rect.y + local.y)
    }
}

/// Short name of a draw command, for order assertions.
pub fn kind(command: &DrawCommand) -> &'static str {
    match command {
        DrawCommand::RoundedRect { .. } => "rounded-rect",
        DrawCommand::FillRect { .. } => "fill-rect",
        DrawCommand::Ellipse { .. } => "ellipse",
        DrawCommand::Text { .. } => "text",
        DrawCommand::TextAt { .. } => "text-at",
        DrawCommand::Image { .. } => "image",
    }
}

/// Marker radius drawn at a node-local port position, largest first.
///
/// Returns every ellipse radius centered on `at`, which includes the filled
/// marker of a connected port.
pub fn radii_at(painter: &RecordingPainter, at: Point) -> Vec<f32> {
    let mut radii: Vec<f32> = painter
        .ellipses()
        .filter(|(center, _, _)| center.distance_to(at) < 0.01)
        .map(|(_, rx, _)| rx)
        .collect();
    radii.sort_by(|a, b| b.total_cmp(a));
    radii
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}
