//! Level 5: Customization Tests
//!
//! Tests per-node styles from the model, toggling and replacing layers, and
//! port labels.

mod common;

use common::harness::{assert_close, kind, radii_at, Scene};
use common::{FakeGraph, FakeNode, FakePort};
use slint_node_painter::{DrawCommand, Layer, NodeLayout, NodeStyle, Painter, Point};

const PORT_Y: f32 = 51.0;

fn styled(json: &str) -> FakeNode {
    FakeNode { style: Some(json.to_owned()), ..FakeNode::default() }
}

fn body_pen_width(painter: &slint_node_painter::RecordingPainter) -> f32 {
    match painter.commands.first() {
        Some(DrawCommand::RoundedRect { pen, .. }) => pen.width,
        other => panic!("expected body first, got {other:?}"),
    }
}

// ============================================================================
// Styles
// ============================================================================

#[test]
fn test_node_style_from_model() {
    let node = styled(
        r#"{"NodeStyle": {"ConnectionPointDiameter": 10, "NormalBoundaryColor": [255, 0, 0]}}"#,
    );
    let scene = Scene::new(FakeGraph::new().with_node(1, node));

    let painter = scene.paint(1);

    assert_close(radii_at(&painter, Point::new(0.0, PORT_Y))[0], 6.0);
    let Some(DrawCommand::RoundedRect { pen, .. }) = painter.commands.first() else {
        panic!("expected body first");
    };
    assert_eq!(pen.color, slint::Color::from_rgb_u8(255, 0, 0));
}

#[test]
fn test_invalid_style_value_keeps_default() {
    let node = styled(r#"{"NodeStyle": {"PenWidth": "thick", "HoveredPenWidth": 4}}"#);
    let scene = Scene::new(FakeGraph::new().with_node(1, node));

    let painter = scene.paint(1);
    assert_eq!(body_pen_width(&painter), NodeStyle::default().pen_width);

    // The valid key next to the broken one still applies
    scene.ctrl.handle_pointer_move(90.0, 60.0);
    let painter = scene.paint(1);
    assert_eq!(body_pen_width(&painter), 4.0);
}

#[test]
fn test_unparsable_style_falls_back_to_default() {
    let scene = Scene::new(FakeGraph::new().with_node(1, styled("not json")));

    let painter = scene.paint(1);

    let style = NodeStyle::default();
    assert_close(
        radii_at(&painter, Point::new(0.0, PORT_Y))[0],
        style.connection_point_diameter * 0.6,
    );
    assert_eq!(body_pen_width(&painter), style.pen_width);
}

#[test]
fn test_nodes_with_different_styles_in_one_pass() {
    let graph = FakeGraph::new()
        .with_node(1, styled(r#"{"NodeStyle": {"PenWidth": 3}}"#))
        .with_node(2, FakeNode::default());
    let scene = Scene::new(graph);

    let painters = scene.paint_in_one_pass(&[1, 2]);

    assert_eq!(body_pen_width(&painters[0]), 3.0);
    assert_eq!(body_pen_width(&painters[1]), 1.0);
}

// ============================================================================
// Layers
// ============================================================================

#[test]
fn test_disabled_layer_is_skipped() {
    let scene = Scene::new(FakeGraph::new().with_node(1, FakeNode::default()));
    scene
        .ctrl
        .configure_node_painter(|p| p.set_enabled(Layer::StepControls, false));

    let painter = scene.paint(1);
    assert_eq!(painter.images().count(), 0);
}

#[test]
fn test_replaced_step_draws_in_place() {
    let node = FakeNode { resizable: true, ..FakeNode::default() };
    let scene = Scene::new(FakeGraph::new().with_node(1, node));
    scene.ctrl.configure_node_painter(|p| {
        p.set_step(Layer::ResizeHandle, |ctx, painter| {
            if let Some(rect) = ctx.layout.resize_handle_rect(ctx.node_id) {
                painter.fill_rect(rect, ctx.style.resize_handle_color);
            }
        })
    });

    let painter = scene.paint(1);
    assert_eq!(painter.commands.last().map(kind), Some("fill-rect"));

    scene.ctrl.configure_node_painter(|p| p.reset_step(Layer::ResizeHandle));
    let painter = scene.paint(1);
    let Some(DrawCommand::Ellipse { center, rx, pen, .. }) = painter.commands.last() else {
        panic!("default resize handle is an ellipse");
    };
    assert_eq!(*center, Point::new(173.5, 113.5));
    assert_eq!(*rx, 3.5);
    assert_eq!(*pen, None);
}

#[test]
fn test_custom_step_sees_visual_state() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut graph = FakeGraph::new().with_node(1, FakeNode::default());
    graph.node_mut(1).running = true;
    let scene = Scene::new(graph);
    let seen = Rc::new(RefCell::new(Vec::new()));
    scene.ctrl.configure_node_painter({
        let seen = seen.clone();
        move |p| {
            p.set_step(Layer::NodeIcon, move |ctx, _| seen.borrow_mut().push(ctx.state));
        }
    });

    scene.paint(1);
    assert_eq!(
        *seen.borrow(),
        vec![slint_node_painter::NodeVisualState::Running]
    );
}

// ============================================================================
// Entry labels
// ============================================================================

#[test]
fn test_entry_labels_off_by_default() {
    let mut graph = FakeGraph::new().with_node(1, FakeNode::default());
    graph.node_mut(1).inputs = vec![FakePort::captioned("decimal", "lhs")];
    let scene = Scene::new(graph);

    let painter = scene.paint(1);
    assert!(!painter.commands.iter().any(|c| kind(c) == "text-at"));
}

#[test]
fn test_entry_labels_when_enabled() {
    let mut graph = FakeGraph::new()
        .with_node(1, FakeNode::default())
        .with_node(2, FakeNode::default());
    graph.node_mut(1).inputs = vec![FakePort::captioned("decimal", "lhs")];
    graph.connect(1, 0, 2, 0);
    let scene = Scene::new(graph);
    scene
        .ctrl
        .configure_node_painter(|p| p.set_enabled(Layer::EntryLabels, true));
    let style = NodeStyle::default();

    let painter = scene.paint(1);
    let labels: Vec<_> = painter
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::TextAt { anchor, text, color } => Some((*anchor, text.to_string(), *color)),
            _ => None,
        })
        .collect();

    assert_eq!(
        labels,
        vec![
            // Connected output without caption shows its data type name
            (Point::new(126.0, 55.0), "DECIMAL".to_owned(), style.font_color),
            // Unconnected input with a visible caption
            (Point::new(12.0, 55.0), "lhs".to_owned(), style.font_color_faded),
        ]
    );
}
