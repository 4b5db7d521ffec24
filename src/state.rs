use std::collections::HashMap;

use crate::geometry::{LayoutMetrics, NodeLayout, Point, Rect, Size};
use crate::hit_test::{find_port_at, node_at, nodes_in_selection_box, SimpleNodeGeometry, SimplePortGeometry};
use crate::model::{NodeId, PortRef, PortType};

/// Where a port sits on its node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StoredPort {
    /// Reported by the host, relative to the node's origin.
    Reported(Point),
    /// Default arrangement: on the left or right edge at a fixed y. The
    /// x of a right-edge port follows the node's current width.
    Arranged { port_type: PortType, y: f32 },
}

impl StoredPort {
    /// Position relative to the node's origin for a node of `width`.
    pub fn rel(&self, width: f32) -> Point {
        match *self {
            StoredPort::Reported(rel) => rel,
            StoredPort::Arranged { port_type: PortType::In, y } => Point::new(0.0, y),
            StoredPort::Arranged { port_type: PortType::Out, y } => Point::new(width, y),
        }
    }
}

/// Spatial state of the editor: node rects in scene space and port positions
/// relative to their node.
///
/// Geometry is reported by the host (see [`GeometryTracker`](crate::GeometryTracker))
/// or laid out with [`arrange_ports`](Self::arrange_ports). Node iteration
/// order is the order nodes were first reported, which is also the paint order.
#[derive(Debug, Default)]
pub struct GeometryCache {
    pub node_rects: HashMap<NodeId, Rect>,
    pub port_positions: HashMap<PortRef, StoredPort>,
    pub metrics: LayoutMetrics,
    order: Vec<NodeId>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: LayoutMetrics) -> Self {
        Self { metrics, ..Self::default() }
    }

    /// Node ids in paint order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    /// Update a node's scene rectangle
    pub fn update_node_rect(&mut self, id: NodeId, x: f32, y: f32, width: f32, height: f32) {
        if self.node_rects.insert(id, Rect::new(x, y, width, height)).is_none() {
            self.order.push(id);
        }
    }

    /// Standard handler for port position reports from the host
    pub fn handle_port_report(
        &mut self,
        node_id: NodeId,
        port_type: PortType,
        index: u32,
        rel_x: f32,
        rel_y: f32,
    ) {
        self.port_positions.insert(
            PortRef::new(node_id, port_type, index),
            StoredPort::Reported(Point::new(rel_x, rel_y)),
        );
    }

    /// Forget a node and all of its ports
    pub fn remove_node(&mut self, id: NodeId) {
        self.node_rects.remove(&id);
        self.order.retain(|&n| n != id);
        self.port_positions.retain(|port, _| port.node_id != id);
    }

    /// Lay out ports with the default arrangement: inputs on the left edge,
    /// outputs on the right edge, spaced below the caption band.
    ///
    /// Does nothing for a node whose rect has not been reported yet.
    pub fn arrange_ports(&mut self, node_id: NodeId, in_count: u32, out_count: u32) {
        if !self.node_rects.contains_key(&node_id) {
            log::debug!("arrange_ports: node {node_id} has no geometry yet");
            return;
        }

        self.port_positions.retain(|port, _| port.node_id != node_id);

        for (port_type, count) in [(PortType::In, in_count), (PortType::Out, out_count)] {
            for index in 0..count {
                let y = self.metrics.port_y(index);
                self.port_positions
                    .insert(PortRef::new(node_id, port_type, index), StoredPort::Arranged { port_type, y });
            }
        }
    }

    fn node_width(&self, node_id: NodeId) -> f32 {
        self.node_rects.get(&node_id).map_or(0.0, |r| r.width)
    }

    /// Label anchor: right of an input port, or a label width in from the
    /// right edge for an output port. Follows the node's current width.
    fn text_position(&self, port: PortRef, rel: Point) -> Point {
        let offset = self.metrics.vertical_border_space;
        match port.port_type {
            PortType::In => Point::new(rel.x + self.metrics.border_space, rel.y + offset),
            PortType::Out => {
                let right = self.node_rects.get(&port.node_id).map_or(rel.x, |r| r.width);
                Point::new(right - self.metrics.border_space - self.metrics.port_label_width, rel.y + offset)
            }
        }
    }

    /// Iterator over absolute (scene) port positions for hit testing
    pub fn absolute_ports(&self) -> impl Iterator<Item = SimplePortGeometry> + '_ {
        self.port_positions.iter().filter_map(move |(port, stored)| {
            let rect = self.node_rects.get(&port.node_id)?;
            let rel = stored.rel(rect.width);
            Some(SimplePortGeometry {
                port: *port,
                x: rect.x + rel.x,
                y: rect.y + rel.y,
            })
        })
    }

    fn node_geometries(&self) -> impl Iterator<Item = SimpleNodeGeometry> + '_ {
        self.order.iter().filter_map(move |&id| {
            self.node_rects.get(&id).map(|&rect| SimpleNodeGeometry { id, rect })
        })
    }

    /// Find a port near a scene position
    pub fn find_port_at(&self, pos: Point, hit_radius: f32, required: Option<PortType>) -> Option<PortRef> {
        find_port_at(pos, self.absolute_ports(), hit_radius, required)
    }

    /// Topmost node under a scene position
    pub fn node_at(&self, pos: Point) -> Option<NodeId> {
        node_at(pos, self.node_geometries())
    }

    /// Compute nodes in selection box
    pub fn nodes_in_selection_box(&self, selection: Rect) -> Vec<NodeId> {
        nodes_in_selection_box(selection, self.node_geometries())
    }

    fn size_of(&self, node_id: NodeId) -> Option<Size> {
        self.node_rects.get(&node_id).map(|r| Size::new(r.width, r.height))
    }
}

impl NodeLayout for GeometryCache {
    fn node_size(&self, node_id: NodeId) -> Option<Size> {
        self.size_of(node_id)
    }

    fn node_position(&self, node_id: NodeId) -> Option<Point> {
        self.node_rects.get(&node_id).map(|r| Point::new(r.x, r.y))
    }

    fn port_position(&self, port: PortRef) -> Option<Point> {
        self.port_positions
            .get(&port)
            .map(|p| p.rel(self.node_width(port.node_id)))
    }

    fn port_text_position(&self, port: PortRef) -> Option<Point> {
        self.port_position(port).map(|rel| self.text_position(port, rel))
    }

    fn resize_handle_rect(&self, node_id: NodeId) -> Option<Rect> {
        self.size_of(node_id).map(|s| self.metrics.resize_handle_rect(s))
    }

    fn step_into_rect(&self, node_id: NodeId) -> Option<Rect> {
        self.size_of(node_id).map(|s| self.metrics.step_into_rect(s))
    }

    fn step_over_rect(&self, node_id: NodeId) -> Option<Rect> {
        self.size_of(node_id).map(|s| self.metrics.step_over_rect(s))
    }
}
