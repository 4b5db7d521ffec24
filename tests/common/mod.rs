//! Shared test utilities: an in-memory graph model and a scene harness.

#![allow(dead_code)]

pub mod harness;

use slint_node_painter::{
    ConnectionId, GraphModel, NodeDataType, NodeFlags, NodeId, PortIndex, PortType, ResultType,
};
use std::collections::BTreeMap;

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Debug, Default)]
pub struct FakePort {
    pub data_type: NodeDataType,
    pub caption: String,
    pub caption_visible: bool,
}

impl FakePort {
    pub fn of_type(id: &str) -> Self {
        Self {
            data_type: NodeDataType::new(id, id.to_uppercase()),
            caption: String::new(),
            caption_visible: false,
        }
    }

    pub fn captioned(id: &str, caption: &str) -> Self {
        Self { caption: caption.to_owned(), caption_visible: true, ..Self::of_type(id) }
    }
}

#[derive(Clone, Debug)]
pub struct FakeNode {
    pub caption: String,
    pub caption_visible: bool,
    pub description: String,
    pub running: bool,
    pub elapsed_ms: u64,
    pub icon: String,
    pub result: ResultType,
    pub resizable: bool,
    pub style: Option<String>,
    pub inputs: Vec<FakePort>,
    pub outputs: Vec<FakePort>,
}

impl Default for FakeNode {
    fn default() -> Self {
        Self {
            caption: "Add".to_owned(),
            caption_visible: true,
            description: "Adds numbers".to_owned(),
            running: false,
            elapsed_ms: 0,
            icon: String::new(),
            result: ResultType::None,
            resizable: false,
            style: None,
            inputs: vec![FakePort::of_type("decimal")],
            outputs: vec![FakePort::of_type("decimal")],
        }
    }
}

/// In-memory graph model.
///
/// A connection is possible when it joins two different nodes, the port
/// data types match, and the exact connection does not exist yet.
#[derive(Clone, Debug, Default)]
pub struct FakeGraph {
    pub nodes: BTreeMap<NodeId, FakeNode>,
    pub connections: Vec<ConnectionId>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, id: NodeId, node: FakeNode) -> Self {
        self.nodes.insert(id, node);
        self
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut FakeNode {
        self.nodes.get_mut(&id).expect("node exists")
    }

    pub fn connect(&mut self, out_node: NodeId, out_port: PortIndex, in_node: NodeId, in_port: PortIndex) {
        self.connections.push(ConnectionId {
            out_node_id: out_node,
            out_port_index: out_port,
            in_node_id: in_node,
            in_port_index: in_port,
        });
    }

    pub fn disconnect(&mut self, id: ConnectionId) {
        self.connections.retain(|c| *c != id);
    }

    fn port(&self, node_id: NodeId, port_type: PortType, index: PortIndex) -> Option<&FakePort> {
        let node = self.nodes.get(&node_id)?;
        let ports = match port_type {
            PortType::In => &node.inputs,
            PortType::Out => &node.outputs,
        };
        ports.get(index as usize)
    }

    fn node(&self, node_id: NodeId) -> FakeNode {
        self.nodes.get(&node_id).cloned().unwrap_or_default()
    }
}

impl GraphModel for FakeGraph {
    fn node_style(&self, node_id: NodeId) -> Option<String> {
        self.nodes.get(&node_id)?.style.clone()
    }

    fn caption(&self, node_id: NodeId) -> String {
        self.node(node_id).caption
    }

    fn caption_visible(&self, node_id: NodeId) -> bool {
        self.node(node_id).caption_visible
    }

    fn description(&self, node_id: NodeId) -> String {
        self.node(node_id).description
    }

    fn running(&self, node_id: NodeId) -> bool {
        self.node(node_id).running
    }

    fn elapsed_ms(&self, node_id: NodeId) -> u64 {
        self.node(node_id).elapsed_ms
    }

    fn icon_path(&self, node_id: NodeId) -> String {
        self.node(node_id).icon
    }

    fn result(&self, node_id: NodeId) -> ResultType {
        self.node(node_id).result
    }

    fn flags(&self, node_id: NodeId) -> NodeFlags {
        NodeFlags { resizable: self.node(node_id).resizable }
    }

    fn port_count(&self, node_id: NodeId, port_type: PortType) -> u32 {
        self.nodes.get(&node_id).map_or(0, |n| match port_type {
            PortType::In => n.inputs.len() as u32,
            PortType::Out => n.outputs.len() as u32,
        })
    }

    fn port_data_type(&self, node_id: NodeId, port_type: PortType, index: PortIndex) -> NodeDataType {
        self.port(node_id, port_type, index)
            .map(|p| p.data_type.clone())
            .unwrap_or_default()
    }

    fn port_caption(&self, node_id: NodeId, port_type: PortType, index: PortIndex) -> String {
        self.port(node_id, port_type, index)
            .map(|p| p.caption.clone())
            .unwrap_or_default()
    }

    fn port_caption_visible(&self, node_id: NodeId, port_type: PortType, index: PortIndex) -> bool {
        self.port(node_id, port_type, index)
            .is_some_and(|p| p.caption_visible)
    }

    fn connections(&self, node_id: NodeId, port_type: PortType, index: PortIndex) -> Vec<ConnectionId> {
        self.connections
            .iter()
            .filter(|c| match port_type {
                PortType::Out => c.out_node_id == node_id && c.out_port_index == index,
                PortType::In => c.in_node_id == node_id && c.in_port_index == index,
            })
            .copied()
            .collect()
    }

    fn connection_possible(&self, id: ConnectionId) -> bool {
        if id.out_node_id == id.in_node_id || self.connections.contains(&id) {
            return false;
        }
        let out = self.port(id.out_node_id, PortType::Out, id.out_port_index);
        let input = self.port(id.in_node_id, PortType::In, id.in_port_index);
        match (out, input) {
            (Some(o), Some(i)) => o.data_type.id == i.data_type.id,
            _ => false,
        }
    }
}
