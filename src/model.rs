//! Read-only view of the graph model consumed by the painter.
//!
//! The painter never owns graph data. Everything it draws is queried through
//! [`GraphModel`] once per paint call, so the model can live in whatever
//! storage the application prefers (a `VecModel`, an ECS, a database row...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque node identifier assigned by the graph model.
pub type NodeId = u32;

/// Index of a port within one side of a node.
pub type PortIndex = u32;

/// Direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    In,
    Out,
}

impl PortType {
    /// The port type a connection needs on its other end.
    pub fn opposite(self) -> Self {
        match self {
            PortType::In => PortType::Out,
            PortType::Out => PortType::In,
        }
    }
}

/// Address of a single port: `(node, side, index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub node_id: NodeId,
    pub port_type: PortType,
    pub index: PortIndex,
}

impl PortRef {
    pub fn new(node_id: NodeId, port_type: PortType, index: PortIndex) -> Self {
        Self { node_id, port_type, index }
    }
}

/// A complete connection, always stored as output end -> input end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId {
    pub out_node_id: NodeId,
    pub out_port_index: PortIndex,
    pub in_node_id: NodeId,
    pub in_port_index: PortIndex,
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            self.out_node_id, self.out_port_index, self.in_node_id, self.in_port_index
        )
    }
}

/// Complete a half-built connection.
///
/// `anchor` is the end the user started dragging from; the free end lands on
/// `(node_id, index)` on the opposite side.
pub fn make_complete_connection_id(anchor: PortRef, node_id: NodeId, index: PortIndex) -> ConnectionId {
    match anchor.port_type {
        PortType::Out => ConnectionId {
            out_node_id: anchor.node_id,
            out_port_index: anchor.index,
            in_node_id: node_id,
            in_port_index: index,
        },
        PortType::In => ConnectionId {
            out_node_id: node_id,
            out_port_index: index,
            in_node_id: anchor.node_id,
            in_port_index: anchor.index,
        },
    }
}

/// Data type carried by a port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeDataType {
    pub id: String,
    pub name: String,
}

impl NodeDataType {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Outcome of the last execution of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    #[default]
    None,
    Succeeded,
    Failed,
    Unreachable,
}

impl ResultType {
    /// Decode a raw code from untyped model storage.
    ///
    /// Codes: 0 none, 1 succeeded, 2 failed, 3 unreachable. Anything else is
    /// treated as "no result".
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ResultType::None,
            1 => ResultType::Succeeded,
            2 => ResultType::Failed,
            3 => ResultType::Unreachable,
            other => {
                log::warn!("unknown node result code {other}, showing no result");
                ResultType::None
            }
        }
    }

    pub fn code(self) -> i64 {
        match self {
            ResultType::None => 0,
            ResultType::Succeeded => 1,
            ResultType::Failed => 2,
            ResultType::Unreachable => 3,
        }
    }
}

/// Capability flags of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeFlags {
    pub resizable: bool,
}

/// Queries the painter makes against the graph model.
///
/// All methods are read-only and are called from the UI thread during a
/// repaint. Missing data should be reported with the neutral value (empty
/// string, `0`, `false`, empty connection list) rather than by panicking.
pub trait GraphModel {
    /// JSON-encoded style for the node, `None` for the default style.
    fn node_style(&self, node_id: NodeId) -> Option<String> {
        let _ = node_id;
        None
    }
    /// Display name shown in bold below the caption band.
    fn caption(&self, node_id: NodeId) -> String;
    fn caption_visible(&self, node_id: NodeId) -> bool;
    /// Short description shown inside the caption band.
    fn description(&self, node_id: NodeId) -> String;
    fn running(&self, node_id: NodeId) -> bool;
    /// Elapsed execution time in milliseconds; `0` means nothing to show.
    fn elapsed_ms(&self, node_id: NodeId) -> u64;
    /// Icon asset path, empty for no icon.
    fn icon_path(&self, node_id: NodeId) -> String;
    fn result(&self, node_id: NodeId) -> ResultType;
    fn flags(&self, node_id: NodeId) -> NodeFlags;
    fn port_count(&self, node_id: NodeId, port_type: PortType) -> u32;
    fn port_data_type(&self, node_id: NodeId, port_type: PortType, index: PortIndex) -> NodeDataType;
    fn port_caption(&self, node_id: NodeId, port_type: PortType, index: PortIndex) -> String;
    fn port_caption_visible(&self, node_id: NodeId, port_type: PortType, index: PortIndex) -> bool;
    /// Connections attached to a port.
    fn connections(&self, node_id: NodeId, port_type: PortType, index: PortIndex) -> Vec<ConnectionId>;
    /// Whether connecting `connection_id` would be accepted.
    fn connection_possible(&self, connection_id: ConnectionId) -> bool;
}
