use std::collections::HashSet;

use crate::model::NodeId;
use crate::visual_state::NodeInteraction;

/// Scene-side interaction state: which nodes are selected and which one is
/// under the cursor.
#[derive(Debug, Default)]
pub struct InteractionState {
    selected: HashSet<NodeId>,
    hovered: Option<NodeId>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click on a node based on interaction modifiers
    pub fn handle_click(&mut self, id: NodeId, shift_held: bool) {
        if shift_held {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
        } else {
            if self.selected.len() == 1 && self.selected.contains(&id) {
                return;
            }
            self.selected.clear();
            self.selected.insert(id);
        }
    }

    /// Clear the current selection
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Replace the current selection with a new set of IDs
    ///
    /// Useful for box selection sync
    pub fn replace_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.selected.clear();
        self.selected.extend(ids);
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.selected.iter().copied()
    }

    /// Set the node under the cursor, `None` when the cursor left all nodes.
    pub fn set_hovered(&mut self, id: Option<NodeId>) {
        self.hovered = id;
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Forget a removed node.
    pub fn remove_node(&mut self, id: NodeId) {
        self.selected.remove(&id);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }

    /// Flags for one node, as consumed by the painter.
    pub fn node(&self, id: NodeId) -> NodeInteraction {
        NodeInteraction {
            hovered: self.hovered == Some(id),
            selected: self.selected.contains(&id),
        }
    }
}
