//! Visual state classification of a node.

/// Mutually exclusive visual state of a node for one paint pass.
///
/// Priority is `Running > Hovered > Selected > Normal`: execution feedback
/// stays visible under the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeVisualState {
    #[default]
    Normal,
    Selected,
    Hovered,
    Running,
}

impl NodeVisualState {
    /// Suffix inserted into state-dependent asset file names.
    pub fn asset_suffix(self) -> Option<&'static str> {
        match self {
            NodeVisualState::Running => Some("_running"),
            NodeVisualState::Hovered => Some("_hover"),
            NodeVisualState::Selected => Some("_selected"),
            NodeVisualState::Normal => None,
        }
    }
}

/// Interaction flags of one node, as tracked by the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeInteraction {
    pub hovered: bool,
    pub selected: bool,
}

/// First match wins: running, hovered, selected, normal.
pub fn classify(running: bool, interaction: NodeInteraction) -> NodeVisualState {
    if running {
        NodeVisualState::Running
    } else if interaction.hovered {
        NodeVisualState::Hovered
    } else if interaction.selected {
        NodeVisualState::Selected
    } else {
        NodeVisualState::Normal
    }
}

/// When the hovered pen width replaces the normal one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoverWidthPolicy {
    /// Whenever the cursor is over the node, even while it runs.
    #[default]
    WhenHovered,
    /// Only when the classified state is [`NodeVisualState::Hovered`].
    FollowState,
}

impl HoverWidthPolicy {
    pub fn use_hover_width(self, state: NodeVisualState, interaction: NodeInteraction) -> bool {
        match self {
            HoverWidthPolicy::WhenHovered => interaction.hovered,
            HoverWidthPolicy::FollowState => state == NodeVisualState::Hovered,
        }
    }
}
