//! Geometry primitives, layout constants and the geometry collaborator trait.
//!
//! All rectangles produced here are in node-local coordinates: `(0, 0)` is the
//! top-left corner of the node item, including the strip above the body that
//! holds the result icon.

use crate::model::{NodeId, PortRef};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Fixed layout constants of the default node look.
///
/// Every value is overridable; [`Default`] gives the stock layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    /// Strip above the body reserved for the result icon.
    pub header_offset: f32,
    pub caption_band_height: f32,
    pub border_space: f32,
    pub vertical_border_space: f32,
    /// Height of the bold name caption line.
    pub caption_text_height: f32,
    pub description_width: f32,
    pub name_caption_x: f32,
    pub name_caption_width: f32,
    /// Room left of the right edge for an output port label.
    pub port_label_width: f32,
    pub icon_size: f32,
    pub result_icon_size: f32,
    pub time_label_width: f32,
    pub port_spacing: f32,
    pub corner_radius: f32,
    pub resize_handle_size: f32,
    pub resize_handle_inset: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            header_offset: 17.0,
            caption_band_height: 24.0,
            border_space: 12.0,
            vertical_border_space: 4.0,
            caption_text_height: 16.0,
            description_width: 100.0,
            name_caption_x: 42.0,
            name_caption_width: 120.0,
            port_label_width: 42.0,
            icon_size: 16.0,
            result_icon_size: 17.0,
            time_label_width: 100.0,
            port_spacing: 20.0,
            corner_radius: 0.0,
            resize_handle_size: 7.0,
            resize_handle_inset: 10.0,
        }
    }
}

impl LayoutMetrics {
    /// Body rectangle, from below the header strip to the bottom of the node.
    pub fn body_rect(&self, size: Size) -> Rect {
        Rect::new(0.0, self.header_offset, size.width, size.height - self.header_offset)
    }

    /// Solid caption band at the top of the body, inset by the stroke.
    pub fn caption_band_rect(&self, size: Size) -> Rect {
        Rect::new(
            1.0,
            self.header_offset + 1.0,
            size.width - 2.0,
            self.caption_band_height - 1.0,
        )
    }

    /// Text box of the description inside the caption band.
    pub fn description_rect(&self) -> Rect {
        Rect::new(
            self.border_space,
            self.header_offset + self.vertical_border_space,
            self.description_width,
            self.caption_band_height - 2.0 * self.vertical_border_space,
        )
    }

    fn below_band(&self) -> f32 {
        self.header_offset + self.caption_band_height
    }

    pub fn name_caption_rect(&self) -> Rect {
        Rect::new(
            self.name_caption_x,
            self.below_band() + self.border_space,
            self.name_caption_width,
            self.caption_text_height,
        )
    }

    pub fn time_label_rect(&self) -> Rect {
        Rect::new(
            self.border_space,
            self.below_band() + 2.0 * self.border_space + self.caption_text_height,
            self.time_label_width,
            self.border_space,
        )
    }

    pub fn icon_rect(&self) -> Rect {
        Rect::new(
            self.border_space,
            self.below_band() + self.border_space,
            self.icon_size,
            self.icon_size,
        )
    }

    /// Result icon, anchored at the node origin.
    pub fn result_icon_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.result_icon_size, self.result_icon_size)
    }

    pub fn step_over_rect(&self, size: Size) -> Rect {
        Rect::new(
            size.width - self.border_space - self.icon_size,
            self.header_offset + (self.caption_band_height - self.icon_size) / 2.0,
            self.icon_size,
            self.icon_size,
        )
    }

    pub fn step_into_rect(&self, size: Size) -> Rect {
        let over = self.step_over_rect(size);
        Rect::new(
            over.x - self.icon_size - self.vertical_border_space,
            over.y,
            self.icon_size,
            self.icon_size,
        )
    }

    pub fn resize_handle_rect(&self, size: Size) -> Rect {
        Rect::new(
            size.width - self.resize_handle_inset,
            size.height - self.resize_handle_inset,
            self.resize_handle_size,
            self.resize_handle_size,
        )
    }

    /// Vertical position of the `index`th port on either side.
    pub fn port_y(&self, index: u32) -> f32 {
        self.below_band() + (index as f32 + 0.5) * self.port_spacing
    }
}

/// Geometry collaborator: where things are on a node.
///
/// Positions are node-local except [`node_position`](Self::node_position),
/// which is the node origin in scene coordinates. `None` means the geometry
/// is not known yet; the painter skips the affected element.
pub trait NodeLayout {
    fn node_size(&self, node_id: NodeId) -> Option<Size>;
    fn node_position(&self, node_id: NodeId) -> Option<Point>;
    fn port_position(&self, port: PortRef) -> Option<Point>;
    fn port_text_position(&self, port: PortRef) -> Option<Point>;
    fn resize_handle_rect(&self, node_id: NodeId) -> Option<Rect>;
    fn step_into_rect(&self, node_id: NodeId) -> Option<Rect>;
    fn step_over_rect(&self, node_id: NodeId) -> Option<Rect>;

    /// Map a scene point into the node's local coordinate space.
    fn scene_to_local(&self, node_id: NodeId, scene: Point) -> Option<Point> {
        let origin = self.node_position(node_id)?;
        Some(Point::new(scene.x - origin.x, scene.y - origin.y))
    }
}
