//! The draw steps that make up a node, in paint order.
//!
//! Each layer is a plain function over a [`PaintContext`]. Later layers
//! overlay earlier ones, so the order of [`Layer::ALL`] is part of the look.

use crate::geometry::{LayoutMetrics, NodeLayout, Point, Size};
use crate::icons::{result_icon_path, IconCache, STEP_INTO_ICON, STEP_OVER_ICON};
use crate::model::{make_complete_connection_id, GraphModel, NodeId, PortIndex, PortRef, PortType};
use crate::painter::{LinearGradient, Painter, Pen, TextStyle};
use crate::probe::{proximity_scale, PendingConnectionProbe};
use crate::style::{ConnectionStyle, NodeStyle};
use crate::visual_state::{HoverWidthPolicy, NodeInteraction, NodeVisualState};

/// Unfilled connection point radius, relative to the style diameter.
pub const CONNECTION_POINT_SCALE: f32 = 0.6;
/// Filled (connected) connection point radius, relative to the style diameter.
pub const FILLED_CONNECTION_POINT_SCALE: f32 = 0.4;

/// Side order of the port passes. Only affects z-order of overlapping markers.
const PORT_SIDES: [PortType; 2] = [PortType::Out, PortType::In];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    NodeRect,
    CaptionRect,
    ConnectionPoints,
    FilledConnectionPoints,
    NodeCaption,
    ElapsedTime,
    NodeIcon,
    StepControls,
    ResultIcon,
    EntryLabels,
    ResizeHandle,
}

impl Layer {
    /// All layers in paint order.
    pub const ALL: [Layer; 11] = [
        Layer::NodeRect,
        Layer::CaptionRect,
        Layer::ConnectionPoints,
        Layer::FilledConnectionPoints,
        Layer::NodeCaption,
        Layer::ElapsedTime,
        Layer::NodeIcon,
        Layer::StepControls,
        Layer::ResultIcon,
        Layer::EntryLabels,
        Layer::ResizeHandle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::NodeRect => "node-rect",
            Layer::CaptionRect => "caption-rect",
            Layer::ConnectionPoints => "connection-points",
            Layer::FilledConnectionPoints => "filled-connection-points",
            Layer::NodeCaption => "node-caption",
            Layer::ElapsedTime => "elapsed-time",
            Layer::NodeIcon => "node-icon",
            Layer::StepControls => "step-controls",
            Layer::ResultIcon => "result-icon",
            Layer::EntryLabels => "entry-labels",
            Layer::ResizeHandle => "resize-handle",
        }
    }

    /// Port labels are off in the stock look.
    pub fn enabled_by_default(self) -> bool {
        self != Layer::EntryLabels
    }

    pub fn default_step(self) -> fn(&PaintContext<'_>, &mut dyn Painter) {
        match self {
            Layer::NodeRect => draw_node_rect,
            Layer::CaptionRect => draw_caption_rect,
            Layer::ConnectionPoints => draw_connection_points,
            Layer::FilledConnectionPoints => draw_filled_connection_points,
            Layer::NodeCaption => draw_node_caption,
            Layer::ElapsedTime => draw_elapsed_time,
            Layer::NodeIcon => draw_node_icon,
            Layer::StepControls => draw_step_controls,
            Layer::ResultIcon => draw_result_icon,
            Layer::EntryLabels => draw_entry_labels,
            Layer::ResizeHandle => draw_resize_handle,
        }
    }
}

/// Everything a draw step may consult for one node.
///
/// Built once per node per repaint pass; the probe, if any, has already been
/// narrowed to this node.
pub struct PaintContext<'a> {
    pub node_id: NodeId,
    pub model: &'a dyn GraphModel,
    pub layout: &'a dyn NodeLayout,
    pub style: &'a NodeStyle,
    pub connection_style: &'a ConnectionStyle,
    pub metrics: &'a LayoutMetrics,
    pub icons: &'a IconCache,
    pub size: Size,
    pub interaction: NodeInteraction,
    pub state: NodeVisualState,
    pub hover_width: HoverWidthPolicy,
    pub probe: Option<&'a PendingConnectionProbe>,
}

impl PaintContext<'_> {
    fn port_ref(&self, port_type: PortType, index: PortIndex) -> PortRef {
        PortRef::new(self.node_id, port_type, index)
    }

    /// Marker scale for one port under the active probe, `1.0` without one.
    pub fn probe_scale(&self, port_type: PortType, index: PortIndex, port_pos: Point) -> f32 {
        let Some(probe) = self.probe else {
            return 1.0;
        };
        if probe.required_port() != port_type {
            return 1.0;
        }
        let Some(end) = self.layout.scene_to_local(self.node_id, probe.end_point) else {
            return 1.0;
        };
        let candidate = make_complete_connection_id(probe.anchor, self.node_id, index);
        let possible = self.model.connection_possible(candidate);
        proximity_scale(possible, end.distance_to(port_pos))
    }

    fn port_color(&self, port_type: PortType, index: PortIndex, fallback: slint::Color) -> slint::Color {
        let data_type = self.model.port_data_type(self.node_id, port_type, index);
        self.connection_style
            .data_type_color(&data_type.id)
            .unwrap_or(fallback)
    }

    fn boundary_pen(&self) -> Pen {
        let hover_width = self.hover_width.use_hover_width(self.state, self.interaction);
        Pen::new(self.style.boundary_color(self.state), self.style.boundary_width(hover_width))
    }
}

pub fn draw_node_rect(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    let [c0, c1, c2, c3] = ctx.style.gradient_colors;
    let gradient = LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(2.0, ctx.size.height),
        stops: vec![(0.0, c0), (0.1, c1), (0.9, c2), (1.0, c3)],
    };
    painter.draw_rounded_rect(
        ctx.metrics.body_rect(ctx.size),
        ctx.metrics.corner_radius,
        ctx.boundary_pen(),
        &gradient,
    );
}

pub fn draw_caption_rect(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    painter.fill_rect(
        ctx.metrics.caption_band_rect(ctx.size),
        ctx.style.caption_rect_color(ctx.state),
    );

    let rect = ctx.metrics.description_rect();
    let description = ctx.model.description(ctx.node_id);
    let text = painter.elide_text(&description, rect.width, false);
    painter.draw_text(rect, &text, TextStyle { color: ctx.style.description_color, bold: false });
}

pub fn draw_connection_points(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    let radius = ctx.style.connection_point_diameter * CONNECTION_POINT_SCALE;
    let outline = ctx.boundary_pen();

    for port_type in PORT_SIDES {
        for index in 0..ctx.model.port_count(ctx.node_id, port_type) {
            let Some(pos) = ctx.layout.port_position(ctx.port_ref(port_type, index)) else {
                continue;
            };
            let r = ctx.probe_scale(port_type, index, pos);
            let color = ctx.port_color(port_type, index, ctx.style.connection_point_color);
            painter.draw_ellipse(pos, radius * r, radius * r, color, Some(outline));
        }
    }
}

pub fn draw_filled_connection_points(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    let radius = ctx.style.connection_point_diameter * FILLED_CONNECTION_POINT_SCALE;

    for port_type in PORT_SIDES {
        for index in 0..ctx.model.port_count(ctx.node_id, port_type) {
            if ctx.model.connections(ctx.node_id, port_type, index).is_empty() {
                continue;
            }
            let Some(pos) = ctx.layout.port_position(ctx.port_ref(port_type, index)) else {
                continue;
            };
            let color = ctx.port_color(port_type, index, ctx.style.filled_connection_point_color);
            painter.draw_ellipse(pos, radius, radius, color, Some(Pen::new(color, 1.0)));
        }
    }
}

pub fn draw_node_caption(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    if !ctx.model.caption_visible(ctx.node_id) {
        return;
    }
    let rect = ctx.metrics.name_caption_rect();
    let name = ctx.model.caption(ctx.node_id);
    let text = painter.elide_text(&name, rect.width, true);
    painter.draw_text(rect, &text, TextStyle { color: ctx.style.font_color, bold: true });
}

pub fn draw_elapsed_time(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    let ms = ctx.model.elapsed_ms(ctx.node_id);
    if ms == 0 {
        return;
    }
    painter.draw_text(
        ctx.metrics.time_label_rect(),
        &format!("time:{ms}ms"),
        TextStyle { color: ctx.style.time_color, bold: false },
    );
}

pub fn draw_node_icon(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    let path = ctx.model.icon_path(ctx.node_id);
    if let Some(icon) = ctx.icons.node_icon(&path, ctx.state) {
        painter.draw_image(ctx.metrics.icon_rect(), &icon);
    }
}

pub fn draw_step_controls(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    let controls = [
        (ctx.layout.step_into_rect(ctx.node_id), STEP_INTO_ICON),
        (ctx.layout.step_over_rect(ctx.node_id), STEP_OVER_ICON),
    ];
    for (rect, path) in controls {
        if let (Some(rect), Some(icon)) = (rect, ctx.icons.get(path)) {
            painter.draw_image(rect, &icon);
        }
    }
}

pub fn draw_result_icon(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    let Some(path) = result_icon_path(ctx.model.result(ctx.node_id)) else {
        return;
    };
    if let Some(icon) = ctx.icons.get(path) {
        painter.draw_image(ctx.metrics.result_icon_rect(), &icon);
    }
}

pub fn draw_entry_labels(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    let model = ctx.model;
    let node = ctx.node_id;

    for port_type in PORT_SIDES {
        for index in 0..model.port_count(node, port_type) {
            let Some(anchor) = ctx.layout.port_text_position(ctx.port_ref(port_type, index)) else {
                continue;
            };
            let color = if model.connections(node, port_type, index).is_empty() {
                ctx.style.font_color_faded
            } else {
                ctx.style.font_color
            };
            let label = if model.port_caption_visible(node, port_type, index) {
                model.port_caption(node, port_type, index)
            } else {
                model.port_data_type(node, port_type, index).name
            };
            painter.draw_text_at(anchor, &label, color);
        }
    }
}

pub fn draw_resize_handle(ctx: &PaintContext<'_>, painter: &mut dyn Painter) {
    if !ctx.model.flags(ctx.node_id).resizable {
        return;
    }
    if let Some(rect) = ctx.layout.resize_handle_rect(ctx.node_id) {
        painter.draw_ellipse(
            rect.center(),
            rect.width / 2.0,
            rect.height / 2.0,
            ctx.style.resize_handle_color,
            None,
        );
    }
}
