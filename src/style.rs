//! Node and connection styles.
//!
//! Styles are plain values handed to the painter; there is no global style
//! registry. They load from the JSON documents graph models attach to nodes:
//!
//! ```json
//! { "NodeStyle": { "NormalBoundaryColor": [255, 255, 255], "PenWidth": 1.5 } }
//! ```
//!
//! Colors are `[r, g, b]`, `[r, g, b, a]`, `"#rrggbb"`, `"#aarrggbb"` or one
//! of a few names (`white`, `black`, `gray`, `darkgray`, `lightgray`, `red`,
//! `green`, `blue`, `cyan`, `orange`, `transparent`).

use std::collections::HashMap;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::{Map, Value};
use slint::Color;
use thiserror::Error;

use crate::visual_state::NodeVisualState;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("style is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("style root must be a JSON object")]
    NotAnObject,

    #[error("invalid color for '{key}': {value}")]
    InvalidColor { key: String, value: Value },

    #[error("invalid number for '{key}': {value}")]
    InvalidNumber { key: String, value: Value },

    #[error("invalid flag for '{key}': {value}")]
    InvalidFlag { key: String, value: Value },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Channels(Vec<u8>),
    Text(String),
}

fn named_color(name: &str) -> Option<Color> {
    let c = match name.to_ascii_lowercase().as_str() {
        "white" => Color::from_rgb_u8(255, 255, 255),
        "black" => Color::from_rgb_u8(0, 0, 0),
        "gray" | "grey" => Color::from_rgb_u8(160, 160, 164),
        "darkgray" | "darkgrey" => Color::from_rgb_u8(128, 128, 128),
        "lightgray" | "lightgrey" => Color::from_rgb_u8(192, 192, 192),
        "red" => Color::from_rgb_u8(255, 0, 0),
        "green" => Color::from_rgb_u8(0, 255, 0),
        "blue" => Color::from_rgb_u8(0, 0, 255),
        "cyan" => Color::from_rgb_u8(0, 255, 255),
        "orange" => Color::from_rgb_u8(255, 165, 0),
        "transparent" => Color::from_argb_u8(0, 0, 0, 0),
        _ => return None,
    };
    Some(c)
}

fn hex_color(text: &str) -> Option<Color> {
    let hex = text.strip_prefix('#')?;
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Color::from_rgb_u8(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::from_argb_u8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// Parse one color value in any of the accepted notations.
pub fn parse_color(value: &Value) -> Option<Color> {
    match ColorRepr::deserialize(value).ok()? {
        ColorRepr::Channels(c) => match c.as_slice() {
            [r, g, b] => Some(Color::from_rgb_u8(*r, *g, *b)),
            [r, g, b, a] => Some(Color::from_argb_u8(*a, *r, *g, *b)),
            _ => None,
        },
        ColorRepr::Text(text) => hex_color(&text).or_else(|| named_color(&text)),
    }
}

/// Parse `text` and return the object holding the style keys, unwrapping
/// the `section` key (`"NodeStyle"`, `"ConnectionStyle"`) when present.
fn style_object(text: &str, section: &str) -> Result<Map<String, Value>, StyleError> {
    let Value::Object(mut root) = serde_json::from_str::<Value>(text)? else {
        return Err(StyleError::NotAnObject);
    };
    match root.remove(section) {
        Some(Value::Object(inner)) => Ok(inner),
        Some(_) => Err(StyleError::NotAnObject),
        None => Ok(root),
    }
}

fn read_color(slot: &mut Color, key: &str, value: &Value, errors: &mut Vec<StyleError>) {
    match parse_color(value) {
        Some(c) => *slot = c,
        None => errors.push(StyleError::InvalidColor { key: key.to_owned(), value: value.clone() }),
    }
}

fn read_number(slot: &mut f32, key: &str, value: &Value, errors: &mut Vec<StyleError>) {
    match value.as_f64() {
        Some(n) if n.is_finite() && n >= 0.0 => *slot = n as f32,
        _ => errors.push(StyleError::InvalidNumber { key: key.to_owned(), value: value.clone() }),
    }
}

/// Visual parameters of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub normal_boundary_color: Color,
    pub selected_boundary_color: Color,
    pub hover_boundary_color: Color,
    pub operation_boundary_color: Color,
    pub pen_width: f32,
    pub hovered_pen_width: f32,
    /// Body gradient stops at 0%, 10%, 90% and 100%.
    pub gradient_colors: [Color; 4],
    pub connection_point_color: Color,
    pub filled_connection_point_color: Color,
    pub connection_point_diameter: f32,
    pub font_color: Color,
    pub font_color_faded: Color,
    pub normal_caption_rect_color: Color,
    pub selected_caption_rect_color: Color,
    pub hover_caption_rect_color: Color,
    pub operation_caption_rect_color: Color,
    pub description_color: Color,
    pub time_color: Color,
    pub resize_handle_color: Color,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            normal_boundary_color: Color::from_rgb_u8(255, 255, 255),
            selected_boundary_color: Color::from_rgb_u8(255, 165, 0),
            hover_boundary_color: Color::from_rgb_u8(100, 180, 255),
            operation_boundary_color: Color::from_rgb_u8(80, 200, 120),
            pen_width: 1.0,
            hovered_pen_width: 1.5,
            gradient_colors: [
                Color::from_rgb_u8(160, 160, 164),
                Color::from_rgb_u8(80, 80, 80),
                Color::from_rgb_u8(64, 64, 64),
                Color::from_rgb_u8(58, 58, 58),
            ],
            connection_point_color: Color::from_rgb_u8(169, 169, 169),
            filled_connection_point_color: Color::from_rgb_u8(0, 255, 255),
            connection_point_diameter: 8.0,
            font_color: Color::from_rgb_u8(255, 255, 255),
            font_color_faded: Color::from_rgb_u8(160, 160, 164),
            normal_caption_rect_color: Color::from_rgb_u8(0x25, 0x37, 0x49),
            selected_caption_rect_color: Color::from_rgb_u8(0x2f, 0x4b, 0x66),
            hover_caption_rect_color: Color::from_rgb_u8(0x34, 0x50, 0x6b),
            operation_caption_rect_color: Color::from_rgb_u8(0x1f, 0x6f, 0x43),
            description_color: Color::from_argb_u8(204, 255, 255, 255),
            time_color: Color::from_rgb_u8(0xa7, 0xa7, 0xa7),
            resize_handle_color: Color::from_rgb_u8(160, 160, 164),
        }
    }
}

impl NodeStyle {
    /// Parse a style document. Any invalid value is an error.
    pub fn from_json(text: &str) -> Result<Self, StyleError> {
        let object = style_object(text, "NodeStyle")?;
        let mut style = Self::default();
        match style.apply(&object).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(style),
        }
    }

    /// Parse a style document, keeping the default for every key that is
    /// missing or invalid. An unparsable document yields the default style.
    pub fn from_json_lenient(text: &str) -> Self {
        Self::default().overlaid_lenient(text)
    }

    /// Apply a style document on top of `self`, leniently. Keys the document
    /// leaves out or gets wrong keep the value from `self`.
    pub fn overlaid_lenient(&self, text: &str) -> Self {
        let object = match style_object(text, "NodeStyle") {
            Ok(object) => object,
            Err(err) => {
                log::warn!("falling back to default node style: {err}");
                return self.clone();
            }
        };
        let mut style = self.clone();
        for err in style.apply(&object) {
            log::warn!("node style: {err}, keeping default");
        }
        style
    }

    fn apply(&mut self, object: &Map<String, Value>) -> Vec<StyleError> {
        let mut errors = Vec::new();
        for (key, value) in object {
            let e = &mut errors;
            match key.as_str() {
                "NormalBoundaryColor" => read_color(&mut self.normal_boundary_color, key, value, e),
                "SelectedBoundaryColor" => read_color(&mut self.selected_boundary_color, key, value, e),
                "HoverBoundaryColor" => read_color(&mut self.hover_boundary_color, key, value, e),
                "OperationBoundaryColor" => read_color(&mut self.operation_boundary_color, key, value, e),
                "PenWidth" => read_number(&mut self.pen_width, key, value, e),
                "HoveredPenWidth" => read_number(&mut self.hovered_pen_width, key, value, e),
                "GradientColor0" => read_color(&mut self.gradient_colors[0], key, value, e),
                "GradientColor1" => read_color(&mut self.gradient_colors[1], key, value, e),
                "GradientColor2" => read_color(&mut self.gradient_colors[2], key, value, e),
                "GradientColor3" => read_color(&mut self.gradient_colors[3], key, value, e),
                "ConnectionPointColor" => read_color(&mut self.connection_point_color, key, value, e),
                "FilledConnectionPointColor" => {
                    read_color(&mut self.filled_connection_point_color, key, value, e)
                }
                "ConnectionPointDiameter" => read_number(&mut self.connection_point_diameter, key, value, e),
                "FontColor" => read_color(&mut self.font_color, key, value, e),
                "FontColorFaded" => read_color(&mut self.font_color_faded, key, value, e),
                "NormalCaptionRectColor" => read_color(&mut self.normal_caption_rect_color, key, value, e),
                "SelectedCaptionRectColor" => {
                    read_color(&mut self.selected_caption_rect_color, key, value, e)
                }
                "HoverCaptionRectColor" => read_color(&mut self.hover_caption_rect_color, key, value, e),
                "OperationCaptionRectColor" => {
                    read_color(&mut self.operation_caption_rect_color, key, value, e)
                }
                "DescriptionColor" => read_color(&mut self.description_color, key, value, e),
                "TimeColor" => read_color(&mut self.time_color, key, value, e),
                "ResizeHandleColor" => read_color(&mut self.resize_handle_color, key, value, e),
                other => log::trace!("node style: ignoring key '{other}'"),
            }
        }
        errors
    }

    pub fn boundary_color(&self, state: NodeVisualState) -> Color {
        match state {
            NodeVisualState::Running => self.operation_boundary_color,
            NodeVisualState::Hovered => self.hover_boundary_color,
            NodeVisualState::Selected => self.selected_boundary_color,
            NodeVisualState::Normal => self.normal_boundary_color,
        }
    }

    pub fn caption_rect_color(&self, state: NodeVisualState) -> Color {
        match state {
            NodeVisualState::Running => self.operation_caption_rect_color,
            NodeVisualState::Hovered => self.hover_caption_rect_color,
            NodeVisualState::Selected => self.selected_caption_rect_color,
            NodeVisualState::Normal => self.normal_caption_rect_color,
        }
    }

    pub fn boundary_width(&self, use_hover_width: bool) -> f32 {
        if use_hover_width {
            self.hovered_pen_width
        } else {
            self.pen_width
        }
    }
}

/// Connection related colors, shared by all nodes of a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionStyle {
    /// Color ports and connections by their data type instead of by style.
    pub use_data_defined_colors: bool,
}

impl ConnectionStyle {
    pub fn from_json(text: &str) -> Result<Self, StyleError> {
        let object = style_object(text, "ConnectionStyle")?;
        let mut style = Self::default();
        let mut errors = Vec::new();
        for (key, value) in &object {
            match key.as_str() {
                "UseDataDefinedColors" => match value.as_bool() {
                    Some(flag) => style.use_data_defined_colors = flag,
                    None => errors.push(StyleError::InvalidFlag { key: key.clone(), value: value.clone() }),
                },
                other => log::trace!("connection style: ignoring key '{other}'"),
            }
        }
        match errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(style),
        }
    }

    /// Color for ports of the given data type, `None` when data-defined
    /// colors are off and the node style decides.
    pub fn data_type_color(&self, type_id: &str) -> Option<Color> {
        self.use_data_defined_colors.then(|| data_type_palette_color(type_id))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Stable color for a data type id: hue from the id hash, fixed lightness.
pub fn data_type_palette_color(type_id: &str) -> Color {
    let hash = fnv1a(type_id.as_bytes());
    let hue = (hash % 255) as f32 / 255.0 * 360.0;
    let saturation = (120 + (hash >> 8) % 129) as f32 / 255.0;
    let (r, g, b) = hsl_to_rgb(hue, saturation, 160.0 / 255.0);
    Color::from_rgb_u8(r, g, b)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

/// Parsed node styles keyed by their JSON text.
///
/// Models usually hand out the same few style documents for every node, so
/// each distinct document is parsed once.
#[derive(Debug, Default)]
pub struct StyleCache {
    default: Rc<NodeStyle>,
    parsed: HashMap<String, Rc<NodeStyle>>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `style` for nodes whose model reports no style document.
    pub fn with_default(style: NodeStyle) -> Self {
        Self { default: Rc::new(style), parsed: HashMap::new() }
    }

    pub fn resolve(&mut self, json: Option<&str>) -> Rc<NodeStyle> {
        let Some(json) = json.filter(|j| !j.trim().is_empty()) else {
            return self.default.clone();
        };
        if let Some(style) = self.parsed.get(json) {
            return style.clone();
        }
        let style = Rc::new(self.default.overlaid_lenient(json));
        self.parsed.insert(json.to_owned(), style.clone());
        style
    }

    /// Drop parsed styles, e.g. after a theme change.
    pub fn clear(&mut self) {
        self.parsed.clear();
    }

    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}
