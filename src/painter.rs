//! The drawing seam between the paint orchestration and a rendering backend.
//!
//! [`Painter`] is the small set of primitives the node layers need. A Slint
//! application implements it on top of whatever renders its canvas (a
//! software buffer, a `Path`/`Rectangle` model, an SVG string...).
//! [`RecordingPainter`] records the calls instead, for tests and snapshots.

use slint::{Color, SharedString};

use crate::geometry::{Point, Rect};
use crate::icons::Icon;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f32,
}

impl Pen {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Linear gradient in node-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    /// `(position, color)` with positions in `0.0..=1.0`, ascending.
    pub stops: Vec<(f32, Color)>,
}

/// Text is always left aligned and vertically centered in its box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub bold: bool,
}

/// Rendering backend used by the node layers.
///
/// All coordinates are node-local. Each call carries its complete style, so
/// no pen, brush or font state leaks from one draw step into the next.
pub trait Painter {
    fn draw_rounded_rect(&mut self, rect: Rect, radius: f32, pen: Pen, fill: &LinearGradient);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Ellipse centered at `center`; `pen` of `None` draws no outline.
    fn draw_ellipse(&mut self, center: Point, rx: f32, ry: f32, fill: Color, pen: Option<Pen>);

    /// Text left aligned and vertically centered in `rect`.
    fn draw_text(&mut self, rect: Rect, text: &str, style: TextStyle);

    /// Text starting at a baseline anchor.
    fn draw_text_at(&mut self, anchor: Point, text: &str, color: Color);

    /// Image scaled into `rect`.
    fn draw_image(&mut self, rect: Rect, icon: &Icon);

    /// Shorten `text` with a trailing ellipsis so it fits `max_width`.
    fn elide_text(&self, text: &str, max_width: f32, bold: bool) -> String;
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    RoundedRect { rect: Rect, radius: f32, pen: Pen, fill: LinearGradient },
    FillRect { rect: Rect, color: Color },
    Ellipse { center: Point, rx: f32, ry: f32, fill: Color, pen: Option<Pen> },
    Text { rect: Rect, text: SharedString, style: TextStyle },
    TextAt { anchor: Point, text: SharedString, color: Color },
    Image { rect: Rect, source: SharedString },
}

/// Painter that records every call, with fixed-advance font metrics.
#[derive(Debug, Clone)]
pub struct RecordingPainter {
    pub commands: Vec<DrawCommand>,
    /// Advance of one character in the regular font.
    pub char_width: f32,
    /// Advance of one character in the bold font.
    pub bold_char_width: f32,
}

impl Default for RecordingPainter {
    fn default() -> Self {
        Self { commands: Vec::new(), char_width: 7.0, bold_char_width: 8.0 }
    }
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded commands, leaving the painter empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } | DrawCommand::TextAt { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image { source, .. } => Some(source.as_str()),
            _ => None,
        })
    }

    pub fn ellipses(&self) -> impl Iterator<Item = (Point, f32, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Ellipse { center, rx, fill, .. } => Some((*center, *rx, *fill)),
            _ => None,
        })
    }
}

impl Painter for RecordingPainter {
    fn draw_rounded_rect(&mut self, rect: Rect, radius: f32, pen: Pen, fill: &LinearGradient) {
        self.commands.push(DrawCommand::RoundedRect { rect, radius, pen, fill: fill.clone() });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_ellipse(&mut self, center: Point, rx: f32, ry: f32, fill: Color, pen: Option<Pen>) {
        self.commands.push(DrawCommand::Ellipse { center, rx, ry, fill, pen });
    }

    fn draw_text(&mut self, rect: Rect, text: &str, style: TextStyle) {
        self.commands.push(DrawCommand::Text { rect, text: text.into(), style });
    }

    fn draw_text_at(&mut self, anchor: Point, text: &str, color: Color) {
        self.commands.push(DrawCommand::TextAt { anchor, text: text.into(), color });
    }

    fn draw_image(&mut self, rect: Rect, icon: &Icon) {
        self.commands.push(DrawCommand::Image { rect, source: icon.source.clone() });
    }

    fn elide_text(&self, text: &str, max_width: f32, bold: bool) -> String {
        let advance = if bold { self.bold_char_width } else { self.char_width };
        let len = text.chars().count();
        if len as f32 * advance <= max_width {
            return text.to_owned();
        }
        // One advance is reserved for the ellipsis.
        let keep = ((max_width / advance).floor() as usize).saturating_sub(1);
        let mut elided: String = text.chars().take(keep).collect();
        elided.push('…');
        elided
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elide_keeps_short_text() {
        let painter = RecordingPainter::new();
        assert_eq!(painter.elide_text("Add", 100.0, false), "Add");
        assert_eq!(painter.elide_text("", 0.0, false), "");
    }

    #[test]
    fn test_elide_shortens_long_text() {
        let painter = RecordingPainter::new();
        // 10 regular chars fit 70px: 9 kept plus the ellipsis.
        let elided = painter.elide_text("abcdefghijklmnop", 70.0, false);
        assert_eq!(elided, "abcdefghi…");
    }

    #[test]
    fn test_elide_uses_bold_advance() {
        let painter = RecordingPainter::new();
        assert_eq!(painter.elide_text("abcdefghij", 70.0, false), "abcdefghij");
        assert_eq!(painter.elide_text("abcdefghij", 70.0, true), "abcdefg…");
    }

    #[test]
    fn test_recording_and_take() {
        let mut painter = RecordingPainter::new();
        painter.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::from_rgb_u8(1, 2, 3));
        painter.draw_text_at(Point::new(1.0, 2.0), "in", Color::default());

        assert_eq!(painter.texts().collect::<Vec<_>>(), vec!["in"]);
        assert_eq!(painter.take().len(), 2);
        assert!(painter.commands.is_empty());
    }
}
