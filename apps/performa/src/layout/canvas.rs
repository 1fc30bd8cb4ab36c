//! A recording canvas: drawing calls become a positioned display list.
//!
//! Coordinates are PostScript points with the origin at the bottom-left of the
//! page. Alignment is resolved here, so every `DrawOp::Text` carries the final
//! left baseline position and the PDF backend never measures text.

use crate::layout::font_metrics::{string_width, Font};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
}

/// Brand accent (#D44826) used for headings, GSTIN and signatory captions.
pub const ACCENT: Rgb = Rgb {
    r: 0.831,
    g: 0.282,
    b: 0.149,
};
/// Darker orange (#D14000) used for the item table and bank-details headings.
pub const TABLE_ACCENT: Rgb = Rgb {
    r: 0.820,
    g: 0.251,
    b: 0.0,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    LineWidth(f32),
    FillColor(Rgb),
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    /// Stroked rectangle; `(x, y)` is the lower-left corner.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        text: String,
    },
    /// Slot for the company logo, fitted inside the box preserving aspect ratio.
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// One finished page of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub label: String,
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
impl PageContent {
    /// All text runs on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Position of the first text run equal to `needle`.
    pub fn find_text(&self, needle: &str) -> Option<(f32, f32)> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Text { x, y, text, .. } if text == needle => Some((*x, *y)),
            _ => None,
        })
    }
}

/// Records drawing calls with a current font, mirroring a PDF content stream.
pub struct Canvas {
    ops: Vec<DrawOp>,
    font: Font,
    font_size: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Canvas {
            ops: Vec::new(),
            font: Font::Helvetica,
            font_size: 12.0,
        }
    }

    pub fn set_font(&mut self, font: Font, size: f32) {
        self.font = font;
        self.font_size = size;
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    pub fn set_fill_color(&mut self, color: Rgb) {
        self.ops.push(DrawOp::FillColor(color));
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn logo(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Logo {
            x,
            y,
            width,
            height,
        });
    }

    /// Width of `text` in the current font.
    pub fn string_width(&self, text: &str) -> f32 {
        string_width(text, self.font, self.font_size)
    }

    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            x,
            y,
            font: self.font,
            size: self.font_size,
            text: text.to_string(),
        });
    }

    pub fn draw_centred_string(&mut self, x: f32, y: f32, text: &str) {
        let w = self.string_width(text);
        self.draw_string(x - w / 2.0, y, text);
    }

    pub fn draw_right_string(&mut self, x: f32, y: f32, text: &str) {
        let w = self.string_width(text);
        self.draw_string(x - w, y, text);
    }

    pub fn finish(self, label: &str, width: f32, height: f32) -> PageContent {
        PageContent {
            label: label.to_string(),
            width,
            height,
            ops: self.ops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_string_ends_at_anchor() {
        let mut canvas = Canvas::new();
        canvas.set_font(Font::Helvetica, 7.0);
        canvas.draw_right_string(100.0, 50.0, "1350.00");
        let page = canvas.finish("t", 200.0, 200.0);
        let (x, y) = page.find_text("1350.00").unwrap();
        let w = string_width("1350.00", Font::Helvetica, 7.0);
        assert!((x + w - 100.0).abs() < 1e-4);
        assert_eq!(y, 50.0);
    }

    #[test]
    fn test_centred_string_straddles_anchor() {
        let mut canvas = Canvas::new();
        canvas.set_font(Font::HelveticaBold, 9.0);
        canvas.draw_centred_string(300.0, 10.0, "Authorised Signatory");
        let page = canvas.finish("t", 600.0, 800.0);
        let (x, _) = page.find_text("Authorised Signatory").unwrap();
        let w = string_width("Authorised Signatory", Font::HelveticaBold, 9.0);
        assert!((x + w / 2.0 - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_text_is_not_recorded() {
        let mut canvas = Canvas::new();
        canvas.draw_string(0.0, 0.0, "");
        canvas.draw_centred_string(0.0, 0.0, "");
        assert!(canvas.finish("t", 1.0, 1.0).ops.is_empty());
    }
}
