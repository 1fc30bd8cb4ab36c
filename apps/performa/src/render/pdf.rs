//! printpdf backend for laid-out invoice pages.
//!
//! Every `PageContent` becomes one page of a single document, so all copies
//! of an invoice come out already merged. Coordinates arrive in points and
//! are converted to printpdf's millimetres here.

use std::io::BufWriter;
use std::path::Path;

use printpdf::image_crate::{self, DynamicImage, GenericImageView, RgbImage};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::layout::canvas::{self, DrawOp, PageContent};
use crate::layout::font_metrics::Font;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no pages to render")]
    Empty,
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("logo image could not be decoded: {0}")]
    Image(String),
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Logo
// ────────────────────────────────────────────────────────────────────────────

/// A decoded company logo, flattened onto white.
#[derive(Debug, Clone)]
pub struct Logo {
    image: DynamicImage,
}

impl Logo {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RenderError> {
        let decoded =
            image_crate::load_from_memory(bytes).map_err(|e| RenderError::Image(e.to_string()))?;
        Ok(Logo {
            image: flatten_on_white(&decoded),
        })
    }

    /// Loads the logo at `path`. A missing file is normal and yields `None`;
    /// an unreadable one is logged and also yields `None`.
    pub fn load(path: &Path) -> Option<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No logo file; rendering without logo");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read logo file");
                return None;
            }
        };
        match Self::from_bytes(&bytes) {
            Ok(logo) => {
                info!(
                    path = %path.display(),
                    width = logo.image.width(),
                    height = logo.image.height(),
                    "Loaded logo"
                );
                Some(logo)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping logo");
                None
            }
        }
    }

    /// Placement that fits the image inside the box, centred, keeping its
    /// aspect ratio. Images are placed at 72 dpi so one pixel is one point.
    fn transform(&self, x: f32, y: f32, width: f32, height: f32) -> ImageTransform {
        let (px_w, px_h) = self.image.dimensions();
        let (px_w, px_h) = (px_w.max(1) as f32, px_h.max(1) as f32);
        let scale = (width / px_w).min(height / px_h);
        let drawn_w = px_w * scale;
        let drawn_h = px_h * scale;
        ImageTransform {
            translate_x: Some(mm(x + (width - drawn_w) / 2.0)),
            translate_y: Some(mm(y + (height - drawn_h) / 2.0)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(72.0),
            ..Default::default()
        }
    }
}

fn flatten_on_white(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| ((u16::from(c) * u16::from(a) + 255 * (255 - u16::from(a))) / 255) as u8;
        image_crate::Rgb([blend(r), blend(g), blend(b)])
    });
    DynamicImage::ImageRgb8(flat)
}

// ────────────────────────────────────────────────────────────────────────────
// Document writer
// ────────────────────────────────────────────────────────────────────────────

struct FontSet {
    regular: IndirectFontRef,
    oblique: IndirectFontRef,
    bold: IndirectFontRef,
    bold_oblique: IndirectFontRef,
}

impl FontSet {
    fn register(doc: &PdfDocumentReference) -> Result<Self, RenderError> {
        let add = |font| {
            doc.add_builtin_font(font)
                .map_err(|e| RenderError::Pdf(e.to_string()))
        };
        Ok(FontSet {
            regular: add(BuiltinFont::Helvetica)?,
            oblique: add(BuiltinFont::HelveticaOblique)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            bold_oblique: add(BuiltinFont::HelveticaBoldOblique)?,
        })
    }

    fn get(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Helvetica => &self.regular,
            Font::HelveticaOblique => &self.oblique,
            Font::HelveticaBold => &self.bold,
            Font::HelveticaBoldOblique => &self.bold_oblique,
        }
    }
}

/// Writes `pages` as one PDF, in order. The logo slot is left empty when
/// `logo` is `None`.
pub fn write_pdf(
    title: &str,
    pages: &[PageContent],
    logo: Option<&Logo>,
) -> Result<Vec<u8>, RenderError> {
    let first = pages.first().ok_or(RenderError::Empty)?;
    let (doc, page_index, layer_index) =
        PdfDocument::new(title, mm(first.width), mm(first.height), first.label.as_str());
    let fonts = FontSet::register(&doc)?;

    draw_page(&doc.get_page(page_index).get_layer(layer_index), first, &fonts, logo);
    for page in &pages[1..] {
        let (page_index, layer_index) = doc.add_page(mm(page.width), mm(page.height), page.label.as_str());
        draw_page(&doc.get_page(page_index).get_layer(layer_index), page, &fonts, logo);
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

fn draw_page(layer: &PdfLayerReference, page: &PageContent, fonts: &FontSet, logo: Option<&Logo>) {
    set_fill(layer, canvas::Rgb::BLACK);
    for op in &page.ops {
        match op {
            DrawOp::LineWidth(width) => layer.set_outline_thickness(*width),
            DrawOp::FillColor(color) => set_fill(layer, *color),
            DrawOp::Line { x1, y1, x2, y2 } => {
                layer.add_line(polyline(&[(*x1, *y1), (*x2, *y2)], false));
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
            } => {
                let corners = [
                    (*x, *y),
                    (x + width, *y),
                    (x + width, y + height),
                    (*x, y + height),
                ];
                layer.add_line(polyline(&corners, true));
            }
            DrawOp::Text {
                x,
                y,
                font,
                size,
                text,
            } => {
                layer.use_text(text.as_str(), *size, mm(*x), mm(*y), fonts.get(*font));
            }
            DrawOp::Logo {
                x,
                y,
                width,
                height,
            } => {
                if let Some(logo) = logo {
                    Image::from_dynamic_image(&logo.image)
                        .add_to_layer(layer.clone(), logo.transform(*x, *y, *width, *height));
                }
            }
        }
    }
}

fn set_fill(layer: &PdfLayerReference, color: canvas::Rgb) {
    layer.set_fill_color(Color::Rgb(Rgb::new(color.r, color.g, color.b, None)));
}

fn polyline(points: &[(f32, f32)], is_closed: bool) -> Line {
    Line {
        points: points
            .iter()
            .map(|&(x, y)| (Point::new(mm(x), mm(y)), false))
            .collect(),
        is_closed,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::invoice::tax::AmountRounding;
    use crate::layout::{render_document, Letterhead};
    use crate::models::invoice::InvoiceHeader;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image_crate::RgbaImage::from_pixel(width, height, image_crate::Rgba([200, 80, 30, 128]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image_crate::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn pages() -> Vec<PageContent> {
        render_document(
            "PTPL/2025-26/001",
            &InvoiceHeader::default(),
            &[],
            &Letterhead::default(),
            AmountRounding::WholeRupees,
        )
        .unwrap()
    }

    #[test]
    fn test_writes_pdf_without_logo() {
        let bytes = write_pdf("PTPL/2025-26/001", &pages(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_writes_pdf_with_logo() {
        let logo = Logo::from_bytes(&png_bytes(240, 65)).unwrap();
        let with_logo = write_pdf("t", &pages(), Some(&logo)).unwrap();
        let without = write_pdf("t", &pages(), None).unwrap();
        assert!(with_logo.starts_with(b"%PDF"));
        assert!(with_logo.len() > without.len());
    }

    #[test]
    fn test_empty_page_list_is_an_error() {
        assert!(matches!(write_pdf("t", &[], None), Err(RenderError::Empty)));
    }

    #[test]
    fn test_logo_fits_box_and_keeps_aspect() {
        let logo = Logo::from_bytes(&png_bytes(240, 65)).unwrap();
        let t = logo.transform(100.0, 200.0, 120.0, 65.0);
        let scale = t.scale_x.unwrap();
        assert!((scale - 0.5).abs() < 1e-6);
        assert_eq!(t.scale_x, t.scale_y);
        // 120 × 32.5 drawn, centred vertically in the 65pt box.
        let expected_y = mm(200.0 + (65.0 - 32.5) / 2.0);
        assert!((t.translate_y.unwrap().0 - expected_y.0).abs() < 1e-4);
    }

    #[test]
    fn test_transparent_logo_is_flattened_on_white() {
        let logo = Logo::from_bytes(&png_bytes(2, 2)).unwrap();
        let image_crate::Rgb([r, g, b]) = *logo.image.as_rgb8().unwrap().get_pixel(0, 0);
        assert!(r > 200 && g > 80 && b > 30);
    }

    #[test]
    fn test_garbage_logo_is_rejected() {
        assert!(matches!(
            Logo::from_bytes(b"not an image"),
            Err(RenderError::Image(_))
        ));
    }

    #[test]
    fn test_missing_logo_file_is_none() {
        assert!(Logo::load(Path::new("definitely/not/here/logo.png")).is_none());
    }
}
