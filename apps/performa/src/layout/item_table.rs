//! The item table: 9 columns, 25 row slots and a total row.
//!
//! CGST, SGST and IGST columns are split into a rate % half and an amount
//! half. Descriptions wrap inside their column; a wrapped row takes
//! `max(14, lines × 8)` points of the table body.

use rust_decimal::Decimal;

use crate::invoice::tax::{format_money, InvoiceTotals, LineAmounts};
use crate::layout::canvas::{Canvas, Rgb, TABLE_ACCENT};
use crate::layout::font_metrics::{wrap_words, Font};
use crate::layout::page::MM;
use crate::models::invoice::LineItem;

pub const HEADER_HEIGHT: f32 = 24.0;
pub const ROW_HEIGHT: f32 = 14.0;
pub const DATA_ROWS: usize = 25;
/// Vertical space of the table body available to item rows.
pub const BODY_HEIGHT: f32 = ROW_HEIGHT * DATA_ROWS as f32;
pub const DESC_LINE_HEIGHT: f32 = 8.0;

const DESC_FONT: Font = Font::HelveticaOblique;
const DESC_SIZE: f32 = 6.8;

/// Column widths in millimetres: NO., DESCRIPTION, HSN/SAC, QTY, UNIT RATE,
/// TAXABLE VALUE, CGST, SGST, IGST.
const COLUMN_WIDTHS_MM: [f32; 9] = [7.0, 51.0, 15.0, 10.0, 18.0, 18.0, 27.0, 27.0, 27.0];

fn column_widths() -> [f32; 9] {
    COLUMN_WIDTHS_MM.map(|w| w * MM)
}

/// Left edge of every column plus the right edge of the table (10 entries).
fn column_edges(x: f32) -> [f32; 10] {
    let mut edges = [x; 10];
    for (i, w) in column_widths().iter().enumerate() {
        edges[i + 1] = edges[i] + w;
    }
    edges
}

/// Description lines as they will be printed.
pub fn description_lines(description: &str) -> Vec<String> {
    wrap_words(description.trim(), DESC_FONT, DESC_SIZE, column_widths()[1] - 4.0)
}

/// Vertical space one item consumes in the table body.
pub fn row_height(item: &LineItem) -> f32 {
    (description_lines(&item.description).len() as f32 * DESC_LINE_HEIGHT).max(ROW_HEIGHT)
}

/// Whether every item fits in the table body without clipping.
pub fn rows_fit(items: &[LineItem]) -> bool {
    items.iter().map(row_height).sum::<f32>() <= BODY_HEIGHT
}

// ────────────────────────────────────────────────────────────────────────────
// Cell formatting
// ────────────────────────────────────────────────────────────────────────────

/// Quantities and tax percentages: shortest exact form, "0" when zero.
pub fn format_quantity(value: Decimal) -> String {
    if value.is_zero() {
        "0".to_string()
    } else {
        value.normalize().to_string()
    }
}

/// Unit rate: two decimals, or a bare "0".
pub fn format_rate(value: Decimal) -> String {
    if value.is_zero() {
        "0".to_string()
    } else {
        format_money(value)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Drawing
// ────────────────────────────────────────────────────────────────────────────

/// Draws the table hanging from `top` and returns the bottom of its total row.
///
/// Items that would run past the table body are not drawn; `totals` is
/// printed as given.
pub fn draw_item_table(
    c: &mut Canvas,
    x: f32,
    top: f32,
    items: &[LineItem],
    totals: &InvoiceTotals,
) -> f32 {
    let widths = column_widths();
    let col_x = column_edges(x);
    let right = col_x[9];
    let table_height = HEADER_HEIGHT + BODY_HEIGHT;
    let table_bottom = top - table_height;

    draw_grid(c, &col_x, &widths, top, table_bottom);
    draw_column_headings(c, &col_x, &widths, top);

    c.set_fill_color(Rgb::BLACK);
    let mut current_y = top - HEADER_HEIGHT - 12.0;
    let mut used = 0.0;
    for (i, item) in items.iter().enumerate() {
        let lines = description_lines(&item.description);
        let required = (lines.len() as f32 * DESC_LINE_HEIGHT).max(ROW_HEIGHT);
        if used + required > BODY_HEIGHT {
            break;
        }
        // `totals` was built from these items, so every line computes.
        let Ok(amounts) = LineAmounts::of(item) else {
            break;
        };

        c.set_font(Font::Helvetica, 7.0);
        c.draw_right_string(col_x[0] + widths[0] - 2.0, current_y, &(i + 1).to_string());

        c.set_font(DESC_FONT, DESC_SIZE);
        for (n, line) in lines.iter().enumerate() {
            c.draw_string(col_x[1] + 2.0, current_y - n as f32 * DESC_LINE_HEIGHT, line);
        }

        c.set_font(Font::HelveticaOblique, 7.0);
        let cells = [
            (col_x[2] + widths[2] - 2.0, item.hsn.clone()),
            (col_x[3] + widths[3] - 2.0, format_quantity(item.qty)),
            (col_x[4] + widths[4] - 2.0, format_rate(item.rate)),
            (col_x[5] + widths[5] - 2.0, format_money(amounts.taxable)),
            (col_x[6] + widths[6] / 2.0 - 2.0, format_quantity(item.cgst)),
            (col_x[6] + widths[6] - 2.0, format_money(amounts.cgst_amt)),
            (col_x[7] + widths[7] / 2.0 - 2.0, format_quantity(item.sgst)),
            (col_x[7] + widths[7] - 2.0, format_money(amounts.sgst_amt)),
            (col_x[8] + widths[8] / 2.0 - 2.0, format_quantity(item.igst)),
            (col_x[8] + widths[8] - 2.0, format_money(amounts.igst_amt)),
        ];
        for (anchor, text) in &cells {
            c.draw_right_string(*anchor, current_y, text);
        }

        current_y -= required;
        used += required;
    }

    // Total row
    let total_top = table_bottom;
    let total_bottom = total_top - ROW_HEIGHT;
    c.line(x, total_top, right, total_top);
    let label_y = (total_top + total_bottom) / 2.0 - 2.0;
    c.set_font(Font::HelveticaBold, 7.0);
    c.draw_right_string(col_x[4] - 2.0, label_y, "Total");
    c.draw_right_string(col_x[6] - 2.0, label_y, &format_money(totals.taxable));
    c.draw_right_string(col_x[7] - 2.0, label_y, &format_money(totals.cgst_amt));
    c.draw_right_string(col_x[8] - 2.0, label_y, &format_money(totals.sgst_amt));
    c.draw_right_string(col_x[9] - 2.0, label_y, &format_money(totals.igst_amt));
    for edge in col_x {
        c.line(edge, total_top, edge, total_bottom);
    }
    c.line(x, total_bottom, right, total_bottom);

    total_bottom
}

fn draw_grid(c: &mut Canvas, col_x: &[f32; 10], widths: &[f32; 9], top: f32, bottom: f32) {
    let header_middle = top - HEADER_HEIGHT / 2.0;
    for edge in col_x {
        c.line(*edge, top, *edge, bottom);
    }
    for i in 6..9 {
        let mid = col_x[i] + widths[i] / 2.0;
        c.line(col_x[i], header_middle, col_x[i + 1], header_middle);
        c.line(mid, header_middle, mid, bottom);
    }
    c.line(col_x[0], top, col_x[9], top);
    c.line(col_x[0], top - HEADER_HEIGHT, col_x[9], top - HEADER_HEIGHT);
}

fn draw_column_headings(c: &mut Canvas, col_x: &[f32; 10], widths: &[f32; 9], top: f32) {
    let header_bottom = top - HEADER_HEIGHT;
    let middle = top - HEADER_HEIGHT / 2.0;
    let upper = top - HEADER_HEIGHT * 0.3;
    let lower = header_bottom + HEADER_HEIGHT * 0.2;
    let centre = |i: usize| (col_x[i] + col_x[i + 1]) / 2.0;

    c.set_font(Font::HelveticaBold, 6.5);
    c.set_fill_color(TABLE_ACCENT);
    c.draw_centred_string(centre(0), upper, "SR.");
    c.draw_centred_string(centre(0), lower, "NO.");
    c.draw_centred_string(centre(1), middle, "DESCRIPTION OF GOODS");
    c.draw_centred_string(centre(2), upper, "HSN / SAC");
    c.draw_centred_string(centre(2), lower, "CODE");
    c.draw_centred_string(centre(3), middle, "QTY");
    c.draw_centred_string(centre(4), upper, "UNIT");
    c.draw_centred_string(centre(4), lower, "RATE");
    c.draw_centred_string(centre(5), upper, "TAXABLE");
    c.draw_centred_string(centre(5), lower, "VALUE");
    c.draw_centred_string(centre(6), upper, "CGST");
    c.draw_centred_string(centre(7), upper, "SGST");
    c.draw_centred_string(centre(8), upper, "IGST");

    c.set_font(Font::HelveticaBold, 6.0);
    for i in 6..9 {
        let left = col_x[i];
        let mid = left + widths[i] / 2.0;
        let right = col_x[i + 1];
        c.draw_centred_string((left + mid) / 2.0, lower, "RATE OF %");
        c.draw_centred_string((mid + right) / 2.0, lower, "AMOUNT");
    }
}
