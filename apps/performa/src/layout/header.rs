//! Upper blocks of an invoice page: letterhead, info box, addresses,
//! state/GSTIN and the vendor/P.O. strip.
//!
//! Each `draw_*` takes the top edge of its block and returns the bottom edge
//! where the next block hangs from.

use crate::layout::canvas::{Canvas, Rgb, ACCENT};
use crate::layout::font_metrics::Font;
use crate::layout::letterhead::Letterhead;
use crate::models::invoice::InvoiceHeader;

/// Height of every text row in the header boxes.
pub const ROW_HEIGHT: f32 = 11.0;
pub const LETTERHEAD_HEIGHT: f32 = 75.0;
pub const INFO_ROWS: usize = 5;
pub const ADDRESS_ROWS: usize = 4;

const LOGO_WIDTH: f32 = 120.0;
const LOGO_HEIGHT: f32 = 65.0;
/// Letterhead text is centred slightly left of the page middle to clear the logo.
const TITLE_OFFSET: f32 = -20.0;

// ────────────────────────────────────────────────────────────────────────────
// Letterhead
// ────────────────────────────────────────────────────────────────────────────

/// Letterhead box spanning `x..x + width` below `top`, with the logo slot and
/// the copy label at the top right.
pub fn draw_letterhead(
    c: &mut Canvas,
    x: f32,
    top: f32,
    width: f32,
    page_width: f32,
    letterhead: &Letterhead,
    copy_label: &str,
) -> f32 {
    let bottom = top - LETTERHEAD_HEIGHT;
    c.set_line_width(1.1);
    c.rect(x, bottom, width, LETTERHEAD_HEIGHT);

    let centre = page_width / 2.0 + TITLE_OFFSET;
    let text_y = top - 15.0;

    c.set_font(Font::HelveticaBoldOblique, 12.0);
    c.draw_centred_string(centre, text_y, &letterhead.company_name);
    c.set_font(Font::HelveticaBoldOblique, 7.0);
    c.draw_centred_string(centre, text_y - 10.0, &letterhead.address);
    c.draw_string(135.0, text_y - 20.0, &letterhead.telephone);
    c.draw_string(275.0, text_y - 20.0, &letterhead.mail);

    c.set_font(Font::HelveticaBoldOblique, 8.0);
    c.set_fill_color(ACCENT);
    c.draw_string(125.0, text_y - 30.0, &letterhead.gstin);
    c.draw_string(335.0, text_y - 30.0, &letterhead.pan);
    c.set_fill_color(Rgb::BLACK);
    c.set_font(Font::HelveticaBoldOblique, 9.0);
    c.draw_centred_string(centre, text_y - 52.0, &letterhead.title);

    let logo_x = x + width - LOGO_WIDTH - 5.0;
    let logo_y = top - 70.0;
    c.logo(logo_x, logo_y, LOGO_WIDTH, LOGO_HEIGHT);
    c.set_font(Font::HelveticaOblique, 7.0);
    c.draw_centred_string(logo_x + LOGO_WIDTH / 2.0, logo_y, copy_label);

    bottom
}

// ────────────────────────────────────────────────────────────────────────────
// Invoice info box
// ────────────────────────────────────────────────────────────────────────────

/// Two columns of five labelled rows. The last row of each column carries a
/// second date field.
pub fn draw_info_box(
    c: &mut Canvas,
    x: f32,
    top: f32,
    width: f32,
    invoice_no: &str,
    header: &InvoiceHeader,
) -> f32 {
    let col_width = width / 2.0;
    let height = ROW_HEIGHT * INFO_ROWS as f32;

    c.set_line_width(1.0);
    c.rect(x, top - height, width, height);
    c.line(x + col_width, top, x + col_width, top - height);

    let label_x = x + 5.0;
    let value_x = x + col_width / 2.0 + 5.0;
    let right_x = x + col_width;
    let base_y = top - 9.0;

    let left: [(&str, &str); 4] = [
        ("INVOICE NO:", invoice_no),
        ("DATE OF INVOICE:", &header.invoice_date),
        ("STATE:", &header.state),
        ("STATE CODE:", &header.state_code),
    ];
    let right: [(&str, &str); 4] = [
        ("TRANSPORT MODE:", &header.transport_mode),
        ("VEHICLE NO:", &header.vehicle_no),
        ("DATE OF SUPPLY:", &header.date_of_supply),
        ("PLACE OF SUPPLY:", &header.place_of_supply),
    ];

    c.set_font(Font::HelveticaOblique, 8.0);
    for (i, ((l_label, l_value), (r_label, r_value))) in left.iter().zip(right.iter()).enumerate() {
        let y = base_y - i as f32 * ROW_HEIGHT;
        c.draw_string(label_x, y, l_label);
        c.draw_string(value_x, y, l_value);
        c.draw_string(right_x + 5.0, y, r_label);
        c.draw_string(right_x + 90.0, y, r_value);
    }

    let y = base_y - 4.0 * ROW_HEIGHT;
    c.draw_string(label_x, y, "Our Delivery Challan No.:");
    c.draw_string(label_x + 105.0, y, &header.delivery_challan_no);
    c.draw_string(label_x + 175.0, y, "Date:");
    c.draw_string(label_x + 205.0, y, &header.delivery_challan_date);

    c.draw_string(right_x + 5.0, y, "Insurance Policy No.:");
    c.draw_string(right_x + 95.0, y, &header.insurance_policy_no);
    c.draw_string(right_x + 200.0, y, "Dated:");
    c.draw_string(right_x + 230.0, y, &header.insurance_policy_date);

    top - height
}

// ────────────────────────────────────────────────────────────────────────────
// Address box
// ────────────────────────────────────────────────────────────────────────────

/// Splits a comma-separated address into exactly `rows` lines, filling from
/// the top so earlier lines carry no more parts than later ones.
///
/// `"A, B, C, D, E, F"` over 4 rows → `["A", "B", "C, D", "E, F"]`.
pub fn balanced_address_lines(text: &str, rows: usize) -> Vec<String> {
    let parts: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut lines = Vec::with_capacity(rows);
    let mut i = 0;
    for r in 0..rows {
        if i >= parts.len() {
            break;
        }
        let remaining = parts.len() - i;
        let size = (remaining / (rows - r)).max(1);
        lines.push(parts[i..i + size].join(", "));
        i += size;
    }
    lines.resize(rows, String::new());
    lines
}

/// "Invoiced To," / "Consigned To," box with four balanced address lines each.
pub fn draw_address_box(
    c: &mut Canvas,
    x: f32,
    top: f32,
    width: f32,
    invoiced_to: &str,
    consigned_to: &str,
) -> f32 {
    let col_width = width / 2.0;
    let height = ROW_HEIGHT * (ADDRESS_ROWS + 1) as f32;
    let y = top - height;

    c.set_line_width(1.0);
    c.rect(x, y, width, height);
    c.line(x + col_width, y, x + col_width, y + height);

    c.set_font(Font::HelveticaOblique, 8.0);
    c.set_fill_color(ACCENT);
    let caption_y = y + height - ROW_HEIGHT + 2.0;
    c.draw_string(x + 5.0, caption_y, "Invoiced To,");
    c.draw_string(x + col_width + 5.0, caption_y, "Consigned To,");

    c.set_font(Font::HelveticaBoldOblique, 8.0);
    c.set_fill_color(Rgb::BLACK);
    let left = balanced_address_lines(invoiced_to, ADDRESS_ROWS);
    let right = balanced_address_lines(consigned_to, ADDRESS_ROWS);
    for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
        let line_y = y + height - (i as f32 + 2.0) * ROW_HEIGHT + 2.0;
        c.draw_string(x + 10.0, line_y, l);
        c.draw_string(x + col_width + 10.0, line_y, r);
    }

    y
}

// ────────────────────────────────────────────────────────────────────────────
// State / GSTIN and vendor strip
// ────────────────────────────────────────────────────────────────────────────

pub fn draw_state_gstin_box(
    c: &mut Canvas,
    x: f32,
    top: f32,
    width: f32,
    header: &InvoiceHeader,
) -> f32 {
    let col_width = width / 2.0;
    let height = ROW_HEIGHT * 3.0;

    c.set_line_width(1.0);
    c.rect(x, top - height, width, height);
    c.line(x + col_width, top - height, x + col_width, top);

    let rows = [
        ("STATE:", &header.invoiced_state, &header.consigned_state),
        (
            "STATE CODE:",
            &header.invoiced_state_code,
            &header.consigned_state_code,
        ),
        (
            "GSTIN/UNIQUE ID:",
            &header.invoiced_gstin,
            &header.consigned_gstin,
        ),
    ];

    c.set_font(Font::HelveticaOblique, 8.0);
    for (i, (label, invoiced, consigned)) in rows.iter().enumerate() {
        let line_y = top - i as f32 * ROW_HEIGHT - ROW_HEIGHT + 3.0;
        c.draw_string(x + 5.0, line_y, &format!("{label} {invoiced}"));
        c.draw_string(x + col_width + 5.0, line_y, &format!("{label} {consigned}"));
    }

    top - height
}

/// Single-row strip in three equal cells, hung `spacing` below `top`.
pub fn draw_vendor_po_box(
    c: &mut Canvas,
    x: f32,
    top: f32,
    width: f32,
    spacing: f32,
    header: &InvoiceHeader,
) -> f32 {
    let y = top - spacing - ROW_HEIGHT;
    let col_width = width / 3.0;

    c.set_line_width(1.0);
    c.rect(x, y, width, ROW_HEIGHT);
    c.line(x + col_width, y, x + col_width, y + ROW_HEIGHT);
    c.line(x + 2.0 * col_width, y, x + 2.0 * col_width, y + ROW_HEIGHT);

    c.set_font(Font::HelveticaOblique, 8.0);
    c.set_fill_color(Rgb::BLACK);
    c.draw_string(x + 5.0, y + 3.0, &format!("Vendor Code: {}", header.vendor_code));
    c.draw_string(
        x + col_width + 5.0,
        y + 3.0,
        &format!("P.O. No: {}", header.po_no),
    );
    c.draw_string(
        x + 2.0 * col_width + 5.0,
        y + 3.0,
        &format!("P.O. Date: {}", header.po_date),
    );

    y
}
