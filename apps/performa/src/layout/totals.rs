//! Lower blocks of an invoice page: the three-column totals box and the
//! terms / signatory footer.

use crate::invoice::tax::{format_money, AmountRounding, InvoiceTotals};
use crate::invoice::words::amount_in_words;
use crate::layout::canvas::{Canvas, Rgb, ACCENT, TABLE_ACCENT};
use crate::layout::font_metrics::{string_width, wrap_words, Font};
use crate::layout::letterhead::Letterhead;

pub const TOTALS_ROW_HEIGHT: f32 = 12.0;
pub const TOTALS_HEIGHT: f32 = TOTALS_ROW_HEIGHT * 6.0;
pub const FOOTER_HEIGHT: f32 = 85.0;
const FOOTER_CENTRE_WIDTH: f32 = 110.0;
const MAX_WORD_LINES: usize = 3;

/// Bank details | amount in words | tax summary, hanging from `top`.
///
/// The "Total Amount After Tax" figure and the words are both the grand
/// total after `rounding`.
pub fn draw_totals_box(
    c: &mut Canvas,
    x: f32,
    top: f32,
    width: f32,
    totals: &InvoiceTotals,
    rounding: AmountRounding,
    letterhead: &Letterhead,
) {
    let payable = rounding.apply(totals.grand_total);
    let col_width = width / 3.0;
    let right = x + width;
    let bottom = top - TOTALS_HEIGHT;
    let line_y: Vec<f32> = (0..7)
        .map(|i| top - i as f32 * TOTALS_ROW_HEIGHT)
        .collect();

    let summary_left = x + 2.0 * col_width;
    for &y in &line_y {
        c.line(summary_left, y, right, y);
    }
    for i in 0..4 {
        let edge = x + i as f32 * col_width;
        c.line(edge, top, edge, bottom);
    }
    c.line(x, bottom, x + 2.0 * col_width, bottom);

    // Bank details
    let bank_centre = x + col_width / 2.0;
    c.set_font(Font::HelveticaBold, 7.0);
    c.set_fill_color(TABLE_ACCENT);
    c.draw_centred_string(bank_centre, line_y[1] + 2.0, "Bank Details:");
    c.set_fill_color(Rgb::BLACK);
    c.set_font(Font::HelveticaBold, 6.8);
    for (i, line) in letterhead.bank_lines.iter().take(4).enumerate() {
        c.draw_centred_string(bank_centre, line_y[i + 2] + TOTALS_ROW_HEIGHT / 2.0 - 3.0, line);
    }

    // Amount in words
    let words_centre = x + 1.5 * col_width;
    c.draw_centred_string(words_centre, line_y[1] + 2.0, "Total Invoice Value (In Words):");
    if let Some(words) = amount_in_words(payable) {
        let words = words.replace(',', "").replace('-', " ");
        let text_y = line_y[2] + TOTALS_ROW_HEIGHT / 2.0 - 3.0;
        let lines = wrap_words(&words, Font::HelveticaBold, 6.8, col_width - 10.0);
        for (i, line) in lines.iter().take(MAX_WORD_LINES).enumerate() {
            c.draw_centred_string(words_centre, text_y - i as f32 * TOTALS_ROW_HEIGHT, line);
        }
    }

    // Tax summary
    let value_x = summary_left + col_width - 4.0;
    let separator_x = value_x - 40.0;
    c.set_line_width(0.5);
    c.line(separator_x, line_y[6], separator_x, line_y[0]);

    let rows = [
        ("Total Amount Before Tax :", totals.taxable),
        ("Add. CGST :", totals.cgst_amt),
        ("Add. SGST :", totals.sgst_amt),
        ("Add. IGST :", totals.igst_amt),
    ];
    c.set_font(Font::Helvetica, 6.8);
    for (i, (label, value)) in rows.iter().enumerate() {
        let y = line_y[i + 1] + 2.0;
        c.draw_right_string(separator_x - 4.0, y, label);
        c.draw_right_string(value_x, y, &format_money(*value));
    }
    c.set_font(Font::HelveticaBold, 6.8);
    c.draw_right_string(separator_x - 4.0, line_y[5] + 2.0, "Total Amount After Tax :");
    c.draw_right_string(value_x, line_y[5] + 2.0, &format_money(payable));
}

/// Terms | pre-authentication | signatory footer resting on `bottom`.
pub fn draw_footer(c: &mut Canvas, x: f32, bottom: f32, width: f32, letterhead: &Letterhead) {
    c.set_line_width(1.1);
    c.rect(x, bottom, width, FOOTER_HEIGHT);
    let side_width = (width - FOOTER_CENTRE_WIDTH) / 2.0;
    let centre_x = x + side_width;
    let right_x = centre_x + FOOTER_CENTRE_WIDTH;
    c.line(centre_x, bottom, centre_x, bottom + FOOTER_HEIGHT);
    c.line(right_x, bottom, right_x, bottom + FOOTER_HEIGHT);

    draw_terms(c, x, bottom, letterhead);

    let caption_y = bottom + FOOTER_HEIGHT - 10.0;
    c.set_fill_color(ACCENT);
    c.set_font(Font::HelveticaBold, 7.0);
    c.draw_centred_string(centre_x + FOOTER_CENTRE_WIDTH / 2.0, caption_y, "Pre-authentication");

    let signatory_x = right_x + side_width / 2.0;
    c.set_fill_color(Rgb::BLACK);
    c.set_font(Font::HelveticaBold, 9.0);
    c.draw_centred_string(signatory_x, caption_y, &letterhead.signatory_caption());
    c.set_fill_color(ACCENT);
    c.draw_centred_string(signatory_x, bottom + 5.0, "Authorised Signatory");
}

fn draw_terms(c: &mut Canvas, left: f32, bottom: f32, letterhead: &Letterhead) {
    const HEADING: &str = "Terms & Conditions:";
    let heading_x = left + 5.0;
    let heading_y = bottom + FOOTER_HEIGHT - 10.0;

    c.set_font(Font::HelveticaBoldOblique, 8.0);
    c.set_fill_color(ACCENT);
    c.draw_string(heading_x, heading_y, HEADING);
    let underline = string_width(HEADING, Font::HelveticaBoldOblique, 8.0);
    c.line(heading_x, heading_y - 2.0, heading_x + underline, heading_y - 2.0);

    c.set_font(Font::HelveticaOblique, 7.0);
    c.set_fill_color(Rgb::BLACK);
    for (i, term) in letterhead.terms.iter().enumerate() {
        c.draw_string(heading_x + 5.0, heading_y - 15.0 - i as f32 * 10.0, term);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn totals() -> InvoiceTotals {
        InvoiceTotals::new(dec!(1000), dec!(90.25), dec!(90.25), dec!(0)).unwrap()
    }

    fn draw(rounding: AmountRounding) -> crate::layout::canvas::PageContent {
        let mut c = Canvas::new();
        draw_totals_box(&mut c, 14.0, 180.0, 567.0, &totals(), rounding, &Letterhead::default());
        c.finish("t", 595.0, 842.0)
    }

    #[test]
    fn test_whole_rupee_total_matches_words() {
        let page = draw(AmountRounding::WholeRupees);
        let texts: Vec<&str> = page.texts().collect();
        assert!(texts.contains(&"1181.00"), "{texts:?}");
        assert!(texts.contains(&"1000.00"));
        assert!(texts.contains(&"90.25"));
        let words: String = texts
            .iter()
            .skip_while(|t| **t != "Total Invoice Value (In Words):")
            .skip(1)
            .take_while(|t| **t != "Total Amount Before Tax :")
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(words, "One Thousand One Hundred And Eighty One Rupees Only.");
    }

    #[test]
    fn test_paise_rounding_keeps_fraction() {
        let page = draw(AmountRounding::RupeesAndPaise);
        let texts: Vec<&str> = page.texts().collect();
        assert!(texts.contains(&"1180.50"));
        assert!(texts.join(" ").contains("Eighty Rupees And Fifty Paise Only."));
    }

    #[test]
    fn test_words_wrap_within_column() {
        let big = InvoiceTotals::new(dec!(98765432), dec!(0), dec!(0), dec!(0)).unwrap();
        let mut c = Canvas::new();
        draw_totals_box(&mut c, 0.0, 180.0, 567.0, &big, AmountRounding::WholeRupees, &Letterhead::default());
        let page = c.finish("t", 595.0, 842.0);
        let column = 567.0 / 3.0;
        for op in &page.ops {
            if let crate::layout::canvas::DrawOp::Text { x, font, size, text, .. } = op {
                if text.contains("Crore") || text.contains("Lakh") {
                    assert!(string_width(text, *font, *size) <= column - 10.0);
                    assert!(*x >= column && *x <= 2.0 * column);
                }
            }
        }
    }

    #[test]
    fn test_footer_carries_terms_and_signatory() {
        let mut c = Canvas::new();
        draw_footer(&mut c, 14.0, 8.5, 567.0, &Letterhead::default());
        let page = c.finish("t", 595.0, 842.0);
        assert!(page.find_text("Terms & Conditions:").is_some());
        assert!(page.find_text("1. Goods once sold will not be returned.").is_some());
        assert!(page.find_text("Pre-authentication").is_some());
        assert!(page.find_text("For Pions Technologies Pvt. Ltd.").is_some());
        let (_, y) = page.find_text("Authorised Signatory").unwrap();
        assert_eq!(y, 13.5);
    }
}
