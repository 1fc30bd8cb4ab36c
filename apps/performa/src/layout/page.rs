//! Page assembly: one A4 page per copy label, blocks stacked top to bottom.

use crate::invoice::tax::{AmountOverflow, AmountRounding, InvoiceTotals};
use crate::layout::canvas::{Canvas, PageContent, Rgb};
use crate::layout::letterhead::Letterhead;
use crate::layout::{header, item_table, totals};
use crate::models::invoice::{InvoiceHeader, LineItem};

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;
pub const PAGE_WIDTH: f32 = 595.2756;
pub const PAGE_HEIGHT: f32 = 841.8898;

const TOP_MARGIN: f32 = 5.0 * MM;
const SIDE_MARGIN: f32 = 5.0 * MM;
const BOTTOM_MARGIN: f32 = 3.0 * MM;

/// Gap between the info box and the address box.
const ADDRESS_GAP: f32 = 10.0;
const VENDOR_GAP: f32 = 5.0;
const TABLE_GAP: f32 = 10.0;
/// Space left between the totals box and the footer.
const FOOTER_GAP: f32 = 22.0;
/// The totals box is positioned from the footer up, not from the table down.
const TOTALS_SLOT: f32 = 65.0;

/// Copy labels in print order. Every document has exactly these pages.
pub const COPY_LABELS: [&str; 4] = [
    "Original For Recipient",
    "Duplicate For Transport",
    "Triplicate For Supplier",
    "Extra",
];

/// Lays out every copy of an invoice. Pure: the same input always gives
/// the same pages, differing only in the copy label.
pub fn render_document(
    invoice_no: &str,
    header: &InvoiceHeader,
    items: &[LineItem],
    letterhead: &Letterhead,
    rounding: AmountRounding,
) -> Result<Vec<PageContent>, AmountOverflow> {
    let totals = InvoiceTotals::from_items(items)?;
    Ok(COPY_LABELS
        .iter()
        .map(|label| {
            render_copy(label, invoice_no, header, items, &totals, letterhead, rounding)
        })
        .collect())
}

fn render_copy(
    label: &str,
    invoice_no: &str,
    header: &InvoiceHeader,
    items: &[LineItem],
    totals: &InvoiceTotals,
    letterhead: &Letterhead,
    rounding: AmountRounding,
) -> PageContent {
    let mut c = Canvas::new();
    let usable_width = PAGE_WIDTH - 2.0 * SIDE_MARGIN;
    let x = SIDE_MARGIN;

    c.set_fill_color(Rgb::BLACK);
    c.set_line_width(1.4);
    c.rect(
        x,
        BOTTOM_MARGIN,
        usable_width,
        PAGE_HEIGHT - TOP_MARGIN - BOTTOM_MARGIN,
    );

    let info_top = header::draw_letterhead(
        &mut c,
        x,
        PAGE_HEIGHT - TOP_MARGIN,
        usable_width,
        PAGE_WIDTH,
        letterhead,
        label,
    );
    let info_bottom = header::draw_info_box(&mut c, x, info_top, usable_width, invoice_no, header);
    let address_bottom = header::draw_address_box(
        &mut c,
        x,
        info_bottom - ADDRESS_GAP,
        usable_width,
        &header.invoiced_to_address,
        &header.consigned_to_address,
    );
    let gstin_bottom = header::draw_state_gstin_box(&mut c, x, address_bottom, usable_width, header);
    let vendor_bottom = header::draw_vendor_po_box(
        &mut c,
        x,
        gstin_bottom - VENDOR_GAP,
        usable_width,
        VENDOR_GAP,
        header,
    );

    item_table::draw_item_table(&mut c, x, vendor_bottom - TABLE_GAP, items, totals);

    let footer_y = BOTTOM_MARGIN;
    let totals_top = footer_y + totals::FOOTER_HEIGHT + FOOTER_GAP + TOTALS_SLOT;
    totals::draw_totals_box(&mut c, x, totals_top, usable_width, totals, rounding, letterhead);
    totals::draw_footer(&mut c, x, footer_y, usable_width, letterhead);

    c.finish(label, PAGE_WIDTH, PAGE_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::canvas::DrawOp;
    use rust_decimal_macros::dec;

    fn sample_header() -> InvoiceHeader {
        InvoiceHeader {
            invoice_date: "01/07/2025".to_string(),
            state: "Maharashtra".to_string(),
            state_code: "27".to_string(),
            invoiced_to_address: "Acme Industries, Plot 12, MIDC Bhosari, Pune 411026".to_string(),
            consigned_to_address: "Acme Warehouse, Chakan, Pune".to_string(),
            invoiced_gstin: "27AAACA1234A1Z5".to_string(),
            po_no: "PO-7781".to_string(),
            ..Default::default()
        }
    }

    fn sample_items() -> Vec<LineItem> {
        vec![LineItem {
            description: "Copper wire 2.5 sq mm".to_string(),
            hsn: "7408".to_string(),
            qty: dec!(10),
            rate: dec!(1500),
            cgst: dec!(9),
            sgst: dec!(9),
            igst: dec!(0),
        }]
    }

    fn render() -> Vec<PageContent> {
        render_document(
            "PTPL/2025-26/007",
            &sample_header(),
            &sample_items(),
            &Letterhead::default(),
            AmountRounding::WholeRupees,
        )
        .unwrap()
    }

    #[test]
    fn test_one_page_per_copy_label_in_order() {
        let pages = render();
        let labels: Vec<&str> = pages.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, COPY_LABELS.to_vec());
        for page in &pages {
            assert!(page.find_text(&page.label).is_some(), "label missing on {}", page.label);
            assert_eq!(page.width, PAGE_WIDTH);
            assert_eq!(page.height, PAGE_HEIGHT);
        }
    }

    #[test]
    fn test_copies_differ_only_in_label() {
        let pages = render();
        let without_label = |page: &PageContent| -> Vec<DrawOp> {
            page.ops
                .iter()
                .filter(|op| !matches!(op, DrawOp::Text { text, .. } if *text == page.label))
                .cloned()
                .collect()
        };
        let first = without_label(&pages[0]);
        for page in &pages[1..] {
            assert_eq!(without_label(page), first);
        }
    }

    #[test]
    fn test_page_carries_invoice_and_totals() {
        let page = &render()[0];
        let texts: Vec<&str> = page.texts().collect();
        for expected in [
            "PERFORMA INVOICE",
            "PTPL/2025-26/007",
            "Maharashtra",
            "Acme Industries",
            "Plot 12",
            "GSTIN/UNIQUE ID: 27AAACA1234A1Z5",
            "P.O. No: PO-7781",
            "15000.00",
            "1350.00",
            "17700.00",
        ] {
            assert!(texts.contains(&expected), "missing {expected}");
        }
        assert!(texts.join(" ").contains("Seventeen Thousand Seven Hundred Rupees Only."));
    }

    #[test]
    fn test_everything_stays_on_the_page() {
        for op in &render()[0].ops {
            match op {
                DrawOp::Text { x, y, .. } => {
                    assert!(*x >= 0.0 && *x <= PAGE_WIDTH && *y >= 0.0 && *y <= PAGE_HEIGHT);
                }
                DrawOp::Line { x1, y1, x2, y2 } => {
                    for v in [x1, x2] {
                        assert!(*v >= 0.0 && *v <= PAGE_WIDTH + 0.01);
                    }
                    for v in [y1, y2] {
                        assert!(*v >= 0.0 && *v <= PAGE_HEIGHT);
                    }
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_item_table_clears_totals_box() {
        let page = &render()[0];
        let (_, total_y) = page.find_text("Total").unwrap();
        let (_, summary_y) = page.find_text("Total Amount Before Tax :").unwrap();
        assert!(total_y > summary_y);
    }

    #[test]
    fn test_empty_invoice_still_renders_every_copy() {
        let pages = render_document(
            "PTPL/2025-26/001",
            &InvoiceHeader::default(),
            &[],
            &Letterhead::default(),
            AmountRounding::WholeRupees,
        )
        .unwrap();
        assert_eq!(pages.len(), 4);
        assert!(pages[0].texts().any(|t| t == "Zero Rupees Only."));
    }

    #[test]
    fn test_overflowing_amounts_are_rejected_not_drawn() {
        let e20 = rust_decimal::Decimal::from_i128_with_scale(10_i128.pow(20), 0);
        let items = vec![LineItem {
            description: "Bulk order".to_string(),
            qty: e20,
            rate: e20,
            ..Default::default()
        }];
        let result = render_document(
            "PTPL/2025-26/002",
            &InvoiceHeader::default(),
            &items,
            &Letterhead::default(),
            AmountRounding::WholeRupees,
        );
        assert_eq!(result.unwrap_err(), AmountOverflow);
    }
}
