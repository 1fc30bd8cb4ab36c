//! Decoding of the `POST /generate` form body.
//!
//! Header fields are single-valued. Item columns arrive as parallel repeated
//! fields (`item_desc[]`, `item_qty[]`, ...) and are zipped back into rows.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::errors::AppError;
use crate::models::invoice::{InvoiceHeader, LineItem};

const ITEM_DESC: &str = "item_desc[]";
const ITEM_HSN: &str = "item_hsn[]";
const ITEM_QTY: &str = "item_qty[]";
const ITEM_RATE: &str = "item_rate[]";
const ITEM_CGST: &str = "item_cgst[]";
const ITEM_SGST: &str = "item_sgst[]";
const ITEM_IGST: &str = "item_igst[]";

/// A decoded invoice form: header plus the non-blank item rows in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceSubmission {
    pub header: InvoiceHeader,
    pub items: Vec<LineItem>,
}

/// Decode an `application/x-www-form-urlencoded` body.
pub fn parse_submission(body: &[u8]) -> Result<InvoiceSubmission, AppError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
        .map_err(|e| AppError::Validation(format!("Malformed form body: {e}")))?;
    Ok(from_pairs(&pairs))
}

/// Build a submission from ordered key/value pairs. The first occurrence of a
/// header field wins; missing fields are empty.
pub fn from_pairs(pairs: &[(String, String)]) -> InvoiceSubmission {
    let mut singles: HashMap<&str, &str> = HashMap::new();
    let mut repeated: HashMap<&str, Vec<&str>> = HashMap::new();
    for (key, value) in pairs {
        singles.entry(key.as_str()).or_insert(value.as_str());
        repeated.entry(key.as_str()).or_default().push(value.as_str());
    }

    let field = |name: &str| singles.get(name).map(|v| v.to_string()).unwrap_or_default();
    let header = InvoiceHeader {
        invoice_date: field("invoice_date"),
        state: field("state"),
        state_code: field("state_code"),
        delivery_challan_no: field("delivery_challan_no"),
        delivery_challan_date: field("delivery_challan_date"),
        transport_mode: field("transport_mode"),
        vehicle_no: field("vehicle_no"),
        date_of_supply: field("date_of_supply"),
        place_of_supply: field("place_of_supply"),
        insurance_policy_no: field("insurance_policy_no"),
        insurance_policy_date: field("insurance_policy_date"),
        vendor_code: field("vendor_code"),
        po_no: field("po_no"),
        po_date: field("po_date"),
        invoiced_to_address: field("invoiced_to_address"),
        invoiced_state: field("invoiced_state"),
        invoiced_state_code: field("invoiced_state_code"),
        invoiced_gstin: field("invoiced_gstin"),
        consigned_to_address: field("consigned_to_address"),
        consigned_state: field("consigned_state"),
        consigned_state_code: field("consigned_state_code"),
        consigned_gstin: field("consigned_gstin"),
    };

    let column = |name: &str| repeated.get(name).cloned().unwrap_or_default();
    let descs = column(ITEM_DESC);
    let hsns = column(ITEM_HSN);
    let qtys = column(ITEM_QTY);
    let rates = column(ITEM_RATE);
    let cgsts = column(ITEM_CGST);
    let sgsts = column(ITEM_SGST);
    let igsts = column(ITEM_IGST);

    // Shorter columns are padded with empty values.
    fn cell<'a>(col: &[&'a str], i: usize) -> &'a str {
        col.get(i).copied().unwrap_or("")
    }
    let items = (0..descs.len())
        .filter(|&i| !descs[i].trim().is_empty())
        .map(|i| LineItem {
            description: descs[i].to_string(),
            hsn: cell(&hsns, i).to_string(),
            qty: lenient_decimal(cell(&qtys, i)),
            rate: lenient_decimal(cell(&rates, i)),
            cgst: lenient_decimal(cell(&cgsts, i)),
            sgst: lenient_decimal(cell(&sgsts, i)),
            igst: lenient_decimal(cell(&igsts, i)),
        })
        .collect();

    InvoiceSubmission { header, items }
}

/// Parse a numeric form value, treating blank or malformed input as zero.
pub fn lenient_decimal(raw: &str) -> Decimal {
    let raw = raw.trim();
    raw.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or(Decimal::ZERO)
}
