use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Invoice header fields exactly as submitted on the form. Stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    pub invoice_date: String,
    pub state: String,
    pub state_code: String,
    pub delivery_challan_no: String,
    pub delivery_challan_date: String,
    pub transport_mode: String,
    pub vehicle_no: String,
    pub date_of_supply: String,
    pub place_of_supply: String,
    pub insurance_policy_no: String,
    pub insurance_policy_date: String,
    pub vendor_code: String,
    pub po_no: String,
    pub po_date: String,
    pub invoiced_to_address: String,
    pub invoiced_state: String,
    pub invoiced_state_code: String,
    pub invoiced_gstin: String,
    pub consigned_to_address: String,
    pub consigned_state: String,
    pub consigned_state_code: String,
    pub consigned_gstin: String,
}

/// One row of the item table. Tax columns are percentages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub hsn: String,
    pub qty: Decimal,
    pub rate: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

/// An invoice as persisted: assigned number, header, items in entry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredInvoice {
    pub id: i32,
    pub invoice_no: String,
    pub header: InvoiceHeader,
    pub items: Vec<LineItem>,
}

// ────────────────────────────────────────────────────────────────────────────
// Database rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct InvoiceRow {
    pub id: i32,
    pub invoice_no: String,
    pub invoice_date: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub delivery_challan_no: Option<String>,
    pub delivery_challan_date: Option<String>,
    pub transport_mode: Option<String>,
    pub vehicle_no: Option<String>,
    pub date_of_supply: Option<String>,
    pub place_of_supply: Option<String>,
    pub insurance_policy_no: Option<String>,
    pub insurance_policy_date: Option<String>,
    pub vendor_code: Option<String>,
    pub po_no: Option<String>,
    pub po_date: Option<String>,
    pub invoiced_to_address: Option<String>,
    pub invoiced_state: Option<String>,
    pub invoiced_state_code: Option<String>,
    pub invoiced_gstin: Option<String>,
    pub consigned_to_address: Option<String>,
    pub consigned_state: Option<String>,
    pub consigned_state_code: Option<String>,
    pub consigned_gstin: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct InvoiceItemRow {
    pub item_desc: Option<String>,
    pub item_hsn: Option<String>,
    pub item_qty: Decimal,
    pub item_rate: Decimal,
    pub item_cgst: Decimal,
    pub item_sgst: Decimal,
    pub item_igst: Decimal,
}

impl From<InvoiceRow> for InvoiceHeader {
    fn from(row: InvoiceRow) -> Self {
        InvoiceHeader {
            invoice_date: row.invoice_date.unwrap_or_default(),
            state: row.state.unwrap_or_default(),
            state_code: row.state_code.unwrap_or_default(),
            delivery_challan_no: row.delivery_challan_no.unwrap_or_default(),
            delivery_challan_date: row.delivery_challan_date.unwrap_or_default(),
            transport_mode: row.transport_mode.unwrap_or_default(),
            vehicle_no: row.vehicle_no.unwrap_or_default(),
            date_of_supply: row.date_of_supply.unwrap_or_default(),
            place_of_supply: row.place_of_supply.unwrap_or_default(),
            insurance_policy_no: row.insurance_policy_no.unwrap_or_default(),
            insurance_policy_date: row.insurance_policy_date.unwrap_or_default(),
            vendor_code: row.vendor_code.unwrap_or_default(),
            po_no: row.po_no.unwrap_or_default(),
            po_date: row.po_date.unwrap_or_default(),
            invoiced_to_address: row.invoiced_to_address.unwrap_or_default(),
            invoiced_state: row.invoiced_state.unwrap_or_default(),
            invoiced_state_code: row.invoiced_state_code.unwrap_or_default(),
            invoiced_gstin: row.invoiced_gstin.unwrap_or_default(),
            consigned_to_address: row.consigned_to_address.unwrap_or_default(),
            consigned_state: row.consigned_state.unwrap_or_default(),
            consigned_state_code: row.consigned_state_code.unwrap_or_default(),
            consigned_gstin: row.consigned_gstin.unwrap_or_default(),
        }
    }
}

impl From<InvoiceItemRow> for LineItem {
    fn from(row: InvoiceItemRow) -> Self {
        LineItem {
            description: row.item_desc.unwrap_or_default(),
            hsn: row.item_hsn.unwrap_or_default(),
            qty: row.item_qty,
            rate: row.item_rate,
            cgst: row.item_cgst,
            sgst: row.item_sgst,
            igst: row.item_igst,
        }
    }
}
