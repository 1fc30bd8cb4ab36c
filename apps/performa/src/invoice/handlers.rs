use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::Local;
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::invoice::form::parse_submission;
use crate::invoice::numbering::InvoiceNumber;
use crate::invoice::tax::InvoiceTotals;
use crate::layout::{item_table::rows_fit, render_document};
use crate::models::invoice::StoredInvoice;
use crate::render::write_pdf;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReprintQuery {
    pub invoice_no: Option<String>,
}

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.index()?))
}

/// POST /generate
/// Assigns the next invoice number, stores the invoice and returns its PDF.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let submission = parse_submission(&body)?;
    if !rows_fit(&submission.items) {
        return Err(AppError::Validation(format!(
            "Too many items: {} rows do not fit on one invoice page",
            submission.items.len()
        )));
    }
    InvoiceTotals::from_items(&submission.items)
        .map_err(|e| AppError::Validation(format!("Cannot generate invoice: {e}")))?;

    let invoice = state
        .store
        .create_invoice(
            &state.config.invoice_prefix,
            Local::now().date_naive(),
            &submission.header,
            &submission.items,
        )
        .await?;

    let invoice_no = invoice.invoice_no.clone();
    let pdf = render_pdf(&state, invoice).await?;
    info!(invoice_no = %invoice_no, bytes = pdf.len(), "Invoice generated");
    Ok(pdf_attachment(&invoice_no, pdf))
}

/// GET /reprint_page
pub async fn handle_reprint_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.reprint("", None)?))
}

/// GET /reprint?invoice_no=...
/// Failures re-render the lookup page with the reason instead of a bare error.
pub async fn handle_reprint(
    State(state): State<AppState>,
    Query(query): Query<ReprintQuery>,
) -> Response {
    let invoice_no = query.invoice_no.unwrap_or_default().trim().to_string();
    if invoice_no.is_empty() {
        return reprint_failure(
            &state,
            "",
            AppError::Validation("Please enter an invoice number.".to_string()),
        );
    }

    match reprint(&state, &invoice_no).await {
        Ok(pdf) => {
            match invoice_no.parse::<InvoiceNumber>() {
                Ok(number) => info!(
                    invoice_no = %invoice_no,
                    prefix = number.prefix(),
                    fiscal_year = %number.fiscal_year(),
                    bytes = pdf.len(),
                    "Invoice reprinted"
                ),
                // Legacy numbers outside the current scheme still reprint.
                Err(_) => info!(invoice_no = %invoice_no, bytes = pdf.len(), "Invoice reprinted"),
            }
            pdf_attachment(&invoice_no, pdf)
        }
        Err(e) => reprint_failure(&state, &invoice_no, e),
    }
}

async fn reprint(state: &AppState, invoice_no: &str) -> Result<Vec<u8>, AppError> {
    let invoice = state
        .store
        .find_invoice(invoice_no)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice not found in database.".to_string()))?;
    render_pdf(state, invoice).await
}

fn reprint_failure(state: &AppState, invoice_no: &str, err: AppError) -> Response {
    let (status, message) = match &err {
        // An empty lookup is not an error, just the form again with a hint.
        AppError::Validation(msg) => (StatusCode::OK, msg.clone()),
        AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        AppError::Database(e) => {
            error!(invoice_no, "Reprint lookup failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error generating invoice: a database error occurred".to_string(),
            )
        }
        AppError::Render(msg) => {
            error!(invoice_no, "Reprint render failed: {msg}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error generating invoice: {msg}"),
            )
        }
        other => {
            error!(invoice_no, "Reprint failed: {other}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error generating invoice: an internal error occurred".to_string(),
            )
        }
    };

    match state.pages.reprint(invoice_no, Some(&message)) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Lays out and writes the four copies off the async executor.
async fn render_pdf(state: &AppState, invoice: StoredInvoice) -> Result<Vec<u8>, AppError> {
    let letterhead = state.letterhead.clone();
    let logo = state.logo.clone();
    let rounding = state.config.amount_rounding;

    let pdf = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, AppError> {
        let pages = render_document(
            &invoice.invoice_no,
            &invoice.header,
            &invoice.items,
            &letterhead,
            rounding,
        )
        .map_err(|e| AppError::Render(e.to_string()))?;
        Ok(write_pdf(&invoice.invoice_no, &pages, logo.as_deref())?)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF render: {e}")))??;

    Ok(pdf)
}

fn pdf_attachment(invoice_no: &str, pdf: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", download_filename(invoice_no));
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response()
}

/// `PTPL/2025-26/001` becomes `PTPL_2025-26_001.pdf`. Anything that is not
/// safe in a header or a filename is replaced with `_`.
pub fn download_filename(invoice_no: &str) -> String {
    let stem: String = invoice_no
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.pdf")
}
