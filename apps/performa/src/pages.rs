//! HTML pages: the invoice form and the reprint lookup.
//!
//! Templates are compiled once at startup from sources baked into the binary.

use mustache::Template;
use serde::Serialize;

use crate::errors::AppError;

const INDEX_TEMPLATE: &str = include_str!("templates/index.html");
const REPRINT_TEMPLATE: &str = include_str!("templates/reprint.html");

pub struct Pages {
    index: Template,
    reprint: Template,
    title: String,
    example_invoice_no: String,
}

#[derive(Serialize)]
struct IndexContext<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct ReprintContext<'a> {
    title: &'a str,
    example: &'a str,
    invoice_no: &'a str,
    has_error: bool,
    error: &'a str,
}

impl Pages {
    /// `example_invoice_no` is shown as the placeholder on the reprint form.
    pub fn compile(title: &str, example_invoice_no: &str) -> Result<Self, AppError> {
        Ok(Pages {
            index: mustache::compile_str(INDEX_TEMPLATE)?,
            reprint: mustache::compile_str(REPRINT_TEMPLATE)?,
            title: title.to_string(),
            example_invoice_no: example_invoice_no.to_string(),
        })
    }

    pub fn index(&self) -> Result<String, AppError> {
        Ok(self.index.render_to_string(&IndexContext { title: &self.title })?)
    }

    /// The reprint form, pre-filled with `invoice_no` and showing `error` if any.
    pub fn reprint(&self, invoice_no: &str, error: Option<&str>) -> Result<String, AppError> {
        let context = ReprintContext {
            title: &self.title,
            example: &self.example_invoice_no,
            invoice_no,
            has_error: error.is_some(),
            error: error.unwrap_or_default(),
        };
        Ok(self.reprint.render_to_string(&context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Pages {
        Pages::compile("PERFORMA INVOICE", "PTPL/2025-26/001").unwrap()
    }

    #[test]
    fn test_index_has_every_item_column() {
        let html = pages().index().unwrap();
        assert!(html.contains("<title>PERFORMA INVOICE</title>"));
        assert!(html.contains(r#"action="/generate""#));
        for field in [
            "item_desc[]",
            "item_hsn[]",
            "item_qty[]",
            "item_rate[]",
            "item_cgst[]",
            "item_sgst[]",
            "item_igst[]",
            "invoiced_to_address",
            "consigned_gstin",
        ] {
            assert!(html.contains(&format!(r#"name="{field}""#)), "missing {field}");
        }
    }

    #[test]
    fn test_reprint_without_error() {
        let html = pages().reprint("", None).unwrap();
        assert!(html.contains(r#"action="/reprint""#));
        assert!(html.contains(r#"placeholder="PTPL"#));
        assert!(!html.contains(r#"class="error""#));
    }

    #[test]
    fn test_reprint_shows_escaped_error() {
        let html = pages()
            .reprint("<b>X", Some("Invoice not found in database."))
            .unwrap();
        assert!(html.contains("Invoice not found in database."));
        assert!(html.contains("&lt;b&gt;X"));
        assert!(!html.contains("<b>X"));
    }
}
